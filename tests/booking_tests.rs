/// Integration tests for booking functionality
///
/// This file covers the booking endpoints:
/// - Placing bookings and the creation validations
/// - Owner decisions (approve/reject)
/// - Visibility rules
/// - State filter dispatch with pagination

use axum::http::StatusCode;
use serde_json::json;

use shareit::models::BookingStatus;

mod common;
use common::*;

/// Sets up an owner, a booker, and one available item; returns
/// `(owner_id, booker_id, item_id)`
async fn setup(app: &mut axum::Router) -> (i64, i64, i64) {
    let owner = create_user(app, "Owner", "owner@example.com").await;
    let booker = create_user(app, "Booker", "booker@example.com").await;
    let owner_id = owner["id"].as_i64().unwrap();
    let booker_id = booker["id"].as_i64().unwrap();

    let item = create_item(app, owner_id, "Drill", "Cordless drill", true).await;
    (owner_id, booker_id, item["id"].as_i64().unwrap())
}

#[tokio::test]
async fn test_create_booking() {
    let (mut app, _pool) = create_test_app();
    let (_, booker_id, item_id) = setup(&mut app).await;

    let booking = create_booking(
        &mut app,
        booker_id,
        item_id,
        &hours_from_now(24),
        &hours_from_now(48),
    )
    .await;

    assert_eq!(booking["status"], "WAITING");
    assert_eq!(booking["item"]["id"].as_i64().unwrap(), item_id);
    assert_eq!(booking["booker"]["id"].as_i64().unwrap(), booker_id);
}

#[tokio::test]
async fn test_create_booking_validations() {
    let (mut app, _pool) = create_test_app();
    let (owner_id, booker_id, item_id) = setup(&mut app).await;

    // Missing times
    let (status, _) = send(
        &mut app,
        "POST",
        "/bookings",
        Some(booker_id),
        Some(json!({ "itemId": item_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // End before start
    let (status, _) = send(
        &mut app,
        "POST",
        "/bookings",
        Some(booker_id),
        Some(json!({
            "itemId": item_id,
            "start": hours_from_now(48),
            "end": hours_from_now(24),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Start in the past
    let (status, _) = send(
        &mut app,
        "POST",
        "/bookings",
        Some(booker_id),
        Some(json!({
            "itemId": item_id,
            "start": hours_from_now(-24),
            "end": hours_from_now(24),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown item
    let (status, _) = send(
        &mut app,
        "POST",
        "/bookings",
        Some(booker_id),
        Some(json!({
            "itemId": 9999,
            "start": hours_from_now(24),
            "end": hours_from_now(48),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The owner cannot book their own item
    let (status, _) = send(
        &mut app,
        "POST",
        "/bookings",
        Some(owner_id),
        Some(json!({
            "itemId": item_id,
            "start": hours_from_now(24),
            "end": hours_from_now(48),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cannot_book_unavailable_item() {
    let (mut app, _pool) = create_test_app();

    let owner = create_user(&mut app, "Owner", "owner@example.com").await;
    let booker = create_user(&mut app, "Booker", "booker@example.com").await;
    let item = create_item(
        &mut app,
        owner["id"].as_i64().unwrap(),
        "Drill",
        "Broken",
        false,
    )
    .await;

    let (status, _) = send(
        &mut app,
        "POST",
        "/bookings",
        Some(booker["id"].as_i64().unwrap()),
        Some(json!({
            "itemId": item["id"],
            "start": hours_from_now(24),
            "end": hours_from_now(48),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cannot_book_over_approved_interval() {
    let (mut app, _pool) = create_test_app();
    let (owner_id, booker_id, item_id) = setup(&mut app).await;

    let booking = create_booking(
        &mut app,
        booker_id,
        item_id,
        &hours_from_now(24),
        &hours_from_now(48),
    )
    .await;
    let (status, _) = send(
        &mut app,
        "PATCH",
        &format!("/bookings/{}?approved=true", booking["id"]),
        Some(owner_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Overlapping interval is rejected once the first booking is approved
    let (status, _) = send(
        &mut app,
        "POST",
        "/bookings",
        Some(booker_id),
        Some(json!({
            "itemId": item_id,
            "start": hours_from_now(36),
            "end": hours_from_now(60),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A disjoint interval is fine
    create_booking(
        &mut app,
        booker_id,
        item_id,
        &hours_from_now(72),
        &hours_from_now(96),
    )
    .await;
}

#[tokio::test]
async fn test_approve_and_reject_booking() {
    let (mut app, _pool) = create_test_app();
    let (owner_id, booker_id, item_id) = setup(&mut app).await;

    let booking = create_booking(
        &mut app,
        booker_id,
        item_id,
        &hours_from_now(24),
        &hours_from_now(48),
    )
    .await;
    let uri = format!("/bookings/{}?approved=true", booking["id"]);

    // The booker cannot decide on their own booking
    let (status, _) = send(&mut app, "PATCH", &uri, Some(booker_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, approved) = send(&mut app, "PATCH", &uri, Some(owner_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "APPROVED");

    // An approved booking cannot be re-decided
    let (status, _) = send(&mut app, "PATCH", &uri, Some(owner_id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Rejection works for a fresh booking
    let other = create_booking(
        &mut app,
        booker_id,
        item_id,
        &hours_from_now(72),
        &hours_from_now(96),
    )
    .await;
    let (status, rejected) = send(
        &mut app,
        "PATCH",
        &format!("/bookings/{}?approved=false", other["id"]),
        Some(owner_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejected["status"], "REJECTED");
}

#[tokio::test]
async fn test_booking_visibility() {
    let (mut app, _pool) = create_test_app();
    let (owner_id, booker_id, item_id) = setup(&mut app).await;
    let stranger = create_user(&mut app, "Stranger", "stranger@example.com").await;

    let booking = create_booking(
        &mut app,
        booker_id,
        item_id,
        &hours_from_now(24),
        &hours_from_now(48),
    )
    .await;
    let uri = format!("/bookings/{}", booking["id"]);

    let (status, _) = send(&mut app, "GET", &uri, Some(booker_id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&mut app, "GET", &uri, Some(owner_id), None).await;
    assert_eq!(status, StatusCode::OK);

    // Anyone else gets a 404, not a 403
    let (status, _) = send(
        &mut app,
        "GET",
        &uri,
        Some(stranger["id"].as_i64().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_state_filters() {
    let (mut app, pool) = create_test_app();
    let (owner_id, booker_id, item_id) = setup(&mut app).await;

    let past = seed_booking(
        &pool,
        item_id,
        booker_id,
        instant(-48),
        instant(-24),
        BookingStatus::Approved,
    );
    let current = seed_booking(
        &pool,
        item_id,
        booker_id,
        instant(-1),
        instant(1),
        BookingStatus::Approved,
    );
    let waiting = seed_booking(
        &pool,
        item_id,
        booker_id,
        instant(24),
        instant(48),
        BookingStatus::Waiting,
    );
    let rejected = seed_booking(
        &pool,
        item_id,
        booker_id,
        instant(72),
        instant(96),
        BookingStatus::Rejected,
    );

    for (state, expected) in [
        ("ALL", vec![rejected, waiting, current, past]),
        ("CURRENT", vec![current]),
        ("PAST", vec![past]),
        ("FUTURE", vec![rejected, waiting]),
        ("WAITING", vec![waiting]),
        ("REJECTED", vec![rejected]),
    ] {
        let (status, bookings) = send(
            &mut app,
            "GET",
            &format!("/bookings?state={state}"),
            Some(booker_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK, "state {state}");

        let ids: Vec<i64> = bookings
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, expected, "state {state}");
    }

    // Owner view covers the same bookings
    let (status, bookings) = send(&mut app, "GET", "/bookings/owner", Some(owner_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bookings.as_array().unwrap().len(), 4);

    // Omitting the state behaves like ALL
    let (status, bookings) = send(&mut app, "GET", "/bookings", Some(booker_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bookings.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_unknown_state_is_bad_request() {
    let (mut app, _pool) = create_test_app();
    let (_, booker_id, _) = setup(&mut app).await;

    let (status, body) = send(
        &mut app,
        "GET",
        "/bookings?state=UNSUPPORTED_STATUS",
        Some(booker_id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown state: UNSUPPORTED_STATUS");
}

#[tokio::test]
async fn test_booking_list_pagination() {
    let (mut app, pool) = create_test_app();
    let (_, booker_id, item_id) = setup(&mut app).await;

    for i in 0..5 {
        seed_booking(
            &pool,
            item_id,
            booker_id,
            instant(24 * (i + 1)),
            instant(24 * (i + 1) + 12),
            BookingStatus::Waiting,
        );
    }

    let (status, bookings) = send(
        &mut app,
        "GET",
        "/bookings?from=1&size=2",
        Some(booker_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bookings.as_array().unwrap().len(), 2);

    // Invalid pagination values are rejected
    let (status, _) = send(
        &mut app,
        "GET",
        "/bookings?from=-1&size=2",
        Some(booker_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listing_for_unknown_user() {
    let (mut app, _pool) = create_test_app();

    let (status, _) = send(&mut app, "GET", "/bookings", Some(9999), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&mut app, "GET", "/bookings/owner", Some(9999), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
