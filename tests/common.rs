//! Common test utilities for the ShareIt integration tests
//!
//! This file contains shared functions for all integration tests: test
//! application setup, a request helper that speaks the `X-Sharer-User-Id`
//! protocol, and helpers for creating the objects most tests need.
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDateTime, Utc};
use diesel::connection::SimpleConnection;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::Service;

use shareit::db::{init_pool, DbPool};
use shareit::models::{BookingStatus, NewBooking};
use shareit::{create_app, repo, run_migrations};

/// Creates a test application backed by a fresh in-memory SQLite database
///
/// Each test gets a unique shared-cache in-memory database: plain ":memory:"
/// would give every pooled connection its own separate database, so the
/// migrations run on one connection would be invisible to the others.
///
/// ### Returns
///
/// The application router plus the pool, so tests can seed data the API
/// itself refuses to create (such as bookings in the past).
pub fn create_test_app() -> (Router, Arc<DbPool>) {
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:test_{unique_id}?mode=memory&cache=shared");
    let pool = Arc::new(init_pool(&database_url));

    let conn = &mut pool.get().unwrap();
    conn.batch_execute("PRAGMA foreign_keys = ON").unwrap();
    run_migrations(conn);

    (create_app(pool.clone()), pool)
}

/// Sends a request and returns the response status with its parsed JSON body
///
/// `user_id`, when given, is sent as the `X-Sharer-User-Id` header. An empty
/// response body parses as JSON null.
pub async fn send(
    app: &mut Router,
    method: &str,
    uri: &str,
    user_id: Option<i64>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header("Content-Type", "application/json");
    if let Some(user_id) = user_id {
        builder = builder.header("X-Sharer-User-Id", user_id.to_string());
    }

    let body = match body {
        Some(value) => Body::from(serde_json::to_string(&value).unwrap()),
        None => Body::empty(),
    };
    let request = builder.body(body).unwrap();

    let response = app.call(request).await.unwrap();
    let status = response.status();

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

/// Creates a user via the API, asserting a 201
pub async fn create_user(app: &mut Router, name: &str, email: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/users",
        None,
        Some(json!({ "name": name, "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

/// Creates an item via the API, asserting a 201
pub async fn create_item(
    app: &mut Router,
    owner_id: i64,
    name: &str,
    description: &str,
    available: bool,
) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/items",
        Some(owner_id),
        Some(json!({
            "name": name,
            "description": description,
            "available": available,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

/// Creates a booking via the API, asserting a 201
pub async fn create_booking(
    app: &mut Router,
    booker_id: i64,
    item_id: i64,
    start: &str,
    end: &str,
) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/bookings",
        Some(booker_id),
        Some(json!({ "itemId": item_id, "start": start, "end": end })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

/// Inserts a booking directly into the database
///
/// The booking API refuses intervals in the past, so tests that need
/// started or finished bookings (comment eligibility, last booking) seed
/// them through the repository instead.
pub fn seed_booking(
    pool: &DbPool,
    item_id: i64,
    booker_id: i64,
    start: NaiveDateTime,
    end: NaiveDateTime,
    status: BookingStatus,
) -> i64 {
    repo::create_booking(
        pool,
        NewBooking {
            start_date: start,
            end_date: end,
            item_id,
            booker_id,
            status,
        },
    )
    .unwrap()
    .get_id()
}

/// A timestamp the given number of hours from now, as sent on the wire
pub fn hours_from_now(hours: i64) -> String {
    (Utc::now().naive_utc() + Duration::hours(hours))
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

/// A [`NaiveDateTime`] the given number of hours from now
pub fn instant(hours: i64) -> NaiveDateTime {
    Utc::now().naive_utc() + Duration::hours(hours)
}
