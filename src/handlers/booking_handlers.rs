use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::dto::{ApprovedQuery, BookingDto, BookingListQuery, CreateBookingDto};
use crate::errors::ApiError;
use crate::extractors::SharerUserId;
use crate::models::{Booking, BookingState, BookingStatus, NewBooking};
use crate::repo;

use super::{booking_to_dto, bookings_to_dtos, ensure_user_exists, page_params};

/// Parses the `state` query parameter, defaulting to `ALL`
fn parse_state(state: Option<String>) -> Result<BookingState, ApiError> {
    match state {
        None => Ok(BookingState::All),
        Some(value) => value.parse::<BookingState>().map_err(ApiError::BadRequest),
    }
}

/// Loads a booking, answering 404 when it does not exist
fn load_booking(pool: &DbPool, booking_id: i64) -> Result<Booking, ApiError> {
    repo::get_booking(pool, booking_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Booking with id {booking_id} not found")))
}

/// Handler for placing a booking
///
/// This function handles POST requests to `/bookings`. New bookings start in
/// the WAITING status; owners cannot book their own items, and intervals
/// clashing with an approved booking are rejected.
#[instrument(skip(pool, payload), fields(booker_id = %booker_id, item_id = %payload.item_id))]
pub async fn create_booking_handler(
    State(pool): State<Arc<DbPool>>,
    SharerUserId(booker_id): SharerUserId,
    Json(payload): Json<CreateBookingDto>,
) -> Result<(StatusCode, Json<BookingDto>), ApiError> {
    info!("Creating new booking");

    let start = payload
        .start
        .ok_or_else(|| ApiError::BadRequest("Start must be provided".to_string()))?;
    let end = payload
        .end
        .ok_or_else(|| ApiError::BadRequest("End must be provided".to_string()))?;

    let now = Utc::now().naive_utc();
    if end <= start {
        return Err(ApiError::BadRequest(
            "End must be after start".to_string(),
        ));
    }
    if start < now {
        return Err(ApiError::BadRequest(
            "Start must not be in the past".to_string(),
        ));
    }

    ensure_user_exists(&pool, booker_id)?;

    let item = repo::get_item(&pool, payload.item_id)?.ok_or_else(|| {
        ApiError::NotFound(format!("Item with id {} not found", payload.item_id))
    })?;

    if item.get_owner_id() == booker_id {
        // The owner booking their own item is treated as the item not being
        // bookable for them at all
        return Err(ApiError::NotFound(
            "Owner cannot book their own item".to_string(),
        ));
    }
    if !item.is_available() {
        return Err(ApiError::BadRequest(format!(
            "Item with id {} is not available",
            item.get_id()
        )));
    }
    if repo::approved_overlap_exists(&pool, item.get_id(), start, end)? {
        return Err(ApiError::BadRequest(
            "Item is already booked for this interval".to_string(),
        ));
    }

    let booking = repo::create_booking(
        &pool,
        NewBooking {
            start_date: start,
            end_date: end,
            item_id: item.get_id(),
            booker_id,
            status: BookingStatus::Waiting,
        },
    )?;

    info!("Successfully created booking with id: {}", booking.get_id());
    let dto = booking_to_dto(&pool, &booking)?;
    Ok((StatusCode::CREATED, Json(dto)))
}

/// Handler for deciding on a booking
///
/// This function handles PATCH requests to `/bookings/{id}?approved=`. Only
/// the owner of the booked item may decide; anyone else gets a 404 so the
/// booking's existence is not leaked.
#[instrument(skip(pool, query), fields(user_id = %user_id))]
pub async fn approve_booking_handler(
    State(pool): State<Arc<DbPool>>,
    SharerUserId(user_id): SharerUserId,
    Path(booking_id): Path<i64>,
    Query(query): Query<ApprovedQuery>,
) -> Result<Json<BookingDto>, ApiError> {
    info!("Deciding on booking");

    let booking = load_booking(&pool, booking_id)?;
    let item = repo::get_item(&pool, booking.get_item_id())?.ok_or_else(|| {
        ApiError::NotFound(format!("Item with id {} not found", booking.get_item_id()))
    })?;

    if item.get_owner_id() != user_id {
        return Err(ApiError::NotFound(format!(
            "Booking with id {booking_id} not found"
        )));
    }
    if booking.get_status() == BookingStatus::Approved {
        return Err(ApiError::BadRequest(
            "Booking is already approved".to_string(),
        ));
    }

    let status = if query.approved {
        BookingStatus::Approved
    } else {
        BookingStatus::Rejected
    };
    let updated = repo::set_booking_status(&pool, booking_id, status)?;

    info!("Booking {} moved to {}", updated.get_id(), updated.get_status());
    let dto = booking_to_dto(&pool, &updated)?;
    Ok(Json(dto))
}

/// Handler for retrieving a specific booking
///
/// This function handles GET requests to `/bookings/{id}`. A booking is
/// visible only to its booker and to the owner of the booked item.
#[instrument(skip(pool), fields(user_id = %user_id))]
pub async fn get_booking_handler(
    State(pool): State<Arc<DbPool>>,
    SharerUserId(user_id): SharerUserId,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingDto>, ApiError> {
    debug!("Retrieving booking");

    let booking = load_booking(&pool, booking_id)?;
    let item = repo::get_item(&pool, booking.get_item_id())?.ok_or_else(|| {
        ApiError::NotFound(format!("Item with id {} not found", booking.get_item_id()))
    })?;

    if booking.get_booker_id() != user_id && item.get_owner_id() != user_id {
        return Err(ApiError::NotFound(format!(
            "Booking with id {booking_id} not found"
        )));
    }

    let dto = booking_to_dto(&pool, &booking)?;
    Ok(Json(dto))
}

/// Handler for listing the requester's bookings
///
/// This function handles GET requests to `/bookings?state=&from=&size=`.
#[instrument(skip(pool, query), fields(booker_id = %booker_id))]
pub async fn list_bookings_handler(
    State(pool): State<Arc<DbPool>>,
    SharerUserId(booker_id): SharerUserId,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<BookingDto>>, ApiError> {
    debug!("Listing bookings by booker");

    ensure_user_exists(&pool, booker_id)?;
    let state = parse_state(query.state)?;
    let page = page_params(query.from, query.size)?;

    let now = Utc::now().naive_utc();
    let bookings = repo::bookings_for_booker(&pool, booker_id, state, now, page)?;
    let dtos = bookings_to_dtos(&pool, &bookings)?;

    Ok(Json(dtos))
}

/// Handler for listing bookings of the requester's items
///
/// This function handles GET requests to `/bookings/owner?state=&from=&size=`.
#[instrument(skip(pool, query), fields(owner_id = %owner_id))]
pub async fn list_owner_bookings_handler(
    State(pool): State<Arc<DbPool>>,
    SharerUserId(owner_id): SharerUserId,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<BookingDto>>, ApiError> {
    debug!("Listing bookings by item owner");

    ensure_user_exists(&pool, owner_id)?;
    let state = parse_state(query.state)?;
    let page = page_params(query.from, query.size)?;

    let now = Utc::now().naive_utc();
    let bookings = repo::bookings_for_owner(&pool, owner_id, state, now, page)?;
    let dtos = bookings_to_dtos(&pool, &bookings)?;

    Ok(Json(dtos))
}
