use anyhow::Result;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::models::{Booking, BookingState, BookingStatus, NewBooking};
use crate::schema::{bookings, items};

/// Creates a new booking in the database
#[instrument(skip(pool, new_booking), fields(item_id = %new_booking.item_id, booker_id = %new_booking.booker_id))]
pub fn create_booking(pool: &DbPool, new_booking: NewBooking) -> Result<Booking> {
    debug!("Creating new booking");

    let conn = &mut pool.get()?;

    let booking = diesel::insert_into(bookings::table)
        .values(&new_booking)
        .get_result::<Booking>(conn)?;

    info!("Successfully created booking with id: {}", booking.get_id());
    Ok(booking)
}

/// Retrieves a booking by id, or None when no such booking exists
#[instrument(skip(pool))]
pub fn get_booking(pool: &DbPool, booking_id: i64) -> Result<Option<Booking>> {
    let conn = &mut pool.get()?;

    let result = bookings::table
        .find(booking_id)
        .first::<Booking>(conn)
        .optional()?;

    Ok(result)
}

/// Sets the status of a booking and returns the updated row
#[instrument(skip(pool))]
pub fn set_booking_status(pool: &DbPool, booking_id: i64, status: BookingStatus) -> Result<Booking> {
    debug!("Setting booking status to {status}");

    let conn = &mut pool.get()?;

    let booking = diesel::update(bookings::table.find(booking_id))
        .set(bookings::status.eq(status))
        .get_result::<Booking>(conn)?;

    Ok(booking)
}

/// Retrieves a booker's bookings filtered by state
///
/// `CURRENT` results are ordered by start ascending, every other state by
/// start descending; `page` is an optional `(offset, limit)` pair.
#[instrument(skip(pool, now))]
pub fn bookings_for_booker(
    pool: &DbPool,
    booker_id: i64,
    state: BookingState,
    now: NaiveDateTime,
    page: Option<(i64, i64)>,
) -> Result<Vec<Booking>> {
    debug!("Listing bookings by booker");

    let conn = &mut pool.get()?;

    let base = bookings::table
        .filter(bookings::booker_id.eq(booker_id))
        .into_boxed();

    let mut query = match state {
        BookingState::All => base.order(bookings::start_date.desc()),
        BookingState::Current => base
            .filter(bookings::start_date.le(now))
            .filter(bookings::end_date.gt(now))
            .order(bookings::start_date.asc()),
        BookingState::Past => base
            .filter(bookings::end_date.lt(now))
            .order(bookings::start_date.desc()),
        BookingState::Future => base
            .filter(bookings::start_date.gt(now))
            .order(bookings::start_date.desc()),
        BookingState::Waiting => base
            .filter(bookings::status.eq(BookingStatus::Waiting))
            .order(bookings::start_date.desc()),
        BookingState::Rejected => base
            .filter(bookings::status.eq(BookingStatus::Rejected))
            .order(bookings::start_date.desc()),
    };

    if let Some((offset, limit)) = page {
        query = query.offset(offset).limit(limit);
    }

    let result = query.load::<Booking>(conn)?;

    info!("Retrieved {} bookings for booker {}", result.len(), booker_id);
    Ok(result)
}

/// Retrieves the bookings of all items owned by a user, filtered by state
///
/// Results are ordered by start descending; `page` is an optional
/// `(offset, limit)` pair.
#[instrument(skip(pool, now))]
pub fn bookings_for_owner(
    pool: &DbPool,
    owner_id: i64,
    state: BookingState,
    now: NaiveDateTime,
    page: Option<(i64, i64)>,
) -> Result<Vec<Booking>> {
    debug!("Listing bookings by item owner");

    let conn = &mut pool.get()?;

    let base = bookings::table
        .inner_join(items::table)
        .filter(items::owner_id.eq(owner_id))
        .select(Booking::as_select())
        .order(bookings::start_date.desc())
        .into_boxed();

    let mut query = match state {
        BookingState::All => base,
        BookingState::Current => base
            .filter(bookings::start_date.le(now))
            .filter(bookings::end_date.gt(now)),
        BookingState::Past => base.filter(bookings::end_date.lt(now)),
        BookingState::Future => base.filter(bookings::start_date.gt(now)),
        BookingState::Waiting => base.filter(bookings::status.eq(BookingStatus::Waiting)),
        BookingState::Rejected => base.filter(bookings::status.eq(BookingStatus::Rejected)),
    };

    if let Some((offset, limit)) = page {
        query = query.offset(offset).limit(limit);
    }

    let result = query.load::<Booking>(conn)?;

    info!("Retrieved {} bookings for owner {}", result.len(), owner_id);
    Ok(result)
}

/// Retrieves an item's last booking: the approved booking with the latest
/// end among those already started
#[instrument(skip(pool, now))]
pub fn last_booking_of_item(
    pool: &DbPool,
    item_id: i64,
    now: NaiveDateTime,
) -> Result<Option<Booking>> {
    let conn = &mut pool.get()?;

    let result = bookings::table
        .filter(bookings::item_id.eq(item_id))
        .filter(bookings::status.eq(BookingStatus::Approved))
        .filter(bookings::start_date.lt(now))
        .order(bookings::end_date.desc())
        .first::<Booking>(conn)
        .optional()?;

    Ok(result)
}

/// Retrieves an item's next booking: the approved booking with the earliest
/// end among those starting after the given instant
#[instrument(skip(pool, after))]
pub fn next_booking_of_item(
    pool: &DbPool,
    item_id: i64,
    after: NaiveDateTime,
) -> Result<Option<Booking>> {
    let conn = &mut pool.get()?;

    let result = bookings::table
        .filter(bookings::item_id.eq(item_id))
        .filter(bookings::status.eq(BookingStatus::Approved))
        .filter(bookings::start_date.gt(after))
        .order(bookings::end_date.asc())
        .first::<Booking>(conn)
        .optional()?;

    Ok(result)
}

/// Checks whether the user has an approved booking of the item that has
/// already started, which is what entitles them to comment on it
#[instrument(skip(pool, now))]
pub fn has_started_booking(
    pool: &DbPool,
    item_id: i64,
    booker_id: i64,
    now: NaiveDateTime,
) -> Result<bool> {
    let conn = &mut pool.get()?;

    let exists = diesel::select(diesel::dsl::exists(
        bookings::table
            .filter(bookings::item_id.eq(item_id))
            .filter(bookings::booker_id.eq(booker_id))
            .filter(bookings::status.eq(BookingStatus::Approved))
            .filter(bookings::start_date.lt(now)),
    ))
    .get_result::<bool>(conn)?;

    Ok(exists)
}

/// Checks whether an approved booking of the item overlaps the interval
///
/// Two intervals overlap when each starts before the other ends.
#[instrument(skip(pool, start, end))]
pub fn approved_overlap_exists(
    pool: &DbPool,
    item_id: i64,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<bool> {
    let conn = &mut pool.get()?;

    let exists = diesel::select(diesel::dsl::exists(
        bookings::table
            .filter(bookings::item_id.eq(item_id))
            .filter(bookings::status.eq(BookingStatus::Approved))
            .filter(bookings::start_date.lt(end))
            .filter(bookings::end_date.gt(start)),
    ))
    .get_result::<bool>(conn)?;

    Ok(exists)
}
