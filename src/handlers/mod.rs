/// Web API Handlers
///
/// This module contains the handlers for the RESTful API endpoints.
/// Each handler is responsible for processing a specific type of HTTP request,
/// extracting the necessary data, enforcing business rules (ownership,
/// availability, booking state), calling the appropriate repository functions,
/// and returning a properly formatted response.

mod user_handlers;
mod item_handlers;
mod booking_handlers;
mod request_handlers;

// Re-export all handlers
pub use user_handlers::*;
pub use item_handlers::*;
pub use booking_handlers::*;
pub use request_handlers::*;

use crate::db::DbPool;
use crate::dto::BookingDto;
use crate::errors::ApiError;
use crate::models::Booking;
use crate::repo;

/// Turns the `from`/`size` query parameters into an `(offset, limit)` pair
///
/// Pagination only applies when both parameters are present; a negative
/// `from` or a non-positive `size` is a 400.
pub(crate) fn page_params(
    from: Option<i64>,
    size: Option<i64>,
) -> Result<Option<(i64, i64)>, ApiError> {
    if let Some(from) = from {
        if from < 0 {
            return Err(ApiError::BadRequest(
                "from must not be negative".to_string(),
            ));
        }
    }
    if let Some(size) = size {
        if size < 1 {
            return Err(ApiError::BadRequest("size must be positive".to_string()));
        }
    }

    Ok(match (from, size) {
        (Some(from), Some(size)) => Some((from, size)),
        _ => None,
    })
}

/// Fails with a 404 when the given user does not exist
pub(crate) fn ensure_user_exists(pool: &DbPool, user_id: i64) -> Result<(), ApiError> {
    if repo::user_exists(pool, user_id)? {
        Ok(())
    } else {
        Err(ApiError::NotFound(format!(
            "User with id {user_id} not found"
        )))
    }
}

/// Expands a booking into its wire form, with item and booker resolved
pub(crate) fn booking_to_dto(pool: &DbPool, booking: &Booking) -> Result<BookingDto, ApiError> {
    let item = repo::get_item(pool, booking.get_item_id())?.ok_or_else(|| {
        ApiError::NotFound(format!("Item with id {} not found", booking.get_item_id()))
    })?;
    let booker = repo::get_user(pool, booking.get_booker_id())?.ok_or_else(|| {
        ApiError::NotFound(format!(
            "User with id {} not found",
            booking.get_booker_id()
        ))
    })?;

    Ok(BookingDto::from_parts(booking, &item, booker))
}

/// Expands a list of bookings into their wire form, preserving order
pub(crate) fn bookings_to_dtos(
    pool: &DbPool,
    bookings: &[Booking],
) -> Result<Vec<BookingDto>, ApiError> {
    bookings
        .iter()
        .map(|booking| booking_to_dto(pool, booking))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params_requires_both_values() {
        assert_eq!(page_params(None, None).unwrap(), None);
        assert_eq!(page_params(Some(3), None).unwrap(), None);
        assert_eq!(page_params(None, Some(5)).unwrap(), None);
        assert_eq!(page_params(Some(3), Some(5)).unwrap(), Some((3, 5)));
    }

    #[test]
    fn test_page_params_rejects_bad_values() {
        assert!(matches!(
            page_params(Some(-1), Some(5)),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            page_params(Some(0), Some(0)),
            Err(ApiError::BadRequest(_))
        ));
        // A lone invalid value is still rejected
        assert!(matches!(
            page_params(None, Some(-2)),
            Err(ApiError::BadRequest(_))
        ));
    }
}
