/// Data models module
///
/// This module defines the core data structures used throughout the application.
/// Each model maps to a database table; the `New*` companions are the
/// insertable halves, since ids are assigned by the database.

mod user;
pub use user::{NewUser, User};

mod item;
pub use item::{Item, NewItem};

mod booking;
pub use booking::{Booking, BookingState, BookingStatus, NewBooking};

mod comment;
pub use comment::{Comment, NewComment};

mod request;
pub use request::{ItemRequest, NewItemRequest};
