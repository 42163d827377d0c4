/// Repository module
///
/// This module provides the data access layer for the application. It
/// contains free functions for interacting with the database, one file per
/// entity. Business rules (ownership, availability, state branching) live in
/// the handlers; this layer only runs queries.

mod user_repo;
pub use user_repo::*;

mod item_repo;
pub use item_repo::*;

mod booking_repo;
pub use booking_repo::*;

mod comment_repo;
pub use comment_repo::*;

mod request_repo;
pub use request_repo::*;
