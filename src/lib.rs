/// ShareIt: An Item Sharing Service Library
///
/// This library provides the core functionality for an item sharing service,
/// where users list items, book them for time intervals, comment on items
/// they have used, and post requests for items nobody has listed yet.
///
/// ### Modules
///
/// - `config`: Layered application configuration
/// - `db`: Database connection management
/// - `dto`: Request and response shapes of the web API
/// - `errors`: The API error type and its HTTP mapping
/// - `extractors`: The `X-Sharer-User-Id` header extractor
/// - `handlers`: Web API handlers and business rules
/// - `models`: Data structures representing users, items, bookings,
///   comments and item requests
/// - `repo`: Repository layer for database operations
/// - `schema`: Database schema definitions

/// Configuration module
pub mod config;

/// Database connection module
pub mod db;

/// Data transfer objects module
pub mod dto;

/// API error module
pub mod errors;

/// Request extractors module
pub mod extractors;

/// Web API handlers module
pub mod handlers;

/// Data models module
pub mod models;

/// Repository module for database operations
pub mod repo;

/// Database schema module
pub mod schema;

use axum::routing::{get, post};
use axum::Router;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Embedded database migrations, applied at startup and in tests
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Creates the application router with all routes
///
/// ### Arguments
///
/// * `pool` - The database connection pool to be shared with all handlers
///
/// ### Returns
///
/// An Axum Router configured with all routes and the database pool as state
pub fn create_app(pool: Arc<db::DbPool>) -> Router {
    use handlers::*;

    Router::new()
        // Routes for creating and listing users
        .route("/users", post(create_user_handler).get(list_users_handler))
        // Routes for a specific user
        .route(
            "/users/{id}",
            get(get_user_handler)
                .patch(update_user_handler)
                .delete(delete_user_handler),
        )
        // Routes for listing an item and browsing one's own items
        .route("/items", post(create_item_handler).get(list_items_handler))
        // Route for searching available items; static segments win over
        // captures, so this coexists with /items/{id}
        .route("/items/search", get(search_items_handler))
        // Routes for a specific item
        .route(
            "/items/{id}",
            get(get_item_handler)
                .patch(update_item_handler)
                .delete(delete_item_handler),
        )
        // Route for commenting on an item
        .route("/items/{id}/comment", post(create_comment_handler))
        // Routes for placing and listing bookings
        .route(
            "/bookings",
            post(create_booking_handler).get(list_bookings_handler),
        )
        // Route for the owner's view of bookings
        .route("/bookings/owner", get(list_owner_bookings_handler))
        // Routes for a specific booking
        .route(
            "/bookings/{id}",
            get(get_booking_handler).patch(approve_booking_handler),
        )
        // Routes for posting and listing item requests
        .route(
            "/requests",
            post(create_request_handler).get(list_own_requests_handler),
        )
        // Route for browsing other users' requests
        .route("/requests/all", get(list_all_requests_handler))
        // Route for a specific request
        .route("/requests/{id}", get(get_request_handler))
        .layer(CorsLayer::permissive())
        // Add the database pool to the application state
        .with_state(pool)
}

/// Runs the embedded migrations
///
/// ### Arguments
///
/// * `conn` - A mutable reference to a SQLite connection
///
/// ### Panics
///
/// This function will panic if the migrations fail to run
pub fn run_migrations(conn: &mut diesel::SqliteConnection) {
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");
}
