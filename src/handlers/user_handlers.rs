use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::dto::{CreateUserDto, UpdateUserDto};
use crate::errors::ApiError;
use crate::models::{NewUser, User};
use crate::repo;

/// Maps a repository error to a 409 when it is a unique constraint violation
///
/// The only unique column on users is the email, so any unique violation on
/// this table means the email is already taken.
fn map_user_repo_error(err: anyhow::Error) -> ApiError {
    match err.downcast_ref::<diesel::result::Error>() {
        Some(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )) => ApiError::Conflict("Email is used".to_string()),
        _ => ApiError::Database(err),
    }
}

/// Handler for creating a new user
///
/// This function handles POST requests to `/users`.
#[instrument(skip(pool, payload), fields(email = %payload.email))]
pub async fn create_user_handler(
    State(pool): State<Arc<DbPool>>,
    Json(payload): Json<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    info!("Creating new user");

    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Name must not be blank".to_string()));
    }
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(ApiError::BadRequest(
            "Email must be a valid address".to_string(),
        ));
    }

    let user = repo::create_user(
        &pool,
        NewUser {
            name: payload.name,
            email: payload.email,
        },
    )
    .map_err(map_user_repo_error)?;

    info!("Successfully created user with id: {}", user.get_id());
    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for retrieving a specific user
///
/// This function handles GET requests to `/users/{id}`.
#[instrument(skip(pool))]
pub async fn get_user_handler(
    State(pool): State<Arc<DbPool>>,
    Path(user_id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    debug!("Retrieving user");

    let user = repo::get_user(&pool, user_id)?
        .ok_or_else(|| ApiError::NotFound(format!("User with id {user_id} not found")))?;

    Ok(Json(user))
}

/// Handler for listing all users
///
/// This function handles GET requests to `/users`.
#[instrument(skip(pool))]
pub async fn list_users_handler(
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<Vec<User>>, ApiError> {
    debug!("Listing users");

    let users = repo::list_users(&pool)?;
    Ok(Json(users))
}

/// Handler for partially updating a user
///
/// This function handles PATCH requests to `/users/{id}`. Absent fields are
/// left unchanged; changing the email to one already in use is a 409.
#[instrument(skip(pool, payload))]
pub async fn update_user_handler(
    State(pool): State<Arc<DbPool>>,
    Path(user_id): Path<i64>,
    Json(payload): Json<UpdateUserDto>,
) -> Result<Json<User>, ApiError> {
    info!("Updating user");

    if !repo::user_exists(&pool, user_id)? {
        return Err(ApiError::NotFound(format!(
            "User with id {user_id} not found"
        )));
    }

    if let Some(email) = &payload.email {
        if email.trim().is_empty() || !email.contains('@') {
            return Err(ApiError::BadRequest(
                "Email must be a valid address".to_string(),
            ));
        }
    }

    let user = repo::update_user(&pool, user_id, payload.name, payload.email)
        .map_err(map_user_repo_error)?;

    info!("Successfully updated user with id: {}", user.get_id());
    Ok(Json(user))
}

/// Handler for deleting a user
///
/// This function handles DELETE requests to `/users/{id}`.
#[instrument(skip(pool))]
pub async fn delete_user_handler(
    State(pool): State<Arc<DbPool>>,
    Path(user_id): Path<i64>,
) -> Result<Json<()>, ApiError> {
    info!("Deleting user with id: {user_id}");

    let deleted = repo::delete_user(&pool, user_id)?;
    if deleted == 0 {
        return Err(ApiError::NotFound(format!(
            "User with id {user_id} not found"
        )));
    }

    info!("Successfully deleted user with id: {user_id}");
    Ok(Json(()))
}
