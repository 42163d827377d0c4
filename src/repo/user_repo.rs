use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::models::{NewUser, User};
use crate::schema::users;

/// Creates a new user in the database
///
/// ### Errors
///
/// Returns an error if the insert fails; a duplicate email surfaces as a
/// diesel `UniqueViolation` inside the anyhow error, which the handler maps
/// to a 409.
#[instrument(skip(pool), fields(email = %new_user.email))]
pub fn create_user(pool: &DbPool, new_user: NewUser) -> Result<User> {
    debug!("Creating new user");

    let conn = &mut pool.get()?;

    let user = diesel::insert_into(users::table)
        .values(&new_user)
        .get_result::<User>(conn)?;

    info!("Successfully created user with id: {}", user.get_id());
    Ok(user)
}

/// Retrieves a user by id, or None when no such user exists
#[instrument(skip(pool))]
pub fn get_user(pool: &DbPool, user_id: i64) -> Result<Option<User>> {
    let conn = &mut pool.get()?;

    let result = users::table
        .find(user_id)
        .first::<User>(conn)
        .optional()?;

    Ok(result)
}

/// Checks whether a user with the given id exists
#[instrument(skip(pool))]
pub fn user_exists(pool: &DbPool, user_id: i64) -> Result<bool> {
    let conn = &mut pool.get()?;

    let exists = diesel::select(diesel::dsl::exists(users::table.find(user_id)))
        .get_result::<bool>(conn)?;

    Ok(exists)
}

/// Retrieves all users, ordered by id
#[instrument(skip(pool))]
pub fn list_users(pool: &DbPool) -> Result<Vec<User>> {
    debug!("Listing all users");

    let conn = &mut pool.get()?;

    let result = users::table.order(users::id.asc()).load::<User>(conn)?;

    info!("Retrieved {} users", result.len());
    Ok(result)
}

/// Updates a user's name and/or email by id
///
/// Fields passed as None are left unchanged. The caller must have verified
/// the user exists; a duplicate email surfaces as a `UniqueViolation`.
#[instrument(skip(pool, name, email))]
pub fn update_user(
    pool: &DbPool,
    user_id: i64,
    name: Option<String>,
    email: Option<String>,
) -> Result<User> {
    debug!("Updating user by id");

    // Changeset with only the fields that are Some
    #[derive(AsChangeset)]
    #[diesel(table_name = users)]
    struct UserChangeset {
        name: Option<String>,
        email: Option<String>,
    }

    let changeset = UserChangeset { name, email };

    if changeset.name.is_some() || changeset.email.is_some() {
        let conn = &mut pool.get()?;
        diesel::update(users::table.find(user_id))
            .set(changeset)
            .execute(conn)?;
    }

    let updated = get_user(pool, user_id)?
        .ok_or_else(|| anyhow::anyhow!("User with id {} not found", user_id))?;

    Ok(updated)
}

/// Deletes a user by id, returning the number of rows removed
#[instrument(skip(pool))]
pub fn delete_user(pool: &DbPool, user_id: i64) -> Result<usize> {
    debug!("Deleting user by id");

    let conn = &mut pool.get()?;

    let deleted = diesel::delete(users::table.find(user_id)).execute(conn)?;

    debug!("Deleted {} user rows for id: {}", deleted, user_id);
    Ok(deleted)
}
