use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::models::{ItemRequest, NewItemRequest};
use crate::schema::requests;

/// Creates a new item request in the database
#[instrument(skip(pool, new_request), fields(requestor_id = %new_request.requestor_id))]
pub fn create_request(pool: &DbPool, new_request: NewItemRequest) -> Result<ItemRequest> {
    debug!("Creating new item request");

    let conn = &mut pool.get()?;

    let request = diesel::insert_into(requests::table)
        .values(&new_request)
        .get_result::<ItemRequest>(conn)?;

    info!("Successfully created request with id: {}", request.get_id());
    Ok(request)
}

/// Retrieves a request by id, or None when no such request exists
#[instrument(skip(pool))]
pub fn get_request(pool: &DbPool, request_id: i64) -> Result<Option<ItemRequest>> {
    let conn = &mut pool.get()?;

    let result = requests::table
        .find(request_id)
        .first::<ItemRequest>(conn)
        .optional()?;

    Ok(result)
}

/// Retrieves a user's own requests, newest first
#[instrument(skip(pool))]
pub fn requests_for_requestor(pool: &DbPool, requestor_id: i64) -> Result<Vec<ItemRequest>> {
    debug!("Listing requests by requestor");

    let conn = &mut pool.get()?;

    let result = requests::table
        .filter(requests::requestor_id.eq(requestor_id))
        .order(requests::created.desc())
        .load::<ItemRequest>(conn)?;

    info!(
        "Retrieved {} requests for requestor {}",
        result.len(),
        requestor_id
    );
    Ok(result)
}

/// Retrieves the requests made by everyone except the given user, oldest
/// first
///
/// `page` is an optional `(offset, limit)` pair.
#[instrument(skip(pool))]
pub fn requests_of_others(
    pool: &DbPool,
    user_id: i64,
    page: Option<(i64, i64)>,
) -> Result<Vec<ItemRequest>> {
    debug!("Listing requests of other users");

    let conn = &mut pool.get()?;

    let mut query = requests::table
        .filter(requests::requestor_id.ne(user_id))
        .order(requests::created.asc())
        .into_boxed();

    if let Some((offset, limit)) = page {
        query = query.offset(offset).limit(limit);
    }

    let result = query.load::<ItemRequest>(conn)?;

    Ok(result)
}
