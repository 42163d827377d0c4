use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::dto::{
    BookingRefDto, CommentDto, CreateCommentDto, CreateItemDto, ItemDetailsDto, ItemDto,
    PageQuery, SearchQuery, UpdateItemDto,
};
use crate::errors::ApiError;
use crate::extractors::SharerUserId;
use crate::models::{Item, NewComment, NewItem};
use crate::repo;

use super::{ensure_user_exists, page_params};

/// Renders an item with its comments and, for the owner, its booking context
///
/// The last booking is the approved one with the latest end among those
/// already started; the next booking is the approved one with the earliest
/// end among those starting after the last booking ends (or after now when
/// there is no last booking). Non-owners see both as null.
fn item_details(
    pool: &DbPool,
    item: &Item,
    for_owner: bool,
    now: chrono::NaiveDateTime,
) -> Result<ItemDetailsDto, ApiError> {
    let mut details = ItemDetailsDto::from_item(item);

    details.comments = repo::comments_for_item(pool, item.get_id())?
        .iter()
        .map(|(comment, author_name)| CommentDto::from_parts(comment, author_name.clone()))
        .collect();

    if for_owner {
        let last = repo::last_booking_of_item(pool, item.get_id(), now)?;
        let after = last.as_ref().map(|b| b.get_end()).unwrap_or(now);
        let next = repo::next_booking_of_item(pool, item.get_id(), after)?;

        details.last_booking = last.as_ref().map(BookingRefDto::from_booking);
        details.next_booking = next.as_ref().map(BookingRefDto::from_booking);
    }

    Ok(details)
}

/// Handler for listing a new item
///
/// This function handles POST requests to `/items`.
#[instrument(skip(pool, payload), fields(owner_id = %owner_id))]
pub async fn create_item_handler(
    State(pool): State<Arc<DbPool>>,
    SharerUserId(owner_id): SharerUserId,
    Json(payload): Json<CreateItemDto>,
) -> Result<(StatusCode, Json<ItemDto>), ApiError> {
    info!("Creating new item");

    let name = payload
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Name must not be blank".to_string()))?;
    let description = payload
        .description
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Description must not be blank".to_string()))?;
    let available = payload
        .available
        .ok_or_else(|| ApiError::BadRequest("Available must be provided".to_string()))?;

    ensure_user_exists(&pool, owner_id)?;

    if let Some(request_id) = payload.request_id {
        if repo::get_request(&pool, request_id)?.is_none() {
            return Err(ApiError::NotFound(format!(
                "Request with id {request_id} not found"
            )));
        }
    }

    let item = repo::create_item(
        &pool,
        NewItem {
            name,
            description,
            available,
            owner_id,
            request_id: payload.request_id,
        },
    )?;

    info!("Successfully created item with id: {}", item.get_id());
    Ok((StatusCode::CREATED, Json(ItemDto::from_item(&item))))
}

/// Handler for partially updating an item
///
/// This function handles PATCH requests to `/items/{id}`. Only the item's
/// owner may edit it.
#[instrument(skip(pool, payload), fields(user_id = %user_id))]
pub async fn update_item_handler(
    State(pool): State<Arc<DbPool>>,
    SharerUserId(user_id): SharerUserId,
    Path(item_id): Path<i64>,
    Json(payload): Json<UpdateItemDto>,
) -> Result<Json<ItemDto>, ApiError> {
    info!("Updating item");

    ensure_user_exists(&pool, user_id)?;

    let item = repo::get_item(&pool, item_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Item with id {item_id} not found")))?;

    if item.get_owner_id() != user_id {
        return Err(ApiError::Forbidden(
            "Only the owner can edit an item".to_string(),
        ));
    }

    let updated = repo::update_item(
        &pool,
        item_id,
        payload.name,
        payload.description,
        payload.available,
    )?;

    info!("Successfully updated item with id: {}", updated.get_id());
    Ok(Json(ItemDto::from_item(&updated)))
}

/// Handler for retrieving a specific item
///
/// This function handles GET requests to `/items/{id}`. The response always
/// includes the item's comments; `lastBooking` and `nextBooking` are attached
/// only when the requester owns the item.
#[instrument(skip(pool), fields(user_id = %user_id))]
pub async fn get_item_handler(
    State(pool): State<Arc<DbPool>>,
    SharerUserId(user_id): SharerUserId,
    Path(item_id): Path<i64>,
) -> Result<Json<ItemDetailsDto>, ApiError> {
    debug!("Retrieving item");

    let item = repo::get_item(&pool, item_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Item with id {item_id} not found")))?;

    let now = Utc::now().naive_utc();
    let details = item_details(&pool, &item, item.get_owner_id() == user_id, now)?;

    Ok(Json(details))
}

/// Handler for listing the requester's items
///
/// This function handles GET requests to `/items`. Every returned item
/// belongs to the requester, so booking context is attached to all of them.
#[instrument(skip(pool, query), fields(owner_id = %owner_id))]
pub async fn list_items_handler(
    State(pool): State<Arc<DbPool>>,
    SharerUserId(owner_id): SharerUserId,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<ItemDetailsDto>>, ApiError> {
    debug!("Listing items by owner");

    ensure_user_exists(&pool, owner_id)?;
    let page = page_params(query.from, query.size)?;

    let now = Utc::now().naive_utc();
    let items = repo::items_by_owner(&pool, owner_id, page)?;
    let details = items
        .iter()
        .map(|item| item_details(&pool, item, true, now))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(details))
}

/// Handler for deleting an item
///
/// This function handles DELETE requests to `/items/{id}`. Only the item's
/// owner may delete it.
#[instrument(skip(pool), fields(user_id = %user_id))]
pub async fn delete_item_handler(
    State(pool): State<Arc<DbPool>>,
    SharerUserId(user_id): SharerUserId,
    Path(item_id): Path<i64>,
) -> Result<Json<()>, ApiError> {
    info!("Deleting item with id: {item_id}");

    let item = repo::get_item(&pool, item_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Item with id {item_id} not found")))?;

    if item.get_owner_id() != user_id {
        return Err(ApiError::Forbidden(
            "Only the owner can delete an item".to_string(),
        ));
    }

    repo::delete_item(&pool, item_id)?;

    info!("Successfully deleted item with id: {item_id}");
    Ok(Json(()))
}

/// Handler for searching available items
///
/// This function handles GET requests to `/items/search`. Blank or missing
/// search text short-circuits to an empty list.
#[instrument(skip(pool, query), fields(user_id = %user_id))]
pub async fn search_items_handler(
    State(pool): State<Arc<DbPool>>,
    SharerUserId(user_id): SharerUserId,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ItemDto>>, ApiError> {
    debug!("Searching items");

    let page = page_params(query.from, query.size)?;

    let text = match query.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Ok(Json(Vec::new())),
    };

    let items = repo::search_items(&pool, &text, page)?;
    let dtos = items.iter().map(ItemDto::from_item).collect();

    Ok(Json(dtos))
}

/// Handler for commenting on an item
///
/// This function handles POST requests to `/items/{id}/comment`. Only users
/// with an approved booking of the item that has already started may comment.
#[instrument(skip(pool, payload), fields(author_id = %author_id))]
pub async fn create_comment_handler(
    State(pool): State<Arc<DbPool>>,
    SharerUserId(author_id): SharerUserId,
    Path(item_id): Path<i64>,
    Json(payload): Json<CreateCommentDto>,
) -> Result<Json<CommentDto>, ApiError> {
    info!("Creating comment");

    if payload.text.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Comment text must not be blank".to_string(),
        ));
    }

    let author = repo::get_user(&pool, author_id)?
        .ok_or_else(|| ApiError::NotFound(format!("User with id {author_id} not found")))?;

    if !repo::item_exists(&pool, item_id)? {
        return Err(ApiError::NotFound(format!(
            "Item with id {item_id} not found"
        )));
    }

    let now = Utc::now().naive_utc();
    if !repo::has_started_booking(&pool, item_id, author_id, now)? {
        return Err(ApiError::BadRequest(
            "Only users who booked the item can comment on it".to_string(),
        ));
    }

    let comment = repo::create_comment(
        &pool,
        NewComment {
            text: payload.text,
            item_id,
            author_id,
            created: now,
        },
    )?;

    info!("Successfully created comment with id: {}", comment.get_id());
    Ok(Json(CommentDto::from_parts(
        &comment,
        author.get_name(),
    )))
}
