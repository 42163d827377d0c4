use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::dto::{CreateRequestDto, ItemDto, PageQuery, RequestDto};
use crate::errors::ApiError;
use crate::extractors::SharerUserId;
use crate::models::{ItemRequest, NewItemRequest};
use crate::repo;

use super::{ensure_user_exists, page_params};

/// Default page applied to `/requests/all` when the client sends no
/// pagination parameters
const DEFAULT_ALL_PAGE: (i64, i64) = (0, 10);

/// Renders a request together with the items posted in answer to it
fn request_with_items(pool: &DbPool, request: &ItemRequest) -> Result<RequestDto, ApiError> {
    let items = repo::items_by_request(pool, request.get_id())?
        .iter()
        .map(ItemDto::from_item)
        .collect();

    Ok(RequestDto::from_parts(request, items))
}

/// Handler for posting an item request
///
/// This function handles POST requests to `/requests`.
#[instrument(skip(pool, payload), fields(requestor_id = %requestor_id))]
pub async fn create_request_handler(
    State(pool): State<Arc<DbPool>>,
    SharerUserId(requestor_id): SharerUserId,
    Json(payload): Json<CreateRequestDto>,
) -> Result<(StatusCode, Json<RequestDto>), ApiError> {
    info!("Creating new item request");

    if payload.description.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Description must not be blank".to_string(),
        ));
    }

    ensure_user_exists(&pool, requestor_id)?;

    let request = repo::create_request(
        &pool,
        NewItemRequest {
            description: payload.description,
            requestor_id,
            created: Utc::now().naive_utc(),
        },
    )?;

    info!("Successfully created request with id: {}", request.get_id());
    Ok((
        StatusCode::CREATED,
        Json(RequestDto::from_parts(&request, Vec::new())),
    ))
}

/// Handler for listing the requester's own requests
///
/// This function handles GET requests to `/requests`. Requests come newest
/// first, each with its answering items.
#[instrument(skip(pool), fields(requestor_id = %requestor_id))]
pub async fn list_own_requests_handler(
    State(pool): State<Arc<DbPool>>,
    SharerUserId(requestor_id): SharerUserId,
) -> Result<Json<Vec<RequestDto>>, ApiError> {
    debug!("Listing own requests");

    ensure_user_exists(&pool, requestor_id)?;

    let requests = repo::requests_for_requestor(&pool, requestor_id)?;
    let dtos = requests
        .iter()
        .map(|request| request_with_items(&pool, request))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(dtos))
}

/// Handler for browsing other users' requests
///
/// This function handles GET requests to `/requests/all?from=&size=`. When
/// the client sends no pagination, the first ten requests are returned.
#[instrument(skip(pool, query), fields(user_id = %user_id))]
pub async fn list_all_requests_handler(
    State(pool): State<Arc<DbPool>>,
    SharerUserId(user_id): SharerUserId,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<RequestDto>>, ApiError> {
    debug!("Listing requests of other users");

    ensure_user_exists(&pool, user_id)?;
    let page = page_params(query.from, query.size)?.unwrap_or(DEFAULT_ALL_PAGE);

    let requests = repo::requests_of_others(&pool, user_id, Some(page))?;
    let dtos = requests
        .iter()
        .map(|request| request_with_items(&pool, request))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(dtos))
}

/// Handler for retrieving a specific request
///
/// This function handles GET requests to `/requests/{id}`.
#[instrument(skip(pool), fields(user_id = %user_id))]
pub async fn get_request_handler(
    State(pool): State<Arc<DbPool>>,
    SharerUserId(user_id): SharerUserId,
    Path(request_id): Path<i64>,
) -> Result<Json<RequestDto>, ApiError> {
    debug!("Retrieving request");

    ensure_user_exists(&pool, user_id)?;

    let request = repo::get_request(&pool, request_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Request with id {request_id} not found")))?;

    let dto = request_with_items(&pool, &request)?;
    Ok(Json(dto))
}
