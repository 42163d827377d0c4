use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::errors::ApiError;

/// Name of the header carrying the id of the user making the request
pub const SHARER_USER_ID: &str = "X-Sharer-User-Id";

/// Extractor for the `X-Sharer-User-Id` header
///
/// Every endpoint that acts on behalf of a user reads the user's id from this
/// header. A missing or non-positive header value is a 400; whether the user
/// actually exists is checked later, because most endpoints answer that with
/// a 404 instead.
#[derive(Debug, Clone, Copy)]
pub struct SharerUserId(pub i64);

impl<S> FromRequestParts<S> for SharerUserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts.headers.get(SHARER_USER_ID).ok_or_else(|| {
            ApiError::BadRequest(format!("{SHARER_USER_ID} header is missing"))
        })?;

        value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .map(SharerUserId)
            .ok_or_else(|| {
                ApiError::BadRequest(format!(
                    "{SHARER_USER_ID} header must be a positive integer"
                ))
            })
    }
}
