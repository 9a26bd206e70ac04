//! Handlers for short URL management endpoints (create, list, get, delete).

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
};
use validator::Validate;

use crate::api::dto::short_url::{CreateShortUrlRequest, ShortUrlResponse};
use crate::application::services::{CreationResult, DeleteResult};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::slug_generator::validate_custom_slug;

/// Creates a short URL, or returns the existing one for the same long URL.
///
/// # Endpoint
///
/// `POST /api/v1/shorturls`
///
/// # Request Body
///
/// ```json
/// {
///   "long_url": "https://www.cloudflare.com",
///   "slug": "cf",                           // optional
///   "expires_on": "2030-01-01T00:00:00Z"    // optional
/// }
/// ```
///
/// # Response Codes
///
/// - **201 Created**: A new short URL was stored
/// - **200 OK**: The long URL was already shortened; the existing record is returned
/// - **400 Bad Request**: Malformed body, invalid or reserved slug, or unusable long URL
/// - **409 Conflict**: The slug belongs to another long URL
pub async fn create_short_url_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateShortUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortUrlResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    if let Some(ref slug) = payload.slug {
        validate_custom_slug(slug)?;
    }

    let prefix = short_url_prefix(&state, &headers)?;

    let result = state
        .short_url_service
        .create_short_url(payload.long_url, payload.slug, payload.expires_on)
        .await?;

    match result {
        CreationResult::Created(short_url) => Ok((
            StatusCode::CREATED,
            Json(ShortUrlResponse::new(short_url, &prefix)),
        )),
        CreationResult::AlreadyExists(short_url) => Ok((
            StatusCode::OK,
            Json(ShortUrlResponse::new(short_url, &prefix)),
        )),
        CreationResult::DuplicateSlug => Err(AppError::conflict("slug", "must be unique")),
        CreationResult::InvalidLongUrl(e) => Err(AppError::bad_request("long_url", e.to_string())),
    }
}

/// Lists all short URLs, oldest first.
///
/// # Endpoint
///
/// `GET /api/v1/shorturls`
pub async fn list_short_urls_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ShortUrlResponse>>, AppError> {
    let prefix = short_url_prefix(&state, &headers)?;

    let short_urls = state.short_url_service.list_short_urls().await?;

    Ok(Json(
        short_urls
            .into_iter()
            .map(|s| ShortUrlResponse::new(s, &prefix))
            .collect(),
    ))
}

/// Returns one short URL without counting a click.
///
/// # Endpoint
///
/// `GET /api/v1/shorturls/{slug}`
///
/// # Errors
///
/// Returns 404 Not Found if no short URL has this slug.
pub async fn get_short_url_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ShortUrlResponse>, AppError> {
    let prefix = short_url_prefix(&state, &headers)?;

    let short_url = state
        .short_url_service
        .get_short_url(&slug)
        .await?
        .ok_or_else(|| AppError::not_found("slug", "not found"))?;

    Ok(Json(ShortUrlResponse::new(short_url, &prefix)))
}

/// Deletes a short URL and its clicks.
///
/// # Endpoint
///
/// `DELETE /api/v1/shorturls/{slug}`
///
/// # Response Codes
///
/// - **204 No Content**: Deleted
/// - **404 Not Found**: No short URL has this slug
pub async fn delete_short_url_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    match state.short_url_service.delete_short_url(&slug).await? {
        DeleteResult::Successful => Ok(StatusCode::NO_CONTENT),
        DeleteResult::NotFound => Err(AppError::not_found("slug", "not found")),
    }
}

/// Returns the prefix for `short_url` fields: the configured base URL, or
/// `http://{Host}` when none is configured.
fn short_url_prefix(state: &AppState, headers: &HeaderMap) -> Result<String, AppError> {
    if let Some(ref base_url) = state.base_url {
        return Ok(base_url.clone());
    }

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AppError::bad_request("host", "Host header is missing or invalid"))?;

    Ok(format!("http://{host}"))
}
