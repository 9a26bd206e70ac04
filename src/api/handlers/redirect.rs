//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a slug to its long URL.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// # Click Tracking
///
/// A click is queued for the background worker before responding. If the
/// queue is full the click is dropped; the redirect is never delayed.
///
/// # Caching
///
/// Responds with 301 Moved Permanently and `Cache-Control: private,max-age=0`
/// so browsers come back on every access and each one is counted.
///
/// # Errors
///
/// Returns 404 Not Found if the slug doesn't exist or has expired.
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let long_url = state
        .short_url_service
        .resolve_short_url(&slug)
        .await?
        .ok_or_else(|| AppError::not_found("slug", "not found"))?;

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [
            (header::LOCATION, long_url),
            (header::CACHE_CONTROL, "private,max-age=0".to_string()),
        ],
    )
        .into_response())
}
