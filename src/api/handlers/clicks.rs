//! Handler for click count endpoint.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};

use crate::api::dto::clicks::{ClicksQuery, ClicksResponse};
use crate::application::services::GetClicksResult;
use crate::domain::entities::TimePeriod;
use crate::error::AppError;
use crate::state::AppState;

/// Returns how often a short URL was accessed within a time window.
///
/// # Endpoint
///
/// `GET /api/v1/shorturls/{slug}/clicks?time_period=24_HOURS|1_WEEK|ALL_TIME`
///
/// # Response
///
/// ```json
/// { "count": 3, "time_period": "1_WEEK" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if `time_period` is missing or unknown.
/// Returns 404 Not Found if no short URL has this slug; a known slug without
/// clicks reports a count of 0.
pub async fn get_clicks_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    query: Result<Query<ClicksQuery>, QueryRejection>,
) -> Result<Json<ClicksResponse>, AppError> {
    let Query(query) = query?;

    let time_period = query
        .time_period
        .ok_or_else(|| AppError::bad_request("time_period", "is required"))?
        .parse::<TimePeriod>()
        .map_err(|reason: String| AppError::bad_request("time_period", reason))?;

    match state.click_service.get_clicks(&slug, time_period).await? {
        GetClicksResult::Successful { count } => Ok(Json(ClicksResponse { count, time_period })),
        GetClicksResult::NotFound => Err(AppError::not_found("slug", "not found")),
    }
}
