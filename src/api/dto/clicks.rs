//! DTOs for the click count endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::entities::TimePeriod;

/// Query string of `GET /api/v1/shorturls/{slug}/clicks`.
///
/// `time_period` is kept as text so an unknown value can be reported as a
/// field error instead of a generic deserialization failure.
#[derive(Debug, Deserialize)]
pub struct ClicksQuery {
    pub time_period: Option<String>,
}

/// Click count for one short URL.
#[derive(Debug, Serialize)]
pub struct ClicksResponse {
    pub count: i64,
    pub time_period: TimePeriod,
}
