//! Click entity representing a single successful slug resolution.

use chrono::{DateTime, Utc};

/// A click recorded when a short URL is resolved.
///
/// Clicks are append-only: they are never updated and disappear only when
/// their owning short URL is deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct Click {
    pub id: i64,
    pub short_url_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Click {
    /// Creates a new Click instance.
    pub fn new(id: i64, short_url_id: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            short_url_id,
            created_at,
        }
    }
}

/// Input data for recording a new click.
///
/// `short_url_id` must reference an existing short URL.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClick {
    pub short_url_id: i64,
    pub created_at: DateTime<Utc>,
}
