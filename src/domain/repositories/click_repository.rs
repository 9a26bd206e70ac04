//! Repository trait for click events.

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for the append-only click log.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - process-local implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends a click for an existing short URL.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::MissingShortUrl`] if the short URL is gone.
    /// Returns [`StorageError::Backend`] on other failures.
    async fn record_click(&self, new_click: NewClick) -> Result<Click, StorageError>;

    /// Counts clicks of the short URL with `slug` created at or after `since`.
    ///
    /// `since = None` counts every click.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(count))` if the slug exists, `count` may be zero
    /// - `Ok(None)` if no short URL has this slug
    async fn count_clicks(
        &self,
        slug: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Option<i64>, StorageError>;
}
