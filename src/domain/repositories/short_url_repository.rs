//! Repository trait for short URL records.

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::domain::repositories::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for short URL records.
///
/// The backing store must enforce uniqueness of both `slug` and `long_url`,
/// and deleting a record must delete its clicks.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - process-local implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortUrlRepository: Send + Sync {
    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::UniqueViolation`] if the slug or the long URL is
    /// already stored. Returns [`StorageError::Backend`] on other failures.
    async fn insert(&self, new_short_url: NewShortUrl) -> Result<ShortUrl, StorageError>;

    /// Finds a record by its slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortUrl>, StorageError>;

    /// Finds a record by its long URL.
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortUrl>, StorageError>;

    /// Deletes the record with the given slug and its clicks.
    ///
    /// Returns the number of records removed.
    async fn delete_by_slug(&self, slug: &str) -> Result<u64, StorageError>;

    /// Deletes every record whose `expires_on` is at or before `now`.
    ///
    /// Records without an expiry are kept. Returns the number of records removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, StorageError>;

    /// Lists all records ordered by `created_at` ascending.
    async fn list(&self) -> Result<Vec<ShortUrl>, StorageError>;

    /// Returns true if the backend answers a trivial query.
    async fn health_check(&self) -> bool;
}
