//! Short URL entity mapping a slug to its target.

use chrono::{DateTime, Utc};

/// A stored association between a slug and a long URL.
///
/// Records are never updated in place. They are inserted once and removed as a
/// whole, either explicitly or by the expiry sweeper.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortUrl {
    pub id: i64,
    pub slug: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_on: Option<DateTime<Utc>>,
}

impl ShortUrl {
    /// Creates a new ShortUrl instance.
    pub fn new(
        id: i64,
        slug: String,
        long_url: String,
        created_at: DateTime<Utc>,
        expires_on: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            slug,
            long_url,
            created_at,
            expires_on,
        }
    }

    /// Returns true if the record has an expiry at or before `now`.
    ///
    /// Records without `expires_on` never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_on.is_some_and(|e| e <= now)
    }
}

/// Input data for inserting a new short URL.
///
/// `id` and `created_at` are assigned by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShortUrl {
    pub slug: String,
    pub long_url: String,
    pub expires_on: Option<DateTime<Utc>>,
}
