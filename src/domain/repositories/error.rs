//! Storage error taxonomy shared by all repository implementations.

use std::fmt;
use thiserror::Error;

/// Named uniqueness constraints on short URL records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueConstraint {
    Slug,
    LongUrl,
}

impl UniqueConstraint {
    /// Constraint name as declared in the schema.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slug => "uq_short_urls_slug",
            Self::LongUrl => "uq_short_urls_long_url",
        }
    }

    /// Maps a driver-reported constraint name back to the constraint.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "uq_short_urls_slug" => Some(Self::Slug),
            "uq_short_urls_long_url" => Some(Self::LongUrl),
            _ => None,
        }
    }
}

impl fmt::Display for UniqueConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An insert was rejected by a uniqueness constraint.
    ///
    /// `constraint` is `None` when the backend cannot tell which one fired.
    #[error("unique constraint violated: {}", constraint_label(.constraint))]
    UniqueViolation { constraint: Option<UniqueConstraint> },

    /// A click referenced a short URL that no longer exists.
    #[error("referenced short url does not exist")]
    MissingShortUrl,

    /// Connection, query or decoding failure.
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StorageError {
    /// Returns true if retrying the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}

fn constraint_label(constraint: &Option<UniqueConstraint>) -> &'static str {
    constraint.map(UniqueConstraint::as_str).unwrap_or("unknown")
}
