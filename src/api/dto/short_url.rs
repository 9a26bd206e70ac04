//! DTOs for short URL endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortUrl;
use crate::utils::slug_generator::CUSTOM_SLUG_REGEX;

/// Request to create a short URL.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateShortUrlRequest {
    /// Target URL; the scheme is checked by the service.
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub long_url: String,

    /// Optional custom slug. A random one is generated when absent.
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    #[validate(regex(
        path = *CUSTOM_SLUG_REGEX,
        message = "may only contain letters, digits, '-' and '_'"
    ))]
    pub slug: Option<String>,

    /// Optional expiry (RFC 3339). The record is removed once it passes.
    pub expires_on: Option<DateTime<Utc>>,
}

/// JSON representation of a short URL.
#[derive(Debug, Serialize)]
pub struct ShortUrlResponse {
    /// Absolute URL that redirects to `long_url`.
    pub short_url: String,
    pub slug: String,
    pub long_url: String,
    pub expires_on: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ShortUrlResponse {
    /// Builds the response, prefixing the slug with `prefix` (no trailing slash).
    pub fn new(short_url: ShortUrl, prefix: &str) -> Self {
        Self {
            short_url: format!("{}/{}", prefix, short_url.slug),
            slug: short_url.slug,
            long_url: short_url.long_url,
            expires_on: short_url.expires_on,
            created_at: short_url.created_at,
        }
    }
}
