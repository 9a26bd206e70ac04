//! Slug generation and validation utilities.
//!
//! Generated slugs are 8 characters drawn uniformly from `0-9A-Za-z` using
//! the operating system's entropy source. The generator makes no uniqueness
//! guarantee; collisions are resolved by the creation service.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::error::AppError;

/// Characters a generated slug is drawn from.
pub const SLUG_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length of a generated slug.
pub const SLUG_LENGTH: usize = 8;

/// Maximum length of a user-supplied slug.
pub const MAX_CUSTOM_SLUG_LENGTH: usize = 64;

/// Slugs that collide with top-level routes and could never redirect.
pub const RESERVED_SLUGS: &[&str] = &["health"];

/// Shape of a user-supplied slug.
pub static CUSTOM_SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_-]+$").unwrap());

/// The entropy source could not be read.
#[derive(Debug, Error)]
#[error("failed to read from entropy source: {0}")]
pub struct SlugError(String);

/// Generates a random slug.
///
/// # Errors
///
/// Returns [`SlugError`] if the system random number generator fails. The
/// failure is not retried.
pub fn generate_slug() -> Result<String, SlugError> {
    generate_slug_with(|buf| getrandom::fill(buf).map_err(|e| SlugError(e.to_string())))
}

/// Builds a slug from bytes produced by `fill`.
///
/// Each byte is reduced to 6 bits and values outside the alphabet are
/// rejected, which keeps the distribution uniform over all 62 characters.
fn generate_slug_with<F>(mut fill: F) -> Result<String, SlugError>
where
    F: FnMut(&mut [u8]) -> Result<(), SlugError>,
{
    let mut slug = String::with_capacity(SLUG_LENGTH);
    let mut buffer = [0u8; 2 * SLUG_LENGTH];

    while slug.len() < SLUG_LENGTH {
        fill(&mut buffer)?;

        for index in buffer.iter().map(|b| (b >> 2) as usize) {
            if let Some(&c) = SLUG_ALPHABET.get(index) {
                slug.push(c as char);
                if slug.len() == SLUG_LENGTH {
                    break;
                }
            }
        }
    }

    Ok(slug)
}

/// Validates a user-supplied slug.
///
/// # Rules
///
/// - Length: 1-64 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Not one of [`RESERVED_SLUGS`]
///
/// # Errors
///
/// Returns [`AppError::Validation`] if a rule is violated.
pub fn validate_custom_slug(slug: &str) -> Result<(), AppError> {
    if slug.is_empty() || slug.len() > MAX_CUSTOM_SLUG_LENGTH {
        return Err(AppError::bad_request(
            "slug",
            format!("must be 1-{MAX_CUSTOM_SLUG_LENGTH} characters"),
        ));
    }

    if !CUSTOM_SLUG_REGEX.is_match(slug) {
        return Err(AppError::bad_request(
            "slug",
            "may only contain letters, digits, '-' and '_'",
        ));
    }

    if RESERVED_SLUGS.contains(&slug) {
        return Err(AppError::bad_request("slug", "is reserved"));
    }

    Ok(())
}
