//! Long URL validation.

use thiserror::Error;
use url::Url;

/// Schemes a long URL may use.
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LongUrlError {
    #[error("must be a valid URL ({0})")]
    Malformed(String),

    #[error("scheme must be http or https")]
    UnsupportedScheme,

    #[error("must not contain whitespace or control characters")]
    UnsafeCharacters,
}

/// Checks that `long_url` is an absolute `http`/`https` URL with a host.
///
/// The URL is stored as supplied; parsing is only used for validation.
/// The parser silently drops tabs and newlines, so control characters and
/// surrounding whitespace are rejected up front to keep the stored value
/// usable as a `Location` header.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_long_url("https://www.cloudflare.com").is_ok());
/// assert!(validate_long_url("ftp://x").is_err());
/// ```
pub fn validate_long_url(long_url: &str) -> Result<(), LongUrlError> {
    if long_url.chars().any(char::is_control) || long_url.trim() != long_url {
        return Err(LongUrlError::UnsafeCharacters);
    }

    let parsed = Url::parse(long_url).map_err(|e| LongUrlError::Malformed(e.to_string()))?;

    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(LongUrlError::UnsupportedScheme);
    }

    if !parsed.has_host() {
        return Err(LongUrlError::Malformed("missing host".to_string()));
    }

    Ok(())
}
