//! Utility functions for slug generation and URL validation.
//!
//! - [`slug_generator`] - Random slug generation and custom slug validation
//! - [`url_validator`] - Long URL scheme validation

pub mod slug_generator;
pub mod url_validator;
