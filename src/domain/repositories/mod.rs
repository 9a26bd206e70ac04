//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented in `crate::infrastructure::persistence`. Mock implementations
//! are generated via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`ShortUrlRepository`] - Short URL records (insert, lookup, delete, list)
//! - [`ClickRepository`] - Click log and windowed counting
//!
//! All operations report failures as [`StorageError`].

pub mod click_repository;
pub mod error;
pub mod short_url_repository;

pub use click_repository::ClickRepository;
pub use error::{StorageError, UniqueConstraint};
pub use short_url_repository::ShortUrlRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use short_url_repository::MockShortUrlRepository;
