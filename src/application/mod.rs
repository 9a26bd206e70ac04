//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls
//! and business rules. Services consume repository traits and a [`Clock`],
//! and report expected outcomes as typed results rather than errors.
//!
//! # Available Services
//!
//! - [`services::short_url_service::ShortUrlService`] - Creation, deletion and resolution
//! - [`services::click_service::ClickService`] - Click counting over time windows
//! - [`expiry_sweeper::ExpirySweeper`] - Periodic removal of expired short URLs
//!
//! [`Clock`]: crate::domain::clock::Clock

pub mod expiry_sweeper;
pub mod services;
