//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without business logic.
//!
//! # Entity Types
//!
//! - [`ShortUrl`] - A slug mapped to a long URL
//! - [`Click`] - One successful resolution of a short URL
//! - [`TimePeriod`] - Window used to bound click counting
//!
//! Creation inputs use separate structs (`NewShortUrl`, `NewClick`) because
//! identifiers and insertion timestamps are assigned by storage.

pub mod click;
pub mod short_url;
pub mod time_period;

pub use click::{Click, NewClick};
pub use short_url::{NewShortUrl, ShortUrl};
pub use time_period::TimePeriod;
