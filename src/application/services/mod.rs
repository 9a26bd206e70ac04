//! Business logic services for the application layer.

pub mod click_service;
pub mod short_url_service;

pub use click_service::{ClickService, GetClicksResult};
pub use short_url_service::{CreationResult, DeleteResult, ShortUrlService};
