//! Domain layer containing business entities and contracts.
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Repository traits define contracts implemented by the
//! infrastructure layer; business rules live in
//! [`crate::application::services`].
//!
//! # Modules
//!
//! - [`entities`] - Short URLs, clicks and counting windows
//! - [`repositories`] - Data access trait definitions and storage errors
//! - [`clock`] - Injectable time source
//! - [`click_event`] - Click awaiting persistence
//! - [`click_worker`] - Asynchronous click persistence worker
//!
//! # Click Processing Flow
//!
//! 1. A slug is resolved by the short URL service
//! 2. A [`click_event::ClickEvent`] is sent to a bounded channel
//! 3. [`click_worker::run_click_worker`] persists it with retry
//! 4. The click becomes visible to [`repositories::ClickRepository::count_clicks`]

pub mod click_event;
pub mod click_worker;
pub mod clock;
pub mod entities;
pub mod repositories;
