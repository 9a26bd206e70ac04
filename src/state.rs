//! Shared application state injected into handlers.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{ClickService, ShortUrlService};
use crate::domain::click_event::ClickEvent;
use crate::domain::clock::Clock;
use crate::domain::repositories::{ClickRepository, ShortUrlRepository};

/// Application state shared across all request handlers.
///
/// Cloned per request; all fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub short_url_service: Arc<ShortUrlService>,
    pub click_service: Arc<ClickService>,
    /// Kept for the health check; resolution sends through the service.
    pub click_sender: mpsc::Sender<ClickEvent>,
    /// Prefix for `short_url` fields. Falls back to `http://{Host}` when `None`.
    pub base_url: Option<String>,
}

impl AppState {
    /// Wires services over the given repositories and clock.
    pub fn new(
        short_url_repository: Arc<dyn ShortUrlRepository>,
        click_repository: Arc<dyn ClickRepository>,
        clock: Arc<dyn Clock>,
        click_sender: mpsc::Sender<ClickEvent>,
        base_url: Option<String>,
    ) -> Self {
        let short_url_service = Arc::new(ShortUrlService::new(
            short_url_repository,
            clock.clone(),
            click_sender.clone(),
        ));
        let click_service = Arc::new(ClickService::new(click_repository, clock));

        Self {
            short_url_service,
            click_service,
            click_sender,
            base_url,
        }
    }
}
