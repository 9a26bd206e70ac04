#![allow(dead_code)]

use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use short_urls::domain::click_event::ClickEvent;
use short_urls::domain::clock::FixedClock;
use short_urls::domain::repositories::ClickRepository;
use short_urls::infrastructure::persistence::InMemoryStore;
use short_urls::routes::router;
use short_urls::state::AppState;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const BASE_URL: &str = "http://sho.rt";

/// The instant every test clock starts at.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 5, 10, 12, 0, 0).unwrap()
}

/// Application state over an in-memory store and a frozen clock.
///
/// Clicks queued by resolution stay in `rx` until [`TestApp::flush_clicks`]
/// writes them, so tests decide when they become visible.
pub struct TestApp {
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<FixedClock>,
    pub rx: mpsc::Receiver<ClickEvent>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_base_url(Some(BASE_URL.to_string()))
    }

    pub fn with_base_url(base_url: Option<String>) -> Self {
        let clock = Arc::new(FixedClock::new(fixed_now()));
        let store = Arc::new(InMemoryStore::new(clock.clone()));
        let (tx, rx) = mpsc::channel(100);

        let state = AppState::new(store.clone(), store.clone(), clock.clone(), tx, base_url);

        Self {
            state,
            store,
            clock,
            rx,
        }
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(router(self.state.clone())).unwrap()
    }

    /// Persists every queued click and returns how many were written.
    pub async fn flush_clicks(&mut self) -> usize {
        let mut written = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.store.record_click(event.into()).await.unwrap();
            written += 1;
        }
        written
    }
}
