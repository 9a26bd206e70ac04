//! Click event model for asynchronous click recording.

use chrono::{DateTime, Utc};

use crate::domain::entities::NewClick;

/// An in-memory click waiting to be persisted.
///
/// Resolution sends one of these to a bounded channel and returns the long URL
/// without waiting for the write. The timestamp is taken from the injected
/// clock at resolution time, not when the worker gets to it.
///
/// # Usage Flow
///
/// 1. Created by [`crate::application::services::ShortUrlService::resolve_short_url`]
/// 2. Sent to channel (non-blocking)
/// 3. Processed by [`crate::domain::click_worker::run_click_worker`]
/// 4. Converted to [`NewClick`] for persistence
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub short_url_id: i64,
    pub clicked_at: DateTime<Utc>,
}

impl ClickEvent {
    pub fn new(short_url_id: i64, clicked_at: DateTime<Utc>) -> Self {
        Self {
            short_url_id,
            clicked_at,
        }
    }
}

impl From<ClickEvent> for NewClick {
    fn from(event: ClickEvent) -> Self {
        NewClick {
            short_url_id: event.short_url_id,
            created_at: event.clicked_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_event_into_new_click() {
        let now = Utc::now();
        let event = ClickEvent::new(7, now);

        let new_click: NewClick = event.into();

        assert_eq!(new_click.short_url_id, 7);
        assert_eq!(new_click.created_at, now);
    }
}
