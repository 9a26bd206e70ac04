//! Process-local storage backend.
//!
//! Holds short URLs and clicks behind one mutex and enforces the same rules as
//! the PostgreSQL schema: unique slugs, unique long URLs, and clicks deleted
//! together with their short URL. Data is lost on restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::clock::Clock;
use crate::domain::entities::{Click, NewClick, NewShortUrl, ShortUrl};
use crate::domain::repositories::{
    ClickRepository, ShortUrlRepository, StorageError, UniqueConstraint,
};

#[derive(Default)]
struct State {
    last_short_url_id: i64,
    last_click_id: i64,
    short_urls: BTreeMap<i64, ShortUrl>,
    ids_by_slug: HashMap<String, i64>,
    ids_by_long_url: HashMap<String, i64>,
    clicks: Vec<Click>,
}

impl State {
    fn remove_short_url(&mut self, id: i64) -> Option<ShortUrl> {
        let short_url = self.short_urls.remove(&id)?;
        self.ids_by_slug.remove(&short_url.slug);
        self.ids_by_long_url.remove(&short_url.long_url);
        self.clicks.retain(|c| c.short_url_id != id);
        Some(short_url)
    }
}

/// In-memory implementation of [`ShortUrlRepository`] and [`ClickRepository`].
///
/// `created_at` of inserted records is taken from the injected clock.
pub struct InMemoryStore {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ShortUrlRepository for InMemoryStore {
    async fn insert(&self, new_short_url: NewShortUrl) -> Result<ShortUrl, StorageError> {
        let mut state = self.lock();

        if state.ids_by_slug.contains_key(&new_short_url.slug) {
            return Err(StorageError::UniqueViolation {
                constraint: Some(UniqueConstraint::Slug),
            });
        }
        if state.ids_by_long_url.contains_key(&new_short_url.long_url) {
            return Err(StorageError::UniqueViolation {
                constraint: Some(UniqueConstraint::LongUrl),
            });
        }

        state.last_short_url_id += 1;
        let id = state.last_short_url_id;

        let short_url = ShortUrl::new(
            id,
            new_short_url.slug,
            new_short_url.long_url,
            self.clock.now(),
            new_short_url.expires_on,
        );

        state.ids_by_slug.insert(short_url.slug.clone(), id);
        state.ids_by_long_url.insert(short_url.long_url.clone(), id);
        state.short_urls.insert(id, short_url.clone());

        Ok(short_url)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortUrl>, StorageError> {
        let state = self.lock();
        Ok(state
            .ids_by_slug
            .get(slug)
            .and_then(|id| state.short_urls.get(id))
            .cloned())
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortUrl>, StorageError> {
        let state = self.lock();
        Ok(state
            .ids_by_long_url
            .get(long_url)
            .and_then(|id| state.short_urls.get(id))
            .cloned())
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<u64, StorageError> {
        let mut state = self.lock();

        let Some(id) = state.ids_by_slug.get(slug).copied() else {
            return Ok(0);
        };

        Ok(state.remove_short_url(id).map_or(0, |_| 1))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, StorageError> {
        let mut state = self.lock();

        let expired: Vec<i64> = state
            .short_urls
            .values()
            .filter(|s| s.is_expired_at(now))
            .map(|s| s.id)
            .collect();

        for id in &expired {
            state.remove_short_url(*id);
        }

        Ok(expired.len() as u64)
    }

    async fn list(&self) -> Result<Vec<ShortUrl>, StorageError> {
        let mut short_urls: Vec<ShortUrl> = self.lock().short_urls.values().cloned().collect();
        short_urls.sort_by_key(|s| (s.created_at, s.id));
        Ok(short_urls)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[async_trait]
impl ClickRepository for InMemoryStore {
    async fn record_click(&self, new_click: NewClick) -> Result<Click, StorageError> {
        let mut state = self.lock();

        if !state.short_urls.contains_key(&new_click.short_url_id) {
            return Err(StorageError::MissingShortUrl);
        }

        state.last_click_id += 1;
        let click = Click::new(
            state.last_click_id,
            new_click.short_url_id,
            new_click.created_at,
        );
        state.clicks.push(click.clone());

        Ok(click)
    }

    async fn count_clicks(
        &self,
        slug: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Option<i64>, StorageError> {
        let state = self.lock();

        let Some(&id) = state.ids_by_slug.get(slug) else {
            return Ok(None);
        };

        let count = state
            .clicks
            .iter()
            .filter(|c| c.short_url_id == id)
            .filter(|c| since.is_none_or(|since| c.created_at >= since))
            .count();

        Ok(Some(count as i64))
    }
}
