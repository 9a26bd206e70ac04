//! End-to-end behavior of the core services over the in-memory backend.

mod common;

use chrono::{DateTime, Duration, Utc};
use common::fixed_now;
use short_urls::domain::click_event::ClickEvent;
use short_urls::domain::click_worker::run_click_worker;
use short_urls::domain::entities::NewClick;
use short_urls::domain::repositories::{ClickRepository, ShortUrlRepository};
use short_urls::infrastructure::persistence::InMemoryStore;
use short_urls::prelude::*;
use short_urls::utils::slug_generator::{SLUG_ALPHABET, SLUG_LENGTH};
use short_urls::utils::url_validator::LongUrlError;
use std::sync::Arc;
use tokio::sync::mpsc;

struct Services {
    short_urls: ShortUrlService,
    clicks: ClickService,
    sweeper: ExpirySweeper,
    store: Arc<InMemoryStore>,
    clock: Arc<FixedClock>,
    rx: mpsc::Receiver<ClickEvent>,
}

impl Services {
    fn new() -> Self {
        let clock = Arc::new(FixedClock::new(fixed_now()));
        let store = Arc::new(InMemoryStore::new(clock.clone()));
        let (tx, rx) = mpsc::channel(100);

        Self {
            short_urls: ShortUrlService::new(store.clone(), clock.clone(), tx),
            clicks: ClickService::new(store.clone(), clock.clone()),
            sweeper: ExpirySweeper::new(
                store.clone(),
                clock.clone(),
                std::time::Duration::from_secs(5),
            ),
            store,
            clock,
            rx,
        }
    }

    async fn create(&self, long_url: &str, slug: Option<&str>) -> ShortUrl {
        self.create_expiring(long_url, slug, None).await
    }

    async fn create_expiring(
        &self,
        long_url: &str,
        slug: Option<&str>,
        expires_on: Option<DateTime<Utc>>,
    ) -> ShortUrl {
        match self
            .short_urls
            .create_short_url(long_url.to_string(), slug.map(str::to_string), expires_on)
            .await
            .unwrap()
        {
            CreationResult::Created(short_url) => short_url,
            other => panic!("unexpected creation result: {other:?}"),
        }
    }

    async fn resolve(&mut self, slug: &str) -> Option<String> {
        let long_url = self.short_urls.resolve_short_url(slug).await.unwrap();
        while let Ok(event) = self.rx.try_recv() {
            self.store.record_click(event.into()).await.unwrap();
        }
        long_url
    }

    async fn clicks(&self, slug: &str, period: TimePeriod) -> GetClicksResult {
        self.clicks.get_clicks(slug, period).await.unwrap()
    }
}

#[tokio::test]
async fn test_generated_slug_follows_alphabet_and_length() {
    let services = Services::new();

    let short_url = services.create("https://www.cloudflare.com", None).await;

    assert_eq!(short_url.slug.len(), SLUG_LENGTH);
    assert!(short_url.slug.bytes().all(|b| SLUG_ALPHABET.contains(&b)));
    assert_eq!(short_url.created_at, fixed_now());
}

#[tokio::test]
async fn test_create_twice_returns_same_record() {
    let services = Services::new();

    let created = services.create("https://www.cloudflare.com", None).await;

    let again = services
        .short_urls
        .create_short_url("https://www.cloudflare.com".to_string(), None, None)
        .await
        .unwrap();

    assert_eq!(again, CreationResult::AlreadyExists(created));
}

#[tokio::test]
async fn test_same_slug_for_different_long_urls() {
    let services = Services::new();

    services.create("https://www.cloudflare.com", Some("cf")).await;

    let result = services
        .short_urls
        .create_short_url("https://www.google.com".to_string(), Some("cf".to_string()), None)
        .await
        .unwrap();

    assert_eq!(result, CreationResult::DuplicateSlug);
    assert_eq!(services.short_urls.list_short_urls().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_long_url_creates_nothing() {
    let services = Services::new();

    let result = services
        .short_urls
        .create_short_url("ftp://x".to_string(), None, None)
        .await
        .unwrap();

    assert_eq!(
        result,
        CreationResult::InvalidLongUrl(LongUrlError::UnsupportedScheme)
    );
    assert!(services.short_urls.list_short_urls().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_resolve_counts_exactly_one_click() {
    let mut services = Services::new();
    services.create("https://www.cloudflare.com", Some("cf")).await;

    assert_eq!(
        services.clicks("cf", TimePeriod::AllTime).await,
        GetClicksResult::Successful { count: 0 }
    );

    let long_url = services.resolve("cf").await;

    assert_eq!(long_url.as_deref(), Some("https://www.cloudflare.com"));
    assert_eq!(
        services.clicks("cf", TimePeriod::AllTime).await,
        GetClicksResult::Successful { count: 1 }
    );
}

#[tokio::test]
async fn test_resolve_unknown_slug() {
    let mut services = Services::new();

    assert_eq!(services.resolve("nonexistent").await, None);
    assert!(services.short_urls.list_short_urls().await.unwrap().is_empty());
    assert_eq!(
        services.clicks("nonexistent", TimePeriod::AllTime).await,
        GetClicksResult::NotFound
    );
}

#[tokio::test]
async fn test_click_windows() {
    let services = Services::new();
    let short_url = services.create("https://www.cloudflare.com", Some("cf")).await;

    let now = fixed_now();
    for age in [
        Duration::days(10),
        Duration::days(5),
        Duration::hours(20),
        Duration::hours(1),
    ] {
        services
            .store
            .record_click(NewClick {
                short_url_id: short_url.id,
                created_at: now - age,
            })
            .await
            .unwrap();
    }

    assert_eq!(
        services.clicks("cf", TimePeriod::PastWeek).await,
        GetClicksResult::Successful { count: 3 }
    );
    assert_eq!(
        services.clicks("cf", TimePeriod::Past24Hours).await,
        GetClicksResult::Successful { count: 2 }
    );
    assert_eq!(
        services.clicks("cf", TimePeriod::AllTime).await,
        GetClicksResult::Successful { count: 4 }
    );
}

#[tokio::test]
async fn test_delete_removes_record_and_clicks() {
    let mut services = Services::new();
    services.create("https://www.cloudflare.com", Some("cf")).await;
    services.resolve("cf").await;

    assert_eq!(
        services.short_urls.delete_short_url("cf").await.unwrap(),
        DeleteResult::Successful
    );
    assert_eq!(services.resolve("cf").await, None);
    assert_eq!(
        services.clicks("cf", TimePeriod::AllTime).await,
        GetClicksResult::NotFound
    );

    // Same long URL again starts from zero.
    services.create("https://www.cloudflare.com", Some("cf")).await;
    assert_eq!(
        services.clicks("cf", TimePeriod::AllTime).await,
        GetClicksResult::Successful { count: 0 }
    );
}

#[tokio::test]
async fn test_delete_unknown_slug() {
    let services = Services::new();

    assert_eq!(
        services.short_urls.delete_short_url("nonexistent").await.unwrap(),
        DeleteResult::NotFound
    );
}

#[tokio::test]
async fn test_sweep_removes_only_expired_records() {
    let mut services = Services::new();
    let now = fixed_now();

    services
        .create_expiring("https://past.example", Some("past"), Some(now - Duration::minutes(1)))
        .await;
    services
        .create_expiring("https://edge.example", Some("edge"), Some(now))
        .await;
    services
        .create_expiring("https://later.example", Some("later"), Some(now + Duration::minutes(1)))
        .await;
    services.create("https://never.example", Some("never")).await;

    services.clock.set(now - Duration::hours(1));
    services.resolve("past").await;
    services.clock.set(now);

    assert_eq!(services.sweeper.sweep_once().await.unwrap(), 2);

    let remaining: Vec<String> = services
        .short_urls
        .list_short_urls()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.slug)
        .collect();
    assert_eq!(remaining, vec!["later", "never"]);
    assert_eq!(services.store.count_clicks("past", None).await.unwrap(), None);

    assert_eq!(services.sweeper.sweep_once().await.unwrap(), 0);
}

#[tokio::test]
async fn test_expired_record_is_not_resolved_before_sweep() {
    let mut services = Services::new();
    services
        .create_expiring(
            "https://www.cloudflare.com",
            Some("cf"),
            Some(fixed_now() + Duration::hours(1)),
        )
        .await;

    services.clock.advance(Duration::hours(1));

    assert_eq!(services.resolve("cf").await, None);
    assert!(services.store.find_by_slug("cf").await.unwrap().is_some());
    assert_eq!(
        services.clicks("cf", TimePeriod::AllTime).await,
        GetClicksResult::Successful { count: 0 }
    );
}

#[tokio::test]
async fn test_click_worker_drains_queue_once_state_is_dropped() {
    let clock = Arc::new(FixedClock::new(fixed_now()));
    let store = Arc::new(InMemoryStore::new(clock.clone()));
    let (tx, rx) = mpsc::channel(100);
    let worker = tokio::spawn(run_click_worker(rx, store.clone()));

    let state = AppState::new(store.clone(), store.clone(), clock, tx, None);
    state
        .short_url_service
        .create_short_url("https://www.cloudflare.com".to_string(), Some("cf".to_string()), None)
        .await
        .unwrap();
    for _ in 0..3 {
        state.short_url_service.resolve_short_url("cf").await.unwrap();
    }

    drop(state);

    tokio::time::timeout(std::time::Duration::from_secs(5), worker)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(store.count_clicks("cf", None).await.unwrap(), Some(3));
}
