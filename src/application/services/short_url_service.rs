//! Short URL creation, deletion and resolution service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::click_event::ClickEvent;
use crate::domain::clock::Clock;
use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::domain::repositories::{ShortUrlRepository, StorageError};
use crate::error::AppError;
use crate::utils::slug_generator::generate_slug;
use crate::utils::url_validator::{LongUrlError, validate_long_url};

/// Attempts made with freshly generated slugs before giving up.
const MAX_SLUG_ATTEMPTS: usize = 10;

/// Outcome of [`ShortUrlService::create_short_url`].
#[derive(Debug, Clone, PartialEq)]
pub enum CreationResult {
    /// A new record was stored.
    Created(ShortUrl),
    /// The long URL was already shortened; the existing record is returned.
    AlreadyExists(ShortUrl),
    /// The requested slug belongs to another long URL.
    DuplicateSlug,
    /// The long URL is not an absolute `http`/`https` URL.
    InvalidLongUrl(LongUrlError),
}

/// Outcome of [`ShortUrlService::delete_short_url`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteResult {
    Successful,
    NotFound,
}

/// Service for the short URL lifecycle.
///
/// Uniqueness of slugs and long URLs is enforced by storage; this service
/// reconciles constraint violations after the fact instead of checking first.
/// Resolution queues a click on the click channel and never waits for the
/// write.
pub struct ShortUrlService {
    repository: Arc<dyn ShortUrlRepository>,
    clock: Arc<dyn Clock>,
    click_sender: mpsc::Sender<ClickEvent>,
}

impl ShortUrlService {
    /// Creates a new short URL service.
    pub fn new(
        repository: Arc<dyn ShortUrlRepository>,
        clock: Arc<dyn Clock>,
        click_sender: mpsc::Sender<ClickEvent>,
    ) -> Self {
        Self {
            repository,
            clock,
            click_sender,
        }
    }

    /// Creates a short URL, or returns the existing one for the same long URL.
    ///
    /// # Slug Allocation
    ///
    /// - An explicit `slug` is inserted as given. A collision with another
    ///   long URL yields [`CreationResult::DuplicateSlug`].
    /// - Otherwise a random slug is generated. Collisions are retried with a
    ///   fresh slug up to 10 times.
    ///
    /// # Unique Violations
    ///
    /// Any rejected insert is followed by a lookup on the long URL. A hit
    /// means [`CreationResult::AlreadyExists`]; a miss means the slug was the
    /// conflicting value. An existing record that has expired but not been
    /// swept yet is deleted and the insert is tried once more, so the caller
    /// never gets back a short URL that no longer resolves.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if slug generation fails, if no unique
    /// slug could be generated, or on storage failures.
    pub async fn create_short_url(
        &self,
        long_url: String,
        slug: Option<String>,
        expires_on: Option<DateTime<Utc>>,
    ) -> Result<CreationResult, AppError> {
        if let Err(e) = validate_long_url(&long_url) {
            return Ok(CreationResult::InvalidLongUrl(e));
        }

        if let Some(slug) = slug {
            return self
                .insert_or_reconcile(NewShortUrl {
                    slug,
                    long_url,
                    expires_on,
                })
                .await;
        }

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let new_short_url = NewShortUrl {
                slug: generate_slug()?,
                long_url: long_url.clone(),
                expires_on,
            };

            match self.insert_or_reconcile(new_short_url).await? {
                CreationResult::DuplicateSlug => {
                    tracing::debug!(attempt, "Generated slug collided, retrying");
                }
                result => return Ok(result),
            }
        }

        Err(AppError::internal(format!(
            "Failed to generate a unique slug after {MAX_SLUG_ATTEMPTS} attempts"
        )))
    }

    async fn insert_or_reconcile(
        &self,
        new_short_url: NewShortUrl,
    ) -> Result<CreationResult, AppError> {
        let mut replaced_expired = false;

        loop {
            let constraint = match self.repository.insert(new_short_url.clone()).await {
                Ok(short_url) => {
                    tracing::info!(slug = %short_url.slug, id = short_url.id, "Short URL created");
                    return Ok(CreationResult::Created(short_url));
                }
                Err(StorageError::UniqueViolation { constraint }) => constraint,
                Err(e) => return Err(e.into()),
            };

            match self
                .repository
                .find_by_long_url(&new_short_url.long_url)
                .await?
            {
                Some(existing)
                    if !replaced_expired && existing.is_expired_at(self.clock.now()) =>
                {
                    self.repository.delete_by_slug(&existing.slug).await?;
                    tracing::info!(slug = %existing.slug, "Removed expired short URL ahead of sweep");
                    replaced_expired = true;
                }
                Some(existing) => return Ok(CreationResult::AlreadyExists(existing)),
                None => {
                    tracing::debug!(
                        slug = %new_short_url.slug,
                        constraint = constraint.map(|c| c.as_str()),
                        "Slug already taken"
                    );
                    return Ok(CreationResult::DuplicateSlug);
                }
            }
        }
    }

    /// Deletes a short URL and its clicks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage failures, or if more than one
    /// record matched the slug.
    pub async fn delete_short_url(&self, slug: &str) -> Result<DeleteResult, AppError> {
        match self.repository.delete_by_slug(slug).await? {
            0 => Ok(DeleteResult::NotFound),
            1 => {
                tracing::info!(%slug, "Short URL deleted");
                Ok(DeleteResult::Successful)
            }
            rows => Err(AppError::internal(format!(
                "Deleted {rows} short URLs for slug '{slug}'"
            ))),
        }
    }

    /// Resolves a slug to its long URL and queues a click.
    ///
    /// Returns `Ok(None)` for unknown slugs and for records whose expiry has
    /// passed but which the sweeper has not removed yet. A click that cannot
    /// be queued is logged and dropped; resolution still succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the lookup fails.
    pub async fn resolve_short_url(&self, slug: &str) -> Result<Option<String>, AppError> {
        let Some(short_url) = self.repository.find_by_slug(slug).await? else {
            return Ok(None);
        };

        let now = self.clock.now();
        if short_url.is_expired_at(now) {
            tracing::debug!(%slug, "Resolved an expired short URL");
            return Ok(None);
        }

        self.enqueue_click(ClickEvent::new(short_url.id, now));

        Ok(Some(short_url.long_url))
    }

    fn enqueue_click(&self, event: ClickEvent) {
        let short_url_id = event.short_url_id;

        match self.click_sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!(short_url_id, "Click queue full, dropping click");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!(short_url_id, "Click queue closed, dropping click");
            }
        }
    }

    /// Retrieves a short URL by slug without recording a click.
    pub async fn get_short_url(&self, slug: &str) -> Result<Option<ShortUrl>, AppError> {
        Ok(self.repository.find_by_slug(slug).await?)
    }

    /// Lists all short URLs ordered by creation time.
    pub async fn list_short_urls(&self) -> Result<Vec<ShortUrl>, AppError> {
        Ok(self.repository.list().await?)
    }

    /// Returns true if the storage backend is reachable.
    pub async fn storage_healthy(&self) -> bool {
        self.repository.health_check().await
    }
}
