//! PostgreSQL implementation of the short URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::domain::repositories::{ShortUrlRepository, StorageError};

#[derive(FromRow)]
struct ShortUrlRow {
    id: i64,
    slug: String,
    long_url: String,
    created_at: DateTime<Utc>,
    expires_on: Option<DateTime<Utc>>,
}

impl From<ShortUrlRow> for ShortUrl {
    fn from(row: ShortUrlRow) -> Self {
        ShortUrl::new(row.id, row.slug, row.long_url, row.created_at, row.expires_on)
    }
}

/// PostgreSQL repository for short URL records.
///
/// Uniqueness and the click cascade are enforced by the schema
/// (`uq_short_urls_slug`, `uq_short_urls_long_url`, `ON DELETE CASCADE`).
pub struct PgShortUrlRepository {
    pool: Arc<PgPool>,
}

impl PgShortUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShortUrlRepository for PgShortUrlRepository {
    async fn insert(&self, new_short_url: NewShortUrl) -> Result<ShortUrl, StorageError> {
        let row: ShortUrlRow = sqlx::query_as(
            r#"
            INSERT INTO short_urls (slug, long_url, expires_on)
            VALUES ($1, $2, $3)
            RETURNING id, slug, long_url, created_at, expires_on
            "#,
        )
        .bind(&new_short_url.slug)
        .bind(&new_short_url.long_url)
        .bind(new_short_url.expires_on)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortUrl>, StorageError> {
        let row: Option<ShortUrlRow> = sqlx::query_as(
            r#"
            SELECT id, slug, long_url, created_at, expires_on
            FROM short_urls
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortUrl::from))
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortUrl>, StorageError> {
        let row: Option<ShortUrlRow> = sqlx::query_as(
            r#"
            SELECT id, slug, long_url, created_at, expires_on
            FROM short_urls
            WHERE long_url = $1
            "#,
        )
        .bind(long_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortUrl::from))
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM short_urls WHERE slug = $1")
            .bind(slug)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, StorageError> {
        let result = sqlx::query(
            "DELETE FROM short_urls WHERE expires_on IS NOT NULL AND expires_on <= $1",
        )
        .bind(now)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn list(&self) -> Result<Vec<ShortUrl>, StorageError> {
        let rows: Vec<ShortUrlRow> = sqlx::query_as(
            r#"
            SELECT id, slug, long_url, created_at, expires_on
            FROM short_urls
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ShortUrl::from).collect())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
