//! PostgreSQL implementation of the click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::{ClickRepository, StorageError};

#[derive(FromRow)]
struct ClickRow {
    id: i64,
    short_url_id: i64,
    created_at: DateTime<Utc>,
}

/// PostgreSQL repository for the click log.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record_click(&self, new_click: NewClick) -> Result<Click, StorageError> {
        let row: ClickRow = sqlx::query_as(
            r#"
            INSERT INTO clicks (short_url_id, created_at)
            VALUES ($1, $2)
            RETURNING id, short_url_id, created_at
            "#,
        )
        .bind(new_click.short_url_id)
        .bind(new_click.created_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Click::new(row.id, row.short_url_id, row.created_at))
    }

    /// The outer join yields one grouped row per matching short URL even
    /// without clicks, so a missing row means the slug does not exist.
    async fn count_clicks(
        &self,
        slug: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Option<i64>, StorageError> {
        let count: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT COUNT(c.id)
            FROM short_urls s
            LEFT OUTER JOIN clicks c
                ON c.short_url_id = s.id
                AND ($2::timestamptz IS NULL OR c.created_at >= $2)
            WHERE s.slug = $1
            GROUP BY s.id
            "#,
        )
        .bind(slug)
        .bind(since)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(count)
    }
}
