//! HTTP server initialization and runtime setup.
//!
//! Handles storage setup, background tasks, and the Axum server lifecycle.

use crate::application::expiry_sweeper::ExpirySweeper;
use crate::config::{Config, StorageBackend};
use crate::domain::click_worker::run_click_worker;
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::repositories::{ClickRepository, ShortUrlRepository};
use crate::infrastructure::persistence::{InMemoryStore, PgClickRepository, PgShortUrlRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// How long shutdown waits for the click worker to drain the queue.
const CLICK_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Connects to PostgreSQL with the configured pool settings and applies
/// pending migrations.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(config.require_database_url()?)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    Ok(pool)
}

/// Repositories for the configured storage backend.
pub struct Repositories {
    pub short_urls: Arc<dyn ShortUrlRepository>,
    pub clicks: Arc<dyn ClickRepository>,
}

/// Builds the repositories for `config.storage_backend`.
///
/// # Errors
///
/// Returns an error if the PostgreSQL backend cannot be reached.
pub async fn build_repositories(config: &Config, clock: Arc<dyn Clock>) -> Result<Repositories> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = Arc::new(connect_database(config).await?);
            Ok(Repositories {
                short_urls: Arc::new(PgShortUrlRepository::new(pool.clone())),
                clicks: Arc::new(PgClickRepository::new(pool)),
            })
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            let store = Arc::new(InMemoryStore::new(clock));
            Ok(Repositories {
                short_urls: store.clone(),
                clicks: store,
            })
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage backend (PostgreSQL pool + migrations, or in-memory)
/// - Background click worker
/// - Expiry sweeper
/// - Axum HTTP server with graceful shutdown
///
/// On Ctrl-C or SIGTERM the server stops accepting connections, drains
/// in-flight requests, stops the sweeper, then waits for queued clicks to be
/// written.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let repositories = build_repositories(&config, clock.clone()).await?;

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);

    let click_worker = tokio::spawn(run_click_worker(click_rx, repositories.clicks.clone()));
    tracing::info!("Click worker started");

    let sweeper = ExpirySweeper::new(
        repositories.short_urls.clone(),
        clock.clone(),
        Duration::from_secs(config.sweep_interval_secs),
    )
    .start();

    let state = AppState::new(
        repositories.short_urls,
        repositories.clicks,
        clock,
        click_tx,
        config.base_url.clone(),
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.stop().await;

    // The router owned the last click sender, so the worker exits once the
    // queue is drained.
    match tokio::time::timeout(CLICK_DRAIN_TIMEOUT, click_worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "Click worker panicked"),
        Err(_) => tracing::warn!("Timed out draining click queue, remaining clicks dropped"),
    }

    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
