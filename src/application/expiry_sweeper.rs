//! Periodic removal of expired short URLs.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::clock::Clock;
use crate::domain::repositories::ShortUrlRepository;
use crate::error::AppError;

/// Background task deleting short URLs whose `expires_on` has passed.
///
/// Owned by the composition root: [`ExpirySweeper::start`] spawns the loop
/// and returns a [`SweeperHandle`] used to stop it on shutdown. A failed tick
/// is logged and the next tick runs as scheduled.
pub struct ExpirySweeper {
    repository: Arc<dyn ShortUrlRepository>,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl ExpirySweeper {
    pub fn new(
        repository: Arc<dyn ShortUrlRepository>,
        clock: Arc<dyn Clock>,
        interval: Duration,
    ) -> Self {
        Self {
            repository,
            clock,
            interval,
        }
    }

    /// Deletes every short URL with `expires_on <= now` and returns how many
    /// were removed.
    pub async fn sweep_once(&self) -> Result<u64, AppError> {
        let now = self.clock.now();
        Ok(self.repository.delete_expired(now).await?)
    }

    async fn tick(&self) {
        match self.sweep_once().await {
            Ok(0) => {}
            Ok(deleted) => tracing::info!(deleted, "Deleted expired short URLs"),
            Err(e) => tracing::error!(error = %e, "Expiry sweep failed"),
        }
    }

    /// Spawns the sweep loop.
    ///
    /// The first sweep runs one interval after start. Dropping the returned
    /// handle also stops the loop.
    pub fn start(self) -> SweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(());

        tracing::info!(interval = ?self.interval, "Expiry sweeper started");

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval() completes its first tick immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => self.tick().await,
                    _ = shutdown_rx.changed() => break,
                }
            }

            tracing::info!("Expiry sweeper stopped");
        });

        SweeperHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Handle to a running [`ExpirySweeper`].
pub struct SweeperHandle {
    shutdown: watch::Sender<()>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the loop to stop and waits for it to finish.
    ///
    /// A sweep already in progress completes first.
    pub async fn stop(self) {
        let _ = self.shutdown.send(());

        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Expiry sweeper task failed");
        }
    }
}
