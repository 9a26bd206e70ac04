//! Background worker persisting click events.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::{ClickRepository, StorageError};

/// Retries after the first failed attempt.
const MAX_RETRIES: usize = 3;

/// Drains the click channel until every sender is dropped.
///
/// Each event is written with [`record_click_with_retry`]. Failures are logged
/// and the event is dropped; nothing is reported back to the resolver.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<dyn ClickRepository>,
) {
    while let Some(event) = rx.recv().await {
        let short_url_id = event.short_url_id;

        if let Err(e) = record_click_with_retry(repository.as_ref(), event).await {
            tracing::warn!(short_url_id, error = %e, "Dropping click event");
        }
    }

    tracing::info!("Click worker stopped");
}

/// Persists one click, retrying transient storage failures with jittered
/// exponential backoff.
///
/// A click whose short URL was deleted in the meantime is not retried.
pub async fn record_click_with_retry(
    repository: &dyn ClickRepository,
    event: ClickEvent,
) -> Result<Click, StorageError> {
    let new_click = NewClick::from(event);

    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(1))
        .map(jitter)
        .take(MAX_RETRIES);

    RetryIf::start(
        strategy,
        || repository.record_click(new_click.clone()),
        |e: &StorageError| e.is_transient(),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockClickRepository;
    use chrono::Utc;

    #[tokio::test(start_paused = true)]
    async fn test_records_click_on_first_attempt() {
        let mut mock_repo = MockClickRepository::new();
        let now = Utc::now();

        mock_repo
            .expect_record_click()
            .withf(move |c| c.short_url_id == 3 && c.created_at == now)
            .times(1)
            .returning(|c| Ok(Click::new(1, c.short_url_id, c.created_at)));

        let click = record_click_with_retry(&mock_repo, ClickEvent::new(3, now))
            .await
            .unwrap();

        assert_eq!(click.short_url_id, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_errors() {
        let mut mock_repo = MockClickRepository::new();
        let mut seq = mockall::Sequence::new();

        mock_repo
            .expect_record_click()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(StorageError::Backend("connection reset".into())));
        mock_repo
            .expect_record_click()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|c| Ok(Click::new(9, c.short_url_id, c.created_at)));

        let result = record_click_with_retry(&mock_repo, ClickEvent::new(3, Utc::now())).await;

        assert_eq!(result.unwrap().id, 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_retries() {
        let mut mock_repo = MockClickRepository::new();

        mock_repo
            .expect_record_click()
            .times(MAX_RETRIES + 1)
            .returning(|_| Err(StorageError::Backend("database is down".into())));

        let result = record_click_with_retry(&mock_repo, ClickEvent::new(3, Utc::now())).await;

        assert!(matches!(result, Err(StorageError::Backend(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_does_not_retry_missing_short_url() {
        let mut mock_repo = MockClickRepository::new();

        mock_repo
            .expect_record_click()
            .times(1)
            .returning(|_| Err(StorageError::MissingShortUrl));

        let result = record_click_with_retry(&mock_repo, ClickEvent::new(3, Utc::now())).await;

        assert!(matches!(result, Err(StorageError::MissingShortUrl)));
    }

    #[tokio::test]
    async fn test_worker_drains_channel_until_closed() {
        let mut mock_repo = MockClickRepository::new();

        mock_repo
            .expect_record_click()
            .times(3)
            .returning(|c| Ok(Click::new(1, c.short_url_id, c.created_at)));

        let (tx, rx) = mpsc::channel(10);
        let worker = tokio::spawn(run_click_worker(rx, Arc::new(mock_repo)));

        for id in 1..=3 {
            tx.send(ClickEvent::new(id, Utc::now())).await.unwrap();
        }
        drop(tx);

        worker.await.unwrap();
    }
}
