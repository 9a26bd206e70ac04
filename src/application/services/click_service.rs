//! Click accounting service.

use std::sync::Arc;

use crate::domain::clock::Clock;
use crate::domain::entities::TimePeriod;
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// Outcome of [`ClickService::get_clicks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetClicksResult {
    /// The slug exists; `count` may be zero.
    Successful { count: i64 },
    /// No short URL has this slug.
    NotFound,
}

/// Service counting clicks over a time window.
pub struct ClickService {
    repository: Arc<dyn ClickRepository>,
    clock: Arc<dyn Clock>,
}

impl ClickService {
    pub fn new(repository: Arc<dyn ClickRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Counts clicks of `slug` inside `period`, measured back from the
    /// injected clock's current time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the count query fails.
    pub async fn get_clicks(
        &self,
        slug: &str,
        period: TimePeriod,
    ) -> Result<GetClicksResult, AppError> {
        let since = period.lower_bound(self.clock.now());

        let result = match self.repository.count_clicks(slug, since).await? {
            Some(count) => GetClicksResult::Successful { count },
            None => GetClicksResult::NotFound,
        };

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::domain::repositories::{MockClickRepository, StorageError};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 5, 10, 12, 0, 0).unwrap()
    }

    fn service(repository: MockClickRepository) -> ClickService {
        ClickService::new(Arc::new(repository), Arc::new(FixedClock::new(fixed_now())))
    }

    #[tokio::test]
    async fn test_all_time_has_no_lower_bound() {
        let mut mock_repo = MockClickRepository::new();

        mock_repo
            .expect_count_clicks()
            .withf(|slug, since| slug == "cf" && since.is_none())
            .times(1)
            .returning(|_, _| Ok(Some(4)));

        let result = service(mock_repo)
            .get_clicks("cf", TimePeriod::AllTime)
            .await
            .unwrap();

        assert_eq!(result, GetClicksResult::Successful { count: 4 });
    }

    #[tokio::test]
    async fn test_windowed_periods_use_clock() {
        let mut mock_repo = MockClickRepository::new();

        mock_repo
            .expect_count_clicks()
            .withf(|_, since| *since == Some(fixed_now() - Duration::days(7)))
            .times(1)
            .returning(|_, _| Ok(Some(3)));

        mock_repo
            .expect_count_clicks()
            .withf(|_, since| *since == Some(fixed_now() - Duration::hours(24)))
            .times(1)
            .returning(|_, _| Ok(Some(2)));

        let service = service(mock_repo);

        assert_eq!(
            service.get_clicks("cf", TimePeriod::PastWeek).await.unwrap(),
            GetClicksResult::Successful { count: 3 }
        );
        assert_eq!(
            service
                .get_clicks("cf", TimePeriod::Past24Hours)
                .await
                .unwrap(),
            GetClicksResult::Successful { count: 2 }
        );
    }

    #[tokio::test]
    async fn test_zero_clicks_is_distinct_from_not_found() {
        let mut mock_repo = MockClickRepository::new();

        mock_repo
            .expect_count_clicks()
            .returning(|slug, _| match slug {
                "quiet" => Ok(Some(0)),
                _ => Ok(None),
            });

        let service = service(mock_repo);

        assert_eq!(
            service.get_clicks("quiet", TimePeriod::AllTime).await.unwrap(),
            GetClicksResult::Successful { count: 0 }
        );
        assert_eq!(
            service
                .get_clicks("nonexistent", TimePeriod::AllTime)
                .await
                .unwrap(),
            GetClicksResult::NotFound
        );
    }

    #[tokio::test]
    async fn test_query_failure_is_internal_error() {
        let mut mock_repo = MockClickRepository::new();

        mock_repo
            .expect_count_clicks()
            .returning(|_, _| Err(StorageError::Backend("scan failed".into())));

        let result = service(mock_repo)
            .get_clicks("cf", TimePeriod::AllTime)
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }
}
