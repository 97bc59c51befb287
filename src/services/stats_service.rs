use crate::domain::stats::StatisticsSnapshot;
use crate::services::provider::{EmailProvider, ProviderError};
use opentelemetry::{global, metrics::Counter};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Statistics unavailable: {0}")]
    Unavailable(#[from] ProviderError),
}

#[derive(Clone, Debug)]
struct Metrics {
    fetch_failures: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("ses-dashboard");
        Self {
            fetch_failures: meter
                .u64_counter("dashboard_stats_fetch_failures_total")
                .with_description("Statistics snapshots that could not be assembled")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct StatsService {
    provider: Arc<dyn EmailProvider>,
    metrics: Metrics,
}

impl StatsService {
    #[must_use]
    pub fn new(provider: Arc<dyn EmailProvider>) -> Self {
        Self { provider, metrics: Metrics::new() }
    }

    /// Reads quota and statistics concurrently and joins them.
    ///
    /// # Errors
    /// Returns `StatsError::Unavailable` if either query fails. No partial
    /// snapshot is ever returned.
    #[tracing::instrument(err(level = "warn"), skip(self), fields(data_points = tracing::field::Empty))]
    pub async fn fetch_snapshot(&self) -> Result<StatisticsSnapshot, StatsError> {
        let joined = tokio::try_join!(self.provider.send_quota(), self.provider.send_statistics());

        let (quota, points) = joined.inspect_err(|_| self.metrics.fetch_failures.add(1, &[]))?;
        tracing::Span::current().record("data_points", points.len());

        Ok(StatisticsSnapshot::new(quota, points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stats::{SendDataPoint, SendQuota};
    use crate::services::provider::SendRequest;
    use async_trait::async_trait;
    use time::macros::datetime;

    #[derive(Debug, Default)]
    struct StaticProvider {
        fail_quota: bool,
        fail_stats: bool,
    }

    #[async_trait]
    impl EmailProvider for StaticProvider {
        async fn send_email(&self, _request: &SendRequest) -> Result<String, ProviderError> {
            Ok("unused".into())
        }

        async fn verify_sender(&self, _address: &str) -> Result<(), ProviderError> {
            Ok(())
        }

        async fn send_quota(&self) -> Result<SendQuota, ProviderError> {
            if self.fail_quota {
                return Err(ProviderError::Throttled);
            }
            Ok(SendQuota { max_24_hour_send: 200.0, max_send_rate: 1.0, sent_last_24_hours: 2.0 })
        }

        async fn send_statistics(&self) -> Result<Vec<SendDataPoint>, ProviderError> {
            if self.fail_stats {
                return Err(ProviderError::Other(anyhow::anyhow!("connection reset")));
            }
            Ok(vec![SendDataPoint {
                timestamp: datetime!(2024-05-01 10:00 UTC),
                delivery_attempts: 2,
                bounces: 1,
                complaints: 0,
                rejects: 0,
            }])
        }
    }

    #[tokio::test]
    async fn test_snapshot_joins_both_queries() {
        let service = StatsService::new(Arc::new(StaticProvider::default()));

        let snapshot = service.fetch_snapshot().await.unwrap();

        assert!((snapshot.send_quota.max_24_hour_send - 200.0).abs() < f64::EPSILON);
        assert_eq!(snapshot.send_statistics.send_data_points.len(), 1);
    }

    #[tokio::test]
    async fn test_quota_failure_fails_snapshot() {
        let service = StatsService::new(Arc::new(StaticProvider { fail_quota: true, ..Default::default() }));
        assert!(matches!(service.fetch_snapshot().await, Err(StatsError::Unavailable(ProviderError::Throttled))));
    }

    #[tokio::test]
    async fn test_statistics_failure_fails_snapshot() {
        let service = StatsService::new(Arc::new(StaticProvider { fail_stats: true, ..Default::default() }));
        assert!(service.fetch_snapshot().await.is_err());
    }
}
