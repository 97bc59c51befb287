use crate::config::HealthConfig;
use crate::services::capture::CaptureService;
use crate::services::provider::EmailProvider;
use opentelemetry::{KeyValue, global, metrics::Gauge};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

#[derive(Clone, Debug)]
struct Metrics {
    status: Gauge<i64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("ses-dashboard");
        Self {
            status: meter
                .i64_gauge("dashboard_health_status")
                .with_description("Status of health checks (1 for ok, 0 for error)")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthService {
    provider: Arc<dyn EmailProvider>,
    capture: Arc<dyn CaptureService>,
    config: HealthConfig,
    metrics: Metrics,
}

impl HealthService {
    #[must_use]
    pub fn new(provider: Arc<dyn EmailProvider>, capture: Arc<dyn CaptureService>, config: HealthConfig) -> Self {
        Self { provider, capture, config, metrics: Metrics::new() }
    }

    /// Checks the provider by reading the send quota.
    ///
    /// # Errors
    /// Returns a string describing the failure if the provider is unreachable.
    pub async fn check_provider(&self) -> Result<(), String> {
        let provider_timeout = Duration::from_millis(self.config.provider_timeout_ms);

        let result = match timeout(provider_timeout, self.provider.send_quota()).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(format!("Provider check failed: {e}")),
            Err(_) => Err("Provider check timed out".to_string()),
        };
        self.record("provider", result.is_ok());
        result
    }

    /// Checks that the capture service answers a listing with a success status.
    ///
    /// # Errors
    /// Returns a string describing the failure if the capture service is unreachable.
    pub async fn check_capture(&self) -> Result<(), String> {
        let capture_timeout = Duration::from_millis(self.config.capture_timeout_ms);

        let result = match timeout(capture_timeout, self.capture.list(None)).await {
            Ok(Ok(resp)) if resp.status.is_success() => Ok(()),
            Ok(Ok(resp)) => Err(format!("Capture service answered {}", resp.status)),
            Ok(Err(e)) => Err(format!("Capture check failed: {e}")),
            Err(_) => Err("Capture check timed out".to_string()),
        };
        self.record("capture", result.is_ok());
        result
    }

    fn record(&self, component: &'static str, ok: bool) {
        self.metrics.status.record(i64::from(ok), &[KeyValue::new("component", component)]);
    }
}
