#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

pub mod adapters;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod services;
pub mod telemetry;

use crate::api::ServiceContainer;
use crate::config::{Config, ProviderConfig};
use crate::services::capture::CaptureService;
use crate::services::dispatch_service::DispatchService;
use crate::services::health_service::HealthService;
use crate::services::inbox_service::InboxService;
use crate::services::provider::EmailProvider;
use crate::services::stats_service::StatsService;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug)]
pub struct App {
    pub services: ServiceContainer,
    pub health_service: HealthService,
}

/// Wires services from their external collaborators.
#[derive(Debug)]
pub struct AppBuilder {
    config: Config,
    provider: Option<Arc<dyn EmailProvider>>,
    capture: Option<Arc<dyn CaptureService>>,
}

impl AppBuilder {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config, provider: None, capture: None }
    }

    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn EmailProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn with_capture(mut self, capture: Arc<dyn CaptureService>) -> Self {
        self.capture = Some(capture);
        self
    }

    /// # Errors
    /// Returns an error if the provider or the capture service was not supplied.
    pub fn build(self) -> anyhow::Result<App> {
        let provider = self.provider.ok_or_else(|| anyhow::anyhow!("Email provider is required"))?;
        let capture = self.capture.ok_or_else(|| anyhow::anyhow!("Capture service is required"))?;

        let services = ServiceContainer {
            dispatch_service: DispatchService::new(Arc::clone(&provider), &self.config.provider),
            stats_service: StatsService::new(Arc::clone(&provider)),
            inbox_service: InboxService::new(Arc::clone(&capture)),
        };
        let health_service = HealthService::new(provider, capture, self.config.health.clone());

        Ok(App { services, health_service })
    }
}

/// Builds an SES client, honouring a custom endpoint and static credentials when set.
pub async fn initialize_ses_client(config: &ProviderConfig) -> aws_sdk_ses::Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }
    if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
        loader = loader.credentials_provider(aws_credential_types::Credentials::new(
            access_key, secret_key, None, None, "static",
        ));
    }

    let sdk_config = loader.load().await;
    aws_sdk_ses::Client::new(&sdk_config)
}

/// Flips the shutdown channel on Ctrl-C or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
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
            () = ctrl_c => {},
            () = terminate => {},
        }

        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });
}

/// Routes panics through tracing so they reach the configured log sink.
pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(panic = %info, backtrace = %backtrace, "Panic occurred");
    }));
}
