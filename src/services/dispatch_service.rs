use crate::config::ProviderConfig;
use crate::domain::message::OutgoingMessage;
use crate::domain::outcome::{SimulationOutcome, classify};
use crate::services::provider::{EmailProvider, ProviderError, SendRequest};
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Transmission failed: {0}")]
    TransmissionFailed(#[from] ProviderError),
}

pub type DispatchResult = Result<String, DispatchError>;

#[derive(Clone, Debug)]
struct Metrics {
    emails_sent: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("ses-dashboard");
        Self {
            emails_sent: meter
                .u64_counter("dashboard_emails_sent_total")
                .with_description("Send requests by reported outcome")
                .build(),
        }
    }
}

/// Sends test messages through the provider and reports the simulated outcome.
#[derive(Clone, Debug)]
pub struct DispatchService {
    provider: Arc<dyn EmailProvider>,
    sender: String,
    verify_sender: bool,
    metrics: Metrics,
}

impl DispatchService {
    #[must_use]
    pub fn new(provider: Arc<dyn EmailProvider>, config: &ProviderConfig) -> Self {
        Self {
            provider,
            sender: config.default_sender.clone(),
            verify_sender: config.verify_sender,
            metrics: Metrics::new(),
        }
    }

    /// Transmits a message through the provider.
    ///
    /// Every directive uses the configured sender. When sender verification is
    /// enabled it runs before every send, whatever the directive.
    ///
    /// # Errors
    /// Returns `DispatchError::TransmissionFailed` if verification or the send fails.
    #[tracing::instrument(
        skip(self, message),
        fields(directive = %message.directive, message_id = tracing::field::Empty)
    )]
    pub async fn dispatch(&self, message: &OutgoingMessage) -> DispatchResult {
        if self.verify_sender {
            self.provider.verify_sender(&self.sender).await?;
        }

        let request = SendRequest {
            source: self.sender.clone(),
            to: message.recipient.clone(),
            subject: message.subject.clone(),
            body: message.body.clone(),
        };

        let message_id = self.provider.send_email(&request).await?;
        tracing::Span::current().record("message_id", tracing::field::display(&message_id));
        Ok(message_id)
    }

    /// Sends first, then classifies. Simulated outcomes never suppress the send.
    pub async fn send(&self, message: OutgoingMessage) -> SimulationOutcome {
        let result = self.dispatch(&message).await;
        let outcome = classify(message.directive, &result);

        if let Err(e) = &result {
            tracing::error!(error = %e, "Failed to send email");
        } else {
            tracing::info!(outcome = outcome.label(), message_id = ?outcome.message_id(), "Email sent");
        }
        self.metrics.emails_sent.add(1, &[KeyValue::new("outcome", outcome.label())]);

        outcome
    }
}
