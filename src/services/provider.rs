use crate::domain::stats::{SendDataPoint, SendQuota};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request throttled by provider")]
    Throttled,
    #[error("Message rejected by provider: {0}")]
    Rejected(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("External service error: {0}")]
    Other(#[from] anyhow::Error),
}

/// A provider-native send request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub source: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait EmailProvider: Send + Sync + std::fmt::Debug {
    /// Submits a message and returns the provider-assigned message id.
    ///
    /// # Errors
    /// Returns a `ProviderError` if the provider refuses or cannot be reached.
    async fn send_email(&self, request: &SendRequest) -> Result<String, ProviderError>;

    /// Asks the provider to verify a sender identity.
    ///
    /// # Errors
    /// Returns a `ProviderError` if the request fails.
    async fn verify_sender(&self, address: &str) -> Result<(), ProviderError>;

    /// # Errors
    /// Returns a `ProviderError` if the request fails.
    async fn send_quota(&self) -> Result<SendQuota, ProviderError>;

    /// # Errors
    /// Returns a `ProviderError` if the request fails.
    async fn send_statistics(&self) -> Result<Vec<SendDataPoint>, ProviderError>;
}
