use async_trait::async_trait;
use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Capture service unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),
    #[error("Capture service returned an unreadable body: {0}")]
    InvalidBody(#[source] reqwest::Error),
    #[error("Capture service answered {0}")]
    Status(StatusCode),
}

/// The upstream answer, relayed without interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

#[async_trait]
pub trait CaptureService: Send + Sync + std::fmt::Debug {
    /// Lists recorded messages, optionally filtered by address.
    ///
    /// # Errors
    /// Returns a `CaptureError` if the service is unreachable or the body is not JSON.
    async fn list(&self, filter: Option<&str>) -> Result<CaptureResponse, CaptureError>;

    /// Drops every recorded message.
    ///
    /// # Errors
    /// Returns a `CaptureError` if the service is unreachable or refuses.
    async fn reset(&self) -> Result<(), CaptureError>;
}
