use crate::domain::inbox::InboxMessage;
use crate::services::capture::{CaptureError, CaptureResponse, CaptureService};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Message query unavailable: {0}")]
    Unavailable(#[from] CaptureError),
    #[error("Unexpected message listing: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct Listing {
    #[serde(default)]
    messages: Vec<InboxMessage>,
}

/// Forwards inbox queries to the capture service.
#[derive(Clone, Debug)]
pub struct InboxService {
    capture: Arc<dyn CaptureService>,
}

impl InboxService {
    #[must_use]
    pub fn new(capture: Arc<dyn CaptureService>) -> Self {
        Self { capture }
    }

    /// Relays the upstream listing, status and body untouched.
    ///
    /// # Errors
    /// Returns `QueryError::Unavailable` if the capture service cannot be reached.
    #[tracing::instrument(err(level = "warn"), skip(self), fields(upstream_status = tracing::field::Empty))]
    pub async fn list_messages(&self, filter: Option<&str>) -> Result<CaptureResponse, QueryError> {
        let filter = filter.map(str::trim).filter(|f| !f.is_empty());
        let response = self.capture.list(filter).await?;
        tracing::Span::current().record("upstream_status", response.status.as_u16());
        Ok(response)
    }

    /// Typed listing for in-process consumers.
    ///
    /// # Errors
    /// Returns `QueryError::Unavailable` if the service is unreachable or answers
    /// with a non-success status, and `QueryError::Decode` if the body is not a listing.
    pub async fn list_inbox(&self, filter: Option<&str>) -> Result<Vec<InboxMessage>, QueryError> {
        let response = self.list_messages(filter).await?;
        if !response.status.is_success() {
            return Err(CaptureError::Status(response.status).into());
        }
        let listing: Listing = serde_json::from_value(response.body)?;
        Ok(listing.messages)
    }

    /// # Errors
    /// Returns `QueryError::Unavailable` if the capture service refuses the reset.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn reset(&self) -> Result<(), QueryError> {
        self.capture.reset().await?;
        tracing::info!("Capture service messages cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct CannedCapture {
        status: StatusCode,
        body: serde_json::Value,
        filters: Mutex<Vec<Option<String>>>,
    }

    impl CannedCapture {
        fn new(status: StatusCode, body: serde_json::Value) -> Self {
            Self { status, body, filters: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl CaptureService for CannedCapture {
        async fn list(&self, filter: Option<&str>) -> Result<CaptureResponse, CaptureError> {
            self.filters.lock().unwrap().push(filter.map(str::to_owned));
            Ok(CaptureResponse { status: self.status, body: self.body.clone() })
        }

        async fn reset(&self) -> Result<(), CaptureError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_blank_filter_is_dropped() {
        let capture = Arc::new(CannedCapture::new(StatusCode::OK, json!({ "messages": [] })));
        let service = InboxService::new(capture.clone());

        service.list_messages(Some("  ")).await.unwrap();
        service.list_messages(Some("a@x.com")).await.unwrap();

        let filters = capture.filters.lock().unwrap().clone();
        assert_eq!(filters, [None, Some("a@x.com".to_string())]);
    }

    #[tokio::test]
    async fn test_non_ok_status_is_relayed() {
        let capture = Arc::new(CannedCapture::new(StatusCode::NOT_FOUND, json!({ "error": "nope" })));
        let service = InboxService::new(capture);

        let response = service.list_messages(None).await.unwrap();

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body, json!({ "error": "nope" }));
    }

    #[tokio::test]
    async fn test_typed_listing() {
        let body = json!({ "messages": [{ "Id": "m1", "Source": "s@x.com", "Timestamp": "2024-05-01T10:00:00Z" }] });
        let service = InboxService::new(Arc::new(CannedCapture::new(StatusCode::OK, body)));

        let messages = service.list_inbox(None).await.unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, "m1");
    }

    #[tokio::test]
    async fn test_typed_listing_keeps_records_without_timestamp() {
        let body = json!({ "messages": [
            { "Id": "m1", "Source": "s@x.com", "Timestamp": "2024-05-01T10:00:00Z" },
            { "Id": "m2", "Source": "s@x.com" }
        ] });
        let service = InboxService::new(Arc::new(CannedCapture::new(StatusCode::OK, body)));

        let messages = service.list_inbox(None).await.unwrap();

        assert_eq!(messages.len(), 2);
        assert!(messages[1].sent_at().is_none());
    }

    #[tokio::test]
    async fn test_typed_listing_rejects_error_status() {
        let service = InboxService::new(Arc::new(CannedCapture::new(StatusCode::BAD_GATEWAY, json!({}))));
        assert!(matches!(
            service.list_inbox(None).await,
            Err(QueryError::Unavailable(CaptureError::Status(StatusCode::BAD_GATEWAY)))
        ));
    }
}
