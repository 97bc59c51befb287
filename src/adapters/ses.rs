use crate::domain::stats::{SendDataPoint, SendQuota};
use crate::services::provider::{EmailProvider, ProviderError, SendRequest};
use async_trait::async_trait;
use aws_sdk_ses::Client;
use aws_sdk_ses::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ses::types::{Body, Content, Destination, Message};
use time::OffsetDateTime;

const CHARSET: &str = "UTF-8";

/// SES (v1 API) implementation of the provider seam.
#[derive(Clone, Debug)]
pub struct SesProvider {
    client: Client,
}

impl SesProvider {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

fn provider_error<E, R>(err: &SdkError<E, R>) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let detail = DisplayErrorContext(err).to_string();
    match err.code() {
        Some("Throttling" | "ThrottlingException") => ProviderError::Throttled,
        Some("MessageRejected" | "MailFromDomainNotVerifiedException") => ProviderError::Rejected(detail),
        Some("InvalidParameterValue") => ProviderError::InvalidRequest(detail),
        _ => ProviderError::Other(anyhow::anyhow!(detail)),
    }
}

fn content(data: &str) -> Result<Content, ProviderError> {
    Content::builder()
        .data(data)
        .charset(CHARSET)
        .build()
        .map_err(|e| ProviderError::InvalidRequest(e.to_string()))
}

#[async_trait]
impl EmailProvider for SesProvider {
    async fn send_email(&self, request: &SendRequest) -> Result<String, ProviderError> {
        let message = Message::builder()
            .subject(content(&request.subject)?)
            .body(Body::builder().text(content(&request.body)?).build())
            .build();

        let output = self
            .client
            .send_email()
            .source(&request.source)
            .destination(Destination::builder().to_addresses(&request.to).build())
            .message(message)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %DisplayErrorContext(&e), to = %request.to, "SES SendEmail failed");
                provider_error(&e)
            })?;

        Ok(output.message_id().to_string())
    }

    async fn verify_sender(&self, address: &str) -> Result<(), ProviderError> {
        self.client.verify_email_identity().email_address(address).send().await.map_err(|e| {
            tracing::error!(error = %DisplayErrorContext(&e), address = %address, "SES VerifyEmailIdentity failed");
            provider_error(&e)
        })?;
        Ok(())
    }

    async fn send_quota(&self) -> Result<SendQuota, ProviderError> {
        let output = self.client.get_send_quota().send().await.map_err(|e| {
            tracing::error!(error = %DisplayErrorContext(&e), "SES GetSendQuota failed");
            provider_error(&e)
        })?;

        Ok(SendQuota {
            max_24_hour_send: output.max24_hour_send(),
            max_send_rate: output.max_send_rate(),
            sent_last_24_hours: output.sent_last24_hours(),
        })
    }

    async fn send_statistics(&self) -> Result<Vec<SendDataPoint>, ProviderError> {
        let output = self.client.get_send_statistics().send().await.map_err(|e| {
            tracing::error!(error = %DisplayErrorContext(&e), "SES GetSendStatistics failed");
            provider_error(&e)
        })?;

        let points = output
            .send_data_points()
            .iter()
            .filter_map(|point| {
                let Some(timestamp) = point.timestamp().and_then(|ts| {
                    OffsetDateTime::from_unix_timestamp_nanos(ts.as_nanos()).ok()
                }) else {
                    tracing::warn!("Skipping SES data point without a usable timestamp");
                    return None;
                };
                Some(SendDataPoint {
                    timestamp,
                    delivery_attempts: point.delivery_attempts(),
                    bounces: point.bounces(),
                    complaints: point.complaints(),
                    rejects: point.rejects(),
                })
            })
            .collect();

        Ok(points)
    }
}
