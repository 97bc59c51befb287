use crate::services::capture::{CaptureError, CaptureResponse, CaptureService};
use async_trait::async_trait;
use reqwest::{Client, Url};

/// Talks to a LocalStack-style `/_aws/ses` capture endpoint over HTTP.
#[derive(Clone, Debug)]
pub struct HttpCaptureClient {
    client: Client,
    base_url: Url,
}

impl HttpCaptureClient {
    /// # Errors
    /// Returns an error if `base_url` is not a valid absolute URL.
    pub fn new(client: Client, base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)?;
        Ok(Self { client, base_url })
    }

    fn listing_url(&self, filter: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Some(address) = filter {
            url.query_pairs_mut().append_pair("email", address);
        }
        url
    }
}

#[async_trait]
impl CaptureService for HttpCaptureClient {
    async fn list(&self, filter: Option<&str>) -> Result<CaptureResponse, CaptureError> {
        let response = self.client.get(self.listing_url(filter)).send().await.map_err(CaptureError::Unreachable)?;
        let status = response.status();
        let body = response.json::<serde_json::Value>().await.map_err(CaptureError::InvalidBody)?;
        Ok(CaptureResponse { status, body })
    }

    async fn reset(&self) -> Result<(), CaptureError> {
        let response =
            self.client.delete(self.base_url.clone()).send().await.map_err(CaptureError::Unreachable)?;
        if !response.status().is_success() {
            return Err(CaptureError::Status(response.status()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_is_url_encoded() {
        let client = HttpCaptureClient::new(Client::new(), "http://localhost:4566/_aws/ses").unwrap();

        assert_eq!(client.listing_url(None).as_str(), "http://localhost:4566/_aws/ses");
        assert_eq!(
            client.listing_url(Some("a+b@x.com")).as_str(),
            "http://localhost:4566/_aws/ses?email=a%2Bb%40x.com"
        );
    }

    #[test]
    fn test_rejects_relative_url() {
        assert!(HttpCaptureClient::new(Client::new(), "/_aws/ses").is_err());
    }
}
