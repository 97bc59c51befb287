#![allow(dead_code)]
use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use ses_dashboard::AppBuilder;
use ses_dashboard::adapters::capture::HttpCaptureClient;
use ses_dashboard::api::{MgmtState, ServiceContainer};
use ses_dashboard::config::{
    CaptureConfig, Config, HealthConfig, LogFormat, ProviderConfig, RateLimitConfig, ServerConfig, TelemetryConfig,
};
use ses_dashboard::domain::stats::{SendDataPoint, SendQuota};
use ses_dashboard::services::provider::{EmailProvider, ProviderError, SendRequest};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use time::macros::datetime;
use tokio::net::TcpListener;

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("ses_dashboard=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

pub fn get_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            mgmt_port: 0,
            shutdown_timeout_secs: 1,
        },
        provider: ProviderConfig {
            region: "us-east-1".to_string(),
            endpoint: None,
            access_key: None,
            secret_key: None,
            default_sender: "sender@example.com".to_string(),
            verify_sender: false,
        },
        capture: CaptureConfig { base_url: "http://127.0.0.1:1/_aws/ses".to_string() },
        rate_limit: RateLimitConfig { per_second: 10_000, burst: 10_000 },
        health: HealthConfig { provider_timeout_ms: 500, capture_timeout_ms: 500 },
        telemetry: TelemetryConfig { log_format: LogFormat::Text, otlp_endpoint: None },
    }
}

/// In-memory stand-in for SES.
#[derive(Debug)]
pub struct FakeProvider {
    pub next_message_id: Mutex<String>,
    pub fail_send: AtomicBool,
    pub fail_quota: AtomicBool,
    pub fail_stats: AtomicBool,
    pub sent: Mutex<Vec<SendRequest>>,
    pub verified: Mutex<Vec<String>>,
    pub quota_calls: AtomicUsize,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            next_message_id: Mutex::new("m1".to_string()),
            fail_send: AtomicBool::new(false),
            fail_quota: AtomicBool::new(false),
            fail_stats: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
            verified: Mutex::new(Vec::new()),
            quota_calls: AtomicUsize::new(0),
        }
    }
}

impl FakeProvider {
    pub fn set_message_id(&self, id: &str) {
        *self.next_message_id.lock().unwrap() = id.to_string();
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailProvider for FakeProvider {
    async fn send_email(&self, request: &SendRequest) -> Result<String, ProviderError> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(ProviderError::Other(anyhow::anyhow!("connection refused")));
        }
        self.sent.lock().unwrap().push(request.clone());
        Ok(self.next_message_id.lock().unwrap().clone())
    }

    async fn verify_sender(&self, address: &str) -> Result<(), ProviderError> {
        self.verified.lock().unwrap().push(address.to_string());
        Ok(())
    }

    async fn send_quota(&self) -> Result<SendQuota, ProviderError> {
        self.quota_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_quota.load(Ordering::SeqCst) {
            return Err(ProviderError::Throttled);
        }
        Ok(SendQuota { max_24_hour_send: 200.0, max_send_rate: 1.0, sent_last_24_hours: 3.0 })
    }

    async fn send_statistics(&self) -> Result<Vec<SendDataPoint>, ProviderError> {
        if self.fail_stats.load(Ordering::SeqCst) {
            return Err(ProviderError::Other(anyhow::anyhow!("statistics unavailable")));
        }
        Ok(vec![
            SendDataPoint {
                timestamp: datetime!(2024-05-01 10:15 UTC),
                delivery_attempts: 4,
                bounces: 1,
                complaints: 0,
                rejects: 1,
            },
            SendDataPoint {
                timestamp: datetime!(2024-05-01 10:00 UTC),
                delivery_attempts: 2,
                bounces: 0,
                complaints: 1,
                rejects: 0,
            },
        ])
    }
}

#[derive(Clone, Debug)]
struct CaptureState {
    messages: Arc<Mutex<Value>>,
    status: Arc<Mutex<StatusCode>>,
    queries: Arc<Mutex<Vec<Option<String>>>>,
    resets: Arc<AtomicUsize>,
}

/// A LocalStack-like `/_aws/ses` endpoint served from memory.
#[derive(Clone, Debug)]
pub struct FakeCapture {
    pub base_url: String,
    state: CaptureState,
}

impl FakeCapture {
    pub async fn spawn(messages: Value) -> Self {
        let state = CaptureState {
            messages: Arc::new(Mutex::new(messages)),
            status: Arc::new(Mutex::new(StatusCode::OK)),
            queries: Arc::new(Mutex::new(Vec::new())),
            resets: Arc::new(AtomicUsize::new(0)),
        };

        let app = Router::new()
            .route("/_aws/ses", get(capture_list).delete(capture_reset))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url: format!("http://{addr}/_aws/ses"), state }
    }

    pub fn set_status(&self, status: StatusCode) {
        *self.state.status.lock().unwrap() = status;
    }

    pub fn set_messages(&self, messages: Value) {
        *self.state.messages.lock().unwrap() = messages;
    }

    pub fn queries(&self) -> Vec<Option<String>> {
        self.state.queries.lock().unwrap().clone()
    }

    pub fn resets(&self) -> usize {
        self.state.resets.load(Ordering::SeqCst)
    }
}

async fn capture_list(
    State(state): State<CaptureState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let email = params.get("email").cloned();
    state.queries.lock().unwrap().push(email.clone());

    let status = *state.status.lock().unwrap();
    if !status.is_success() {
        return (status, Json(json!({ "error": "capture unavailable" })));
    }

    let all = state.messages.lock().unwrap().clone();
    let messages: Vec<Value> = all
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter(|m| email.as_ref().is_none_or(|e| m["Source"] == json!(e)))
        .collect();

    (status, Json(json!({ "messages": messages })))
}

async fn capture_reset(State(state): State<CaptureState>) -> StatusCode {
    state.resets.fetch_add(1, Ordering::SeqCst);
    if let Some(list) = state.messages.lock().unwrap().as_array_mut() {
        list.clear();
    }
    StatusCode::NO_CONTENT
}

pub fn sample_messages() -> Value {
    json!([
        {
            "Id": "aaaaaaaa-1111",
            "Region": "us-east-1",
            "Destination": { "ToAddresses": ["alice@example.com"] },
            "Source": "sender@example.com",
            "Subject": "First",
            "Body": { "text_part": "first body", "html_part": null },
            "Timestamp": "2024-05-01T09:00:00Z"
        },
        {
            "Id": "bbbbbbbb-2222",
            "Region": "us-east-1",
            "Source": "other@example.com",
            "RawData": "To: bob@example.com\r\nSubject: Second\r\nContent-Type: text/plain\r\n\r\nsecond body\r\n",
            "Timestamp": "2024-05-01T11:00:00Z"
        }
    ])
}

pub struct TestApp {
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub config: Config,
    pub provider: Arc<FakeProvider>,
    pub services: ServiceContainer,
}

impl TestApp {
    pub async fn spawn(capture_url: &str) -> Self {
        Self::spawn_with(get_test_config(), Arc::new(FakeProvider::default()), capture_url).await
    }

    pub async fn spawn_with(mut config: Config, provider: Arc<FakeProvider>, capture_url: &str) -> Self {
        setup_tracing();
        config.capture.base_url = capture_url.to_string();

        let capture = Arc::new(HttpCaptureClient::new(reqwest::Client::new(), capture_url).unwrap());
        let app = AppBuilder::new(config.clone())
            .with_provider(provider.clone())
            .with_capture(capture)
            .build()
            .unwrap();

        let services = app.services.clone();
        let app_router = ses_dashboard::api::app_router(&config, app.services);
        let mgmt_router = ses_dashboard::api::mgmt_router(MgmtState { health_service: app.health_service });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app_router.into_make_service_with_connect_info::<SocketAddr>()).await.unwrap();
        });

        let mgmt_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_url = format!("http://{}", mgmt_listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(mgmt_listener, mgmt_router.into_make_service_with_connect_info::<SocketAddr>())
                .await
                .unwrap();
        });

        Self { server_url, mgmt_url, client: reqwest::Client::new(), config, provider, services }
    }

    pub async fn send(&self, body: Value) -> (reqwest::StatusCode, Value) {
        let resp = self.client.post(format!("{}/send", self.server_url)).json(&body).send().await.unwrap();
        let status = resp.status();
        let body = resp.json().await.unwrap();
        (status, body)
    }
}
