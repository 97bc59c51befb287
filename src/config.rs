use clap::{Args, Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub provider: ProviderConfig,

    #[command(flatten)]
    pub capture: CaptureConfig,

    #[command(flatten)]
    pub rate_limit: RateLimitConfig,

    #[command(flatten)]
    pub health: HealthConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "SESDASH_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "SESDASH_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for the management server (health probes)
    #[arg(long, env = "SESDASH_MGMT_PORT", default_value_t = 9090)]
    pub mgmt_port: u16,

    /// Seconds to wait for in-flight work during shutdown
    #[arg(long, env = "SESDASH_SHUTDOWN_TIMEOUT_SECS", default_value_t = 5)]
    pub shutdown_timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct ProviderConfig {
    /// SES region
    #[arg(long = "ses-region", env = "SESDASH_SES_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Custom SES endpoint (e.g. LocalStack at http://localhost:4566)
    #[arg(long = "ses-endpoint", env = "SESDASH_SES_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Static access key; falls back to the default credential chain when unset
    #[arg(long = "ses-access-key", env = "SESDASH_SES_ACCESS_KEY")]
    pub access_key: Option<String>,

    /// Static secret key
    #[arg(long = "ses-secret-key", env = "SESDASH_SES_SECRET_KEY")]
    pub secret_key: Option<String>,

    /// Verified sender address used for every outgoing message
    #[arg(long, env = "SESDASH_DEFAULT_SENDER", default_value = "sender@example.com")]
    pub default_sender: String,

    /// Request verification of the sender before each send
    #[arg(long, env = "SESDASH_VERIFY_SENDER", default_value_t = false)]
    pub verify_sender: bool,
}

#[derive(Clone, Debug, Args)]
pub struct CaptureConfig {
    /// Base URL of the local mail-capture endpoint
    #[arg(long = "capture-url", env = "SESDASH_CAPTURE_URL", default_value = "http://localhost:4566/_aws/ses")]
    pub base_url: String,
}

#[derive(Clone, Debug, Args)]
pub struct RateLimitConfig {
    /// Requests per second allowed per client
    #[arg(long, env = "SESDASH_RATE_LIMIT_PER_SECOND", default_value_t = 10)]
    pub per_second: u32,

    /// Burst allowance per client
    #[arg(long, env = "SESDASH_RATE_LIMIT_BURST", default_value_t = 20)]
    pub burst: u32,
}

#[derive(Clone, Debug, Args)]
pub struct HealthConfig {
    /// Timeout for the provider readiness check
    #[arg(long, env = "SESDASH_HEALTH_PROVIDER_TIMEOUT_MS", default_value_t = 2000)]
    pub provider_timeout_ms: u64,

    /// Timeout for the capture service readiness check
    #[arg(long, env = "SESDASH_HEALTH_CAPTURE_TIMEOUT_MS", default_value_t = 2000)]
    pub capture_timeout_ms: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "SESDASH_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP collector endpoint; export is disabled when unset
    #[arg(long, env = "SESDASH_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
