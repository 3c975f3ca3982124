//! Configuration management.

mod file_config;

pub use file_config::{find_config_file, load_config, save_config, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::SearchError;

/// Default login endpoint path
pub const DEFAULT_LOGIN_PATH: &str = "services/auth/login";
/// Default endpoint for asynchronous search jobs
pub const DEFAULT_ASYNC_JOBS_PATH: &str = "services/search/jobs";
/// Default endpoint for blocking export searches
pub const DEFAULT_SYNC_JOBS_PATH: &str = "servicesNS/admin/search/search/jobs/export";

/// Client configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base server URL, e.g. `https://splunk.example.com:8089`
    #[serde(default)]
    pub server: String,

    /// REST endpoint paths
    #[serde(default)]
    pub endpoints: EndpointConfig,

    /// HTTP transport settings
    #[serde(default)]
    pub transport: TransportConfig,

    /// Status polling bounds
    #[serde(default)]
    pub polling: PollConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ..Self::default()
        }
    }

    /// Check that the server is an absolute http(s) URL with a host
    pub fn validate(&self) -> Result<(), SearchError> {
        validate_server(&self.server)
    }
}

pub(crate) fn validate_server(server: &str) -> Result<(), SearchError> {
    let url = url::Url::parse(server)
        .map_err(|e| SearchError::InvalidArgument(format!("Invalid server URL {:?}: {}", server, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(SearchError::InvalidArgument(format!(
            "Unsupported scheme in server URL: {}",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(SearchError::InvalidArgument(format!(
            "Server URL has no host: {}",
            server
        )));
    }

    Ok(())
}

/// REST endpoint paths, relative to the server URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_login_path")]
    pub login_path: String,

    #[serde(default = "default_async_jobs_path")]
    pub async_jobs_path: String,

    #[serde(default = "default_sync_jobs_path")]
    pub sync_jobs_path: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            async_jobs_path: default_async_jobs_path(),
            sync_jobs_path: default_sync_jobs_path(),
        }
    }
}

impl EndpointConfig {
    /// Join a server URL and an endpoint path with exactly one slash
    pub fn join(server: &str, path: &str) -> String {
        format!(
            "{}/{}",
            server.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn login_url(&self, server: &str) -> String {
        Self::join(server, &self.login_path)
    }

    pub fn async_jobs_url(&self, server: &str) -> String {
        Self::join(server, &self.async_jobs_path)
    }

    pub fn sync_jobs_url(&self, server: &str) -> String {
        Self::join(server, &self.sync_jobs_path)
    }
}

fn default_login_path() -> String {
    DEFAULT_LOGIN_PATH.to_string()
}

fn default_async_jobs_path() -> String {
    DEFAULT_ASYNC_JOBS_PATH.to_string()
}

fn default_sync_jobs_path() -> String {
    DEFAULT_SYNC_JOBS_PATH.to_string()
}

/// HTTP transport configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Validate server TLS certificates. Off by default since most search
    /// heads use self-signed certificates on the management port.
    #[serde(default)]
    pub verify_tls: bool,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            verify_tls: false,
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout() -> u64 {
    300 // blocking export searches can run for minutes
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Bounds for waiting on an asynchronous job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Delay between status checks, in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Maximum number of status checks
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Optional overall deadline, in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_attempts: default_max_attempts(),
            timeout_ms: None,
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }
}

fn default_interval_ms() -> u64 {
    500
}

fn default_max_attempts() -> u32 {
    120
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `"json"` for structured output, anything else for plain text
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
