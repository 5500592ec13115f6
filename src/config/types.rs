use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::error::{Error, Result};

/// Upper bound for `session.idle_timeout_seconds` (one year)
pub const MAX_IDLE_TIMEOUT_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// SPARQL endpoint configuration
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Ontology configuration
    #[serde(default)]
    pub ontology: OntologyConfig,

    /// Session configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Rejects values that would only fail later at query time
    pub fn validate(&self) -> Result<()> {
        require_absolute("endpoint.url", &self.endpoint.url)?;
        require_absolute("ontology.default_namespace", &self.ontology.default_namespace)?;

        if self.endpoint.timeout_seconds == 0 {
            return Err(Error::Config(
                "endpoint.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.endpoint.connect_timeout_seconds == 0 {
            return Err(Error::Config(
                "endpoint.connect_timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.session.idle_timeout_seconds == 0
            || self.session.idle_timeout_seconds > MAX_IDLE_TIMEOUT_SECONDS
        {
            return Err(Error::Config(format!(
                "session.idle_timeout_seconds must be between 1 and {}",
                MAX_IDLE_TIMEOUT_SECONDS
            )));
        }
        Ok(())
    }
}

fn require_absolute(field: &str, value: &str) -> Result<()> {
    match Url::parse(value) {
        Ok(url) if !url.cannot_be_a_base() => Ok(()),
        Ok(_) => Err(Error::Config(format!("{} must be a hierarchical URL: {}", field, value))),
        Err(e) => Err(Error::Config(format!("{} is not an absolute URL ({}): {}", field, e, value))),
    }
}

/// SPARQL endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Query endpoint URL
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// Attempts per query, including the first
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between attempts; grows linearly per attempt
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,

    /// User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3030/firesat/sparql".to_string(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay(),
            user_agent: default_user_agent(),
        }
    }
}

/// Ontology configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyConfig {
    /// Namespace prepended to bare subject terms
    pub default_namespace: String,
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            default_namespace: "http://imce.jpl.nasa.gov/foundation/".to_string(),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds of inactivity before a session may be purged
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_seconds: default_idle_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (error, warn, info, debug, trace)
    pub level: String,

    /// Write logs to stderr
    #[serde(default = "default_true")]
    pub console: bool,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,

    /// Directory for rolling log files; no file output when unset
    pub file_dir: Option<PathBuf>,

    /// File rotation strategy
    #[serde(default)]
    pub rotation: LogRotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: true,
            json: false,
            file_dir: None,
            rotation: LogRotation::Daily,
        }
    }
}

/// Log file rotation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Daily rotation
    #[default]
    Daily,
    /// Hourly rotation
    Hourly,
    /// Single file
    Never,
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    500
}

fn default_user_agent() -> String {
    format!("nl2sparql/{}", env!("CARGO_PKG_VERSION"))
}

fn default_idle_timeout() -> u64 {
    1800
}

fn default_true() -> bool {
    true
}
