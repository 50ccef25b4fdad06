//! Client configuration
//!
//! The executor only ever sees a [`ClientConfig`]. Environment variables and
//! the optional TOML file are folded into it by the CLI layer.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::core::SecretRedactor;

/// Endpoint used when nothing else is configured
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080/kip";

/// Ceiling for a whole request, connect through body
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration errors, reported before any request is sent
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Timeout must be greater than zero")]
    ZeroTimeout,
}

/// How the `Authorization` header is filled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// Full header value, sent as-is
    Header(String),
}

impl Authorization {
    pub fn header_value(&self) -> String {
        match self {
            Authorization::Bearer(token) => format!("Bearer {}", token),
            Authorization::Header(value) => value.clone(),
        }
    }
}

/// Optional TOML config file
///
/// ```toml
/// server_url = "https://nexus.example.com/kip"
/// api_key = "..."
/// timeout_ms = 10000
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub server_url: Option<String>,
    pub api_key: Option<String>,
    pub auth_header: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values taken from flags or the environment; these beat the config file
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub server_url: Option<String>,
    pub api_key: Option<String>,
    pub auth_header: Option<String>,
    pub timeout_ms: Option<u64>,
}

/// Everything the executor needs to reach the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_url: String,
    pub authorization: Option<Authorization>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            authorization: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    #[allow(dead_code)]
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    #[allow(dead_code)]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.authorization = Some(Authorization::Bearer(api_key.into()));
        self
    }

    #[allow(dead_code)]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Merge overrides, file and defaults, in that order of precedence.
    ///
    /// Blank values count as unset. A raw auth header beats an API key
    /// from the same source.
    pub fn resolve(overrides: ConfigOverrides, file: Option<ConfigFile>) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();

        let server_url = non_blank(overrides.server_url)
            .or_else(|| non_blank(file.server_url))
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        validate_url(&server_url)?;

        let authorization = non_blank(overrides.auth_header)
            .map(Authorization::Header)
            .or_else(|| non_blank(overrides.api_key).map(Authorization::Bearer))
            .or_else(|| non_blank(file.auth_header).map(Authorization::Header))
            .or_else(|| non_blank(file.api_key).map(Authorization::Bearer));

        let timeout = match overrides.timeout_ms.or(file.timeout_ms) {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            server_url,
            authorization,
            timeout,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn validate_url(url: &str) -> Result<(), ConfigError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
        url: SecretRedactor::redact_text(url),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl {
            url: SecretRedactor::redact_text(url),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
