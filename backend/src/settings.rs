//! Server settings loaded via OrthoConfig.
//!
//! Values come from `CONSOLE_*` environment variables, configuration files
//! and command-line flags, in OrthoConfig's usual precedence.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised when a configured value cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address is not a socket address.
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        /// Configured text.
        value: String,
        /// Parser failure.
        #[source]
        source: std::net::AddrParseError,
    },
    /// The upstream base URL does not parse.
    #[error("invalid user service URL '{value}': {source}")]
    UserApiUrl {
        /// Configured text.
        value: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
}

/// Configuration for the console server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CONSOLE")]
pub struct ConsoleSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Base URL of the upstream user service. Unset serves fixture records.
    pub user_api_url: Option<String>,
    /// Upstream request timeout in milliseconds.
    #[ortho_config(default = 5000)]
    pub request_timeout_ms: u64,
    /// Window in milliseconds during which requests for one user share a fetch.
    #[ortho_config(default = 2000)]
    pub dedupe_interval_ms: u64,
    /// Time in milliseconds a page request waits for the record.
    #[ortho_config(default = 1500)]
    pub render_wait_ms: u64,
    /// Maximum number of user records kept in the fetch cache.
    #[ortho_config(default = 1024)]
    pub cache_capacity: usize,
}

impl ConsoleSettings {
    /// Parsed bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.trim().parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Parsed upstream base URL, if configured.
    pub fn user_api_url(&self) -> Result<Option<Url>, SettingsError> {
        self.user_api_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| {
                Url::parse(value).map_err(|source| SettingsError::UserApiUrl {
                    value: value.to_owned(),
                    source,
                })
            })
            .transpose()
    }

    /// Client timeout applied to each upstream request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Window during which requests for one key join the same fetch.
    pub fn dedupe_interval(&self) -> Duration {
        Duration::from_millis(self.dedupe_interval_ms)
    }

    /// Longest a page request waits before rendering the loading state.
    pub fn render_wait(&self) -> Duration {
        Duration::from_millis(self.render_wait_ms)
    }

    /// Number of user records retained by the fetch cache.
    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }
}
