//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_BASE_URL` - Public URL for the admin panel
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 8081)
//! - `JFA_API_URL` - REST API base URL (default: `http://localhost:3000/api`)
//! - `JFA_API_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`,
//!   `SENTRY_TRACES_SAMPLE_RATE` - Error tracking
//! - `LOG_FORMAT` - `json` for structured logs

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use jfa_backend::{ApiConfig, DEFAULT_API_URL};
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Admin application configuration.
#[derive(Clone)]
pub struct AdminConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Public base URL; `https://` turns on secure cookies
    pub base_url: String,
    pub api: ApiConfig,
    pub sentry_dsn: Option<SecretString>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("api", &self.api)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("log_format", &self.log_format)
            .finish_non_exhaustive()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let value = |key: &str, default: &str| {
            lookup(key)
                .unwrap_or_else(|| default.to_owned())
                .trim()
                .to_owned()
        };
        let invalid = |key: &str, e: &dyn std::fmt::Display| {
            ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())
        };

        let host = value("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| invalid("ADMIN_HOST", &e))?;
        let port = value("ADMIN_PORT", "8081")
            .parse::<u16>()
            .map_err(|e| invalid("ADMIN_PORT", &e))?;
        let base_url = lookup("ADMIN_BASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("ADMIN_BASE_URL".to_owned()))?;

        let api_url = Url::parse(&value("JFA_API_URL", DEFAULT_API_URL))
            .map_err(|e| invalid("JFA_API_URL", &e))?;
        let timeout_secs = value("JFA_API_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| invalid("JFA_API_TIMEOUT_SECS", &e))?;
        let sentry_sample_rate = value("SENTRY_SAMPLE_RATE", "1.0")
            .parse::<f32>()
            .map_err(|e| invalid("SENTRY_SAMPLE_RATE", &e))?;
        let sentry_traces_sample_rate = value("SENTRY_TRACES_SAMPLE_RATE", "0.1")
            .parse::<f32>()
            .map_err(|e| invalid("SENTRY_TRACES_SAMPLE_RATE", &e))?;

        Ok(Self {
            host,
            port,
            base_url,
            api: ApiConfig {
                base_url: api_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            sentry_dsn: lookup("SENTRY_DSN").map(SecretString::from),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_defaults() {
        let config = AdminConfig::from_lookup(|key| {
            (key == "ADMIN_BASE_URL").then(|| "https://admin.jfa.test".to_owned())
        })
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8081");
        assert!(config.is_secure());
        assert_eq!(config.api.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_missing_base_url() {
        assert!(matches!(
            AdminConfig::from_lookup(|_| None),
            Err(ConfigError::MissingEnvVar(key)) if key == "ADMIN_BASE_URL"
        ));
    }

    #[test]
    fn test_bad_timeout() {
        let err = AdminConfig::from_lookup(|key| match key {
            "ADMIN_BASE_URL" => Some("http://localhost:8081".to_owned()),
            "JFA_API_TIMEOUT_SECS" => Some("-3".to_owned()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "JFA_API_TIMEOUT_SECS"));
    }
}
