//! Configuration for the PBX exporter.

use pbx_common::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Load(#[from] pbx_common::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Complete exporter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// PBX management API settings.
    #[serde(default)]
    pub pbx: PbxConfig,

    /// Prometheus exporter settings.
    #[serde(default)]
    pub prometheus: PrometheusConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// PBX management API connection settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct PbxConfig {
    /// Base URL of the PBX web interface, e.g. "https://pbx.example.com".
    #[serde(default)]
    pub url: String,

    /// Administrator user name.
    #[serde(default)]
    pub username: String,

    /// Administrator password.
    #[serde(default)]
    pub password: String,

    /// Deadline for a single API fetch (seconds).
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Skip TLS certificate verification (self-signed PBX certificates).
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_fetch_timeout() -> u64 {
    10
}

impl PbxConfig {
    /// The per-fetch deadline.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for PbxConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            password: String::new(),
            fetch_timeout_secs: default_fetch_timeout(),
            accept_invalid_certs: false,
        }
    }
}

// Keep the password out of logs.
impl std::fmt::Debug for PbxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PbxConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

/// Prometheus HTTP endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrometheusConfig {
    /// Address to listen on (default: "0.0.0.0:9523").
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Path for metrics endpoint (default: "/metrics").
    #[serde(default = "default_path")]
    pub path: String,
}

fn default_listen() -> String {
    "0.0.0.0:9523".to_string()
}

fn default_path() -> String {
    "/metrics".to_string()
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            path: default_path(),
        }
    }
}

impl ExporterConfig {
    /// Load configuration from a JSON5 file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config: ExporterConfig = pbx_common::load_config(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a JSON5 string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: ExporterConfig = pbx_common::parse_config(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.pbx.url.starts_with("http://") || self.pbx.url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "PBX url must start with http:// or https://, got '{}'",
                self.pbx.url
            )));
        }

        if self.pbx.username.is_empty() {
            return Err(ConfigError::Validation(
                "PBX username must not be empty".to_string(),
            ));
        }

        if self.pbx.fetch_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "fetch_timeout_secs must be > 0".to_string(),
            ));
        }

        // Validate listen address format
        if self
            .prometheus
            .listen
            .parse::<std::net::SocketAddr>()
            .is_err()
        {
            return Err(ConfigError::Validation(format!(
                "Invalid listen address: {}",
                self.prometheus.listen
            )));
        }

        // Validate path starts with /
        if !self.prometheus.path.starts_with('/') {
            return Err(ConfigError::Validation(
                "Metrics path must start with /".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbx_common::LogFormat;

    const MINIMAL: &str = r#"{
        pbx: { url: "https://pbx.example.com", username: "admin" }
    }"#;

    #[test]
    fn test_parse_minimal_config() {
        let config = ExporterConfig::parse(MINIMAL).unwrap();

        assert_eq!(config.pbx.url, "https://pbx.example.com");
        assert_eq!(config.pbx.fetch_timeout_secs, 10);
        assert!(!config.pbx.accept_invalid_certs);
        assert_eq!(config.prometheus.listen, "0.0.0.0:9523");
        assert_eq!(config.prometheus.path, "/metrics");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            pbx: {
                url: "https://pbx.example.com:5001",
                username: "admin",
                password: "secret",
                fetch_timeout_secs: 3,
                accept_invalid_certs: true,
            },
            prometheus: {
                listen: "127.0.0.1:9100",
                path: "/pbx/metrics",
            },
            logging: {
                level: "debug",
                format: "json"
            }
        }"#;

        let config = ExporterConfig::parse(json).unwrap();

        assert_eq!(config.pbx.url, "https://pbx.example.com:5001");
        assert_eq!(config.pbx.password, "secret");
        assert_eq!(config.pbx.fetch_timeout(), Duration::from_secs(3));
        assert!(config.pbx.accept_invalid_certs);
        assert_eq!(config.prometheus.listen, "127.0.0.1:9100");
        assert_eq!(config.prometheus.path, "/pbx/metrics");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_validate_missing_url() {
        let result = ExporterConfig::parse(r#"{ pbx: { username: "admin" } }"#);
        assert!(result.unwrap_err().to_string().contains("http://"));
    }

    #[test]
    fn test_validate_missing_username() {
        let result = ExporterConfig::parse(r#"{ pbx: { url: "https://pbx" } }"#);
        assert!(result.unwrap_err().to_string().contains("username"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let json = r#"{
            pbx: { url: "https://pbx", username: "admin", fetch_timeout_secs: 0 }
        }"#;
        assert!(ExporterConfig::parse(json).is_err());
    }

    #[test]
    fn test_validate_invalid_listen() {
        let json = r#"{
            pbx: { url: "https://pbx", username: "admin" },
            prometheus: { listen: "not-an-address" }
        }"#;

        let result = ExporterConfig::parse(json);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid listen address")
        );
    }

    #[test]
    fn test_validate_invalid_path() {
        let json = r#"{
            pbx: { url: "https://pbx", username: "admin" },
            prometheus: { path: "no-leading-slash" }
        }"#;

        let result = ExporterConfig::parse(json);
        assert!(result.unwrap_err().to_string().contains("must start with /"));
    }

    #[test]
    fn test_parse_invalid_syntax() {
        let result = ExporterConfig::parse("{ pbx: { url: ");
        assert!(matches!(result, Err(ConfigError::Load(_))));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to parse config"), "{err}");
    }

    #[test]
    fn test_debug_hides_password() {
        let config = PbxConfig {
            password: "hunter2".to_string(),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
