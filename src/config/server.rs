//! HTTP server settings: bind address, deadlines, CORS, log filter

use std::net::SocketAddr;
use std::time::Duration;

use http::HeaderValue;
use serde::Deserialize;

use super::error::ValidationError;

/// Longest request deadline accepted, in seconds.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Headroom between the upstream deadline and the request deadline, so a
/// slow Shopify call fails as an upstream error before the server gives up.
const UPSTREAM_DEADLINE_MARGIN: Duration = Duration::from_millis(250);

/// Server settings (`REFILL__SERVER__*`)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,

    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub log_level: String,

    /// Whole-request deadline; the Shopify call gets slightly less
    pub request_timeout_secs: u64,

    /// Comma-separated storefront origins allowed by CORS; any origin when unset
    pub cors_origins: Option<String>,

    /// Name reported by `/health`
    pub service_name: String,
}

/// Deployment environment; production switches logs to JSON
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ValidationError::InvalidHost)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Deadline for a whole inbound request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Deadline for the Shopify call, strictly inside the request deadline.
    pub fn upstream_timeout(&self) -> Duration {
        self.request_timeout()
            .saturating_sub(UPSTREAM_DEADLINE_MARGIN)
            .max(Duration::from_millis(1))
    }

    /// Origins allowed by CORS. Blank and unparseable entries are skipped.
    pub fn allowed_origins(&self) -> Vec<HeaderValue> {
        self.cors_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        self.socket_addr().map(|_| ())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: Environment::Development,
            log_level: "info,refill_check=debug,tower_http=info".to_string(),
            request_timeout_secs: 30,
            cors_origins: None,
            service_name: "refill-backend".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_all_interfaces() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr(), Ok("0.0.0.0:8080".parse().unwrap()));
        assert_eq!(config.service_name, "refill-backend");
        assert!(!config.is_production());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bind_address_must_be_an_ip() {
        let config = ServerConfig {
            host: "refill.internal".to_string(),
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), Err(ValidationError::InvalidHost));
        assert_eq!(config.validate(), Err(ValidationError::InvalidHost));
    }

    #[test]
    fn upstream_deadline_is_inside_request_deadline() {
        for secs in [1, 2, 30, MAX_REQUEST_TIMEOUT_SECS] {
            let config = ServerConfig {
                request_timeout_secs: secs,
                ..Default::default()
            };
            assert!(config.upstream_timeout() < config.request_timeout());
            assert!(config.upstream_timeout() >= config.request_timeout() - UPSTREAM_DEADLINE_MARGIN);
        }
    }

    #[test]
    fn one_second_request_leaves_750ms_upstream() {
        let config = ServerConfig {
            request_timeout_secs: 1,
            ..Default::default()
        };
        assert_eq!(config.upstream_timeout(), Duration::from_millis(750));
    }

    #[test]
    fn storefront_origins_are_split_and_trimmed() {
        let config = ServerConfig {
            cors_origins: Some(
                " https://white-boutique-sa.myshopify.com,,https://whiteboutique.co.za ".to_string(),
            ),
            ..Default::default()
        };
        assert_eq!(
            config.allowed_origins(),
            vec![
                HeaderValue::from_static("https://white-boutique-sa.myshopify.com"),
                HeaderValue::from_static("https://whiteboutique.co.za"),
            ]
        );
    }

    #[test]
    fn no_origins_when_unset() {
        assert!(ServerConfig::default().allowed_origins().is_empty());
    }

    #[test]
    fn zero_port_is_rejected() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPort));
    }

    #[test]
    fn request_deadline_must_be_within_five_minutes() {
        for secs in [0, MAX_REQUEST_TIMEOUT_SECS + 1] {
            let config = ServerConfig {
                request_timeout_secs: secs,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
        }
    }
}
