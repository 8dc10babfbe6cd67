//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `REFILL` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use refill_check::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod error;
mod proxy;
mod refill;
mod server;
mod shopify;

pub use error::{ConfigError, ValidationError};
pub use proxy::ProxyConfig;
pub use refill::RefillConfig;
pub use server::{Environment, ServerConfig};
pub use shopify::ShopifyConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults so the service can boot (and report through
/// `/health`) while credentials are still missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Shopify Admin API configuration (shop, token, API version)
    #[serde(default)]
    pub shopify: ShopifyConfig,

    /// App proxy signing configuration
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Refill business constants (eligible tag, variant id)
    #[serde(default)]
    pub refill: RefillConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `REFILL` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `REFILL__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `REFILL__SHOPIFY__SHOP=...` -> `shopify.shop = ...`
    /// - `REFILL__SHOPIFY__ADMIN_TOKEN=...` -> `shopify.admin_token = ...`
    /// - `REFILL__PROXY__SECRET=...` -> `proxy.secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("REFILL")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate configuration values that must be right at startup
    ///
    /// Missing credentials are not startup errors; see [`AppConfig::missing_settings`].
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.shopify.validate()?;
        Ok(())
    }

    /// Names of settings a refill check needs but that are currently absent
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.shopify.shop_host().is_none() {
            missing.push("shopify.shop");
        }
        if self.shopify.admin_token().is_none() {
            missing.push("shopify.admin_token");
        }
        if self.refill.eligible_tag().is_none() {
            missing.push("refill.eligible_tag");
        }
        if self.refill.variant_id().is_none() {
            missing.push("refill.variant_id");
        }
        if self.proxy.secret().is_none() {
            missing.push("proxy.secret");
        }
        missing
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to set environment variables for testing
    /// Uses double underscores to separate nested config values
    fn set_minimal_env() {
        env::set_var("REFILL__SHOPIFY__SHOP", "white-boutique-sa.myshopify.com");
        env::set_var("REFILL__SHOPIFY__ADMIN_TOKEN", "shpat_xxx");
        env::set_var("REFILL__PROXY__SECRET", "proxy_xxx");
    }

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("REFILL__SHOPIFY__SHOP");
        env::remove_var("REFILL__SHOPIFY__ADMIN_TOKEN");
        env::remove_var("REFILL__PROXY__SECRET");
        env::remove_var("REFILL__PROXY__REQUIRE_SIGNATURE");
        env::remove_var("REFILL__SERVER__PORT");
        env::remove_var("REFILL__SERVER__ENVIRONMENT");
        env::remove_var("REFILL__REFILL__VARIANT_ID");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(
            config.shopify.shop_host(),
            Some("white-boutique-sa.myshopify.com")
        );
        assert_eq!(
            config.shopify.admin_token().unwrap().expose_secret(),
            "shpat_xxx"
        );
        assert!(config.missing_settings().is_empty());
    }

    #[test]
    fn test_load_without_credentials_succeeds() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
        assert!(config.missing_settings().contains(&"shopify.admin_token"));
        assert!(config.missing_settings().contains(&"proxy.secret"));
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.refill.eligible_tag, "refill_eligible");
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("REFILL__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_custom_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("REFILL__SERVER__PORT", "3000");
        env::set_var("REFILL__PROXY__REQUIRE_SIGNATURE", "true");
        env::set_var("REFILL__REFILL__VARIANT_ID", "123");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.proxy.require_signature);
        assert_eq!(config.refill.variant_id(), Some("123"));
    }

    #[test]
    fn test_missing_settings_reports_names_only() {
        let config = AppConfig::default();
        assert_eq!(
            config.missing_settings(),
            vec!["shopify.shop", "shopify.admin_token", "proxy.secret"]
        );
    }
}
