//! Shopify Admin API configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Shopify Admin API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyConfig {
    /// Shop hostname (e.g. `white-boutique-sa.myshopify.com`)
    pub shop: Option<String>,

    /// Admin API access token
    pub admin_token: Option<SecretString>,

    /// Admin API version segment
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Overrides `https://{shop}` as the API origin (for testing)
    pub api_base_url: Option<String>,
}

impl ShopifyConfig {
    /// Shop hostname, if set and non-blank
    pub fn shop_host(&self) -> Option<&str> {
        self.shop
            .as_deref()
            .map(str::trim)
            .filter(|shop| !shop.is_empty())
    }

    /// Admin token, if set and non-blank
    pub fn admin_token(&self) -> Option<&SecretString> {
        self.admin_token
            .as_ref()
            .filter(|token| !token.expose_secret().trim().is_empty())
    }

    /// GraphQL endpoint for the given shop host
    pub fn graphql_endpoint(&self, shop: &str) -> String {
        let base = match &self.api_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", shop),
        };
        format!("{}/admin/api/{}/graphql.json", base, self.api_version)
    }

    /// Validate Shopify configuration
    ///
    /// Absent credentials are allowed here; they surface per request.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_version.trim().is_empty() {
            return Err(ValidationError::MissingApiVersion);
        }
        if let Some(shop) = self.shop_host() {
            if shop.contains("://") || shop.contains('/') {
                return Err(ValidationError::InvalidShopHost);
            }
        }
        Ok(())
    }
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            shop: None,
            admin_token: None,
            api_version: default_api_version(),
            api_base_url: None,
        }
    }
}

fn default_api_version() -> String {
    "2026-01".to_string()
}
