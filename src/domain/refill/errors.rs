//! Refill-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Configuration | 500 |
//! | Validation | 400 |
//! | Authentication | 401 |
//! | UpstreamTransport | 502 |
//! | UpstreamProtocol | 500 |
//!
//! "Not eligible" is a normal outcome, not an error.

use thiserror::Error;

use super::proxy_signature::ProxyRejection;

/// Maximum number of characters of an upstream body echoed back to callers.
pub const MAX_BODY_EXCERPT_CHARS: usize = 500;

/// Errors that end a refill eligibility check.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RefillError {
    /// A required setting is absent. Carries the setting name, never its value.
    #[error("Missing configuration: {0}")]
    Configuration(&'static str),

    /// The request itself is malformed.
    #[error("{message}")]
    Validation { field: String, message: String },

    /// The app proxy signature or shop did not check out.
    #[error("Unauthorized: {0}")]
    Authentication(ProxyRejection),

    /// The customer directory could not be reached or answered with a failure status.
    #[error("Shopify Admin API request failed")]
    UpstreamTransport {
        status: Option<u16>,
        body_excerpt: String,
    },

    /// The directory answered, but its payload carried an error list.
    #[error("GraphQL error")]
    UpstreamProtocol { errors: serde_json::Value },
}

impl RefillError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        RefillError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn upstream_transport(status: Option<u16>, body: &str) -> Self {
        RefillError::UpstreamTransport {
            status,
            body_excerpt: excerpt(body),
        }
    }

    /// Returns a stable, machine-readable code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            RefillError::Configuration(_) => "CONFIGURATION_ERROR",
            RefillError::Validation { .. } => "VALIDATION_FAILED",
            RefillError::Authentication(_) => "UNAUTHORIZED",
            RefillError::UpstreamTransport { .. } => "UPSTREAM_FAILURE",
            RefillError::UpstreamProtocol { .. } => "UPSTREAM_GRAPHQL_ERROR",
        }
    }

    /// Returns the human-readable message for API responses.
    pub fn message(&self) -> String {
        match self {
            RefillError::Configuration(setting) => format!("Missing configuration {}", setting),
            RefillError::Validation { message, .. } => message.clone(),
            RefillError::Authentication(ProxyRejection::ShopMismatch) => {
                "Unauthorized shop".to_string()
            }
            RefillError::Authentication(_) => "Unauthorized".to_string(),
            other => other.to_string(),
        }
    }
}

/// Truncates an upstream body to at most `MAX_BODY_EXCERPT_CHARS` characters.
pub fn excerpt(body: &str) -> String {
    body.chars().take(MAX_BODY_EXCERPT_CHARS).collect()
}
