//! Customer directory port.
//!
//! Defines the contract for looking up storefront customers by email
//! (e.g., the Shopify Admin GraphQL API). One call per eligibility check;
//! implementations must not cache or retry.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::refill::{CustomerEmail, CustomerRecord, RefillError};

/// Port for customer lookups.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Find at most one customer whose email matches `email`.
    ///
    /// Returns `Ok(None)` when the directory has no match.
    async fn find_by_email(
        &self,
        email: &CustomerEmail,
    ) -> Result<Option<CustomerRecord>, DirectoryError>;
}

/// Errors raised by customer directory implementations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DirectoryError {
    /// Shop host or access token missing.
    #[error("Directory not configured: {0}")]
    NotConfigured(&'static str),

    /// Non-success HTTP status. `body_excerpt` is already truncated.
    #[error("Directory returned status {status}")]
    Status { status: u16, body_excerpt: String },

    /// Connection-level failure.
    #[error("Directory unreachable: {0}")]
    Network(String),

    /// The request exceeded the configured deadline.
    #[error("Directory request timed out")]
    Timeout,

    /// The response body was not the expected JSON shape.
    #[error("Malformed directory payload: {0}")]
    MalformedPayload(String),

    /// The payload carried a GraphQL `errors` list.
    #[error("Directory reported GraphQL errors")]
    GraphQl(serde_json::Value),
}

impl From<DirectoryError> for RefillError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotConfigured(setting) => RefillError::Configuration(setting),
            DirectoryError::Status {
                status,
                body_excerpt,
            } => RefillError::upstream_transport(Some(status), &body_excerpt),
            DirectoryError::Network(detail) | DirectoryError::MalformedPayload(detail) => {
                RefillError::upstream_transport(None, &detail)
            }
            DirectoryError::Timeout => RefillError::upstream_transport(None, "request timed out"),
            DirectoryError::GraphQl(errors) => RefillError::UpstreamProtocol { errors },
        }
    }
}
