//! Shopify Admin API customer directory.
//!
//! Implements the `CustomerDirectory` port with a single GraphQL query per
//! lookup:
//!
//! ```graphql
//! query($query: String!) {
//!   customers(first: 1, query: $query) { edges { node { id email tags } } }
//! }
//! ```
//!
//! # Security
//!
//! - The admin token is held in a `secrecy::SecretString` and only exposed
//!   when building the `X-Shopify-Access-Token` header
//! - Failure bodies are truncated before they leave this adapter

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ShopifyConfig;
use crate::domain::refill::{excerpt, CustomerEmail, CustomerRecord};
use crate::ports::{CustomerDirectory, DirectoryError};

/// Header carrying the Admin API access token.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

const CUSTOMER_BY_EMAIL_QUERY: &str = r#"
query($query: String!) {
  customers(first: 1, query: $query) {
    edges {
      node {
        id
        email
        tags
      }
    }
  }
}
"#;

// ════════════════════════════════════════════════════════════════════════════════
// Wire Types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: CustomerQueryVariables,
}

#[derive(Debug, Serialize)]
struct CustomerQueryVariables {
    query: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<CustomersData>,
    errors: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct CustomersData {
    customers: Option<CustomerConnection>,
}

#[derive(Debug, Deserialize)]
struct CustomerConnection {
    #[serde(default)]
    edges: Vec<CustomerEdge>,
}

#[derive(Debug, Deserialize)]
struct CustomerEdge {
    node: CustomerNode,
}

#[derive(Debug, Deserialize)]
struct CustomerNode {
    id: String,
    email: Option<String>,
    tags: Option<Value>,
}

impl From<CustomerNode> for CustomerRecord {
    fn from(node: CustomerNode) -> Self {
        CustomerRecord {
            id: node.id,
            email: node.email,
            tags: tags_from_value(node.tags),
        }
    }
}

/// Anything other than a JSON array yields no tags.
fn tags_from_value(tags: Option<Value>) -> Vec<String> {
    match tags {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(tag) => tag,
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn map_transport_error(err: reqwest::Error) -> DirectoryError {
    if err.is_timeout() {
        DirectoryError::Timeout
    } else {
        DirectoryError::Network(err.to_string())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Adapter
// ════════════════════════════════════════════════════════════════════════════════

/// Customer directory backed by the Shopify Admin GraphQL API.
pub struct ShopifyAdminDirectory {
    config: ShopifyConfig,
    http_client: reqwest::Client,
}

impl ShopifyAdminDirectory {
    /// Create a directory whose requests give up after `request_timeout`.
    pub fn new(config: ShopifyConfig, request_timeout: Duration) -> Result<Self, DirectoryError> {
        let http_client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| DirectoryError::Network(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl CustomerDirectory for ShopifyAdminDirectory {
    async fn find_by_email(
        &self,
        email: &CustomerEmail,
    ) -> Result<Option<CustomerRecord>, DirectoryError> {
        let shop = self
            .config
            .shop_host()
            .ok_or(DirectoryError::NotConfigured("shopify.shop"))?;
        let token = self
            .config
            .admin_token()
            .ok_or(DirectoryError::NotConfigured("shopify.admin_token"))?;

        let url = self.config.graphql_endpoint(shop);
        let body = GraphQlRequest {
            query: CUSTOMER_BY_EMAIL_QUERY,
            variables: CustomerQueryVariables {
                query: format!("email:{}", email.as_str()),
            },
        };

        let response = self
            .http_client
            .post(&url)
            .header(ACCESS_TOKEN_HEADER, token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Shopify customer lookup unreachable");
                map_transport_error(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body_len = error_text.len(),
                "Shopify customer lookup failed"
            );
            return Err(DirectoryError::Status {
                status: status.as_u16(),
                body_excerpt: excerpt(&error_text),
            });
        }

        let text = response.text().await.map_err(map_transport_error)?;
        let payload: GraphQlResponse = serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse Shopify response");
            DirectoryError::MalformedPayload(excerpt(&e.to_string()))
        })?;

        if let Some(errors) = payload.errors {
            tracing::warn!("Shopify customer lookup returned GraphQL errors");
            return Err(DirectoryError::GraphQl(errors));
        }

        let customer = payload
            .data
            .and_then(|data| data.customers)
            .and_then(|connection| connection.edges.into_iter().next())
            .map(|edge| CustomerRecord::from(edge.node));

        Ok(customer)
    }
}
