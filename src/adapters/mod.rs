//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum routes for the refill check and health endpoints
//! - `shopify` - Customer directory backed by the Shopify Admin GraphQL API

pub mod http;
pub mod shopify;

pub use shopify::{MockCustomerDirectory, ShopifyAdminDirectory};
