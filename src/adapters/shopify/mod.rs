//! Shopify customer directory adapter.
//!
//! Implements the `CustomerDirectory` port against the Shopify Admin
//! GraphQL API, plus a mock for tests.
//!
//! # Configuration
//!
//! Required environment variables:
//! - `REFILL__SHOPIFY__SHOP`: Shop hostname (`*.myshopify.com`)
//! - `REFILL__SHOPIFY__ADMIN_TOKEN`: Admin API access token

mod admin_directory;
mod mock_directory;

pub use admin_directory::ShopifyAdminDirectory;
pub use mock_directory::MockCustomerDirectory;
