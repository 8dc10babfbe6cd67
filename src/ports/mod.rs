//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `CustomerDirectory` - Customer lookup by email (Shopify Admin API)

mod customer_directory;

pub use customer_directory::{CustomerDirectory, DirectoryError};
