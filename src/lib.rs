//! Refill Check - Storefront refill eligibility service
//!
//! Answers whether a customer, identified by email, carries the refill tag in
//! the Shopify customer directory, and hands back a checkout permalink when they do.
//! Requests routed through the storefront app proxy are authenticated by HMAC signature.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
