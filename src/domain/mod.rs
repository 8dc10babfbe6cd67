//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `refill` - Refill eligibility rules, email normalization and app proxy signatures

pub mod refill;
