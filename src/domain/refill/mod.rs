//! Refill domain module.
//!
//! Decides whether a storefront customer may order a product refill.
//!
//! # Module Structure
//!
//! - `email` - CustomerEmail value object (trim + lower-case normalization)
//! - `eligibility` - Customer records, the tag policy and its outcomes
//! - `proxy_signature` - App proxy HMAC verification
//! - `errors` - RefillError taxonomy

mod email;
mod eligibility;
mod errors;
mod proxy_signature;

pub use email::{normalize_email, CustomerEmail};
pub use eligibility::{
    checkout_url, CustomerRecord, EligibilityOutcome, EligibilityPolicy, IneligibleReason,
};
pub use errors::{excerpt, RefillError, MAX_BODY_EXCERPT_CHARS};
pub use proxy_signature::{
    canonical_message, constant_time_compare, ProxyRejection, ProxySignatureVerifier,
    ProxyVerification, LEGACY_SIGNATURE_PARAM, SHOP_PARAM, SIGNATURE_PARAM,
};
