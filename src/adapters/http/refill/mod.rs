//! HTTP adapter for refill endpoints.
//!
//! Exposes refill eligibility via REST API:
//! - `GET /refill/check?email=` - Check eligibility
//! - `GET /api/refill-check?email=&hmac=...` - Check eligibility through the app proxy

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{EligibilityResponse, ErrorResponse};
pub use handlers::{RefillApiError, RefillAppState};
pub use routes::refill_routes;
