//! Refill handlers.
//!
//! ## Queries
//! - Check refill eligibility (direct or app-proxy signed)

mod check_eligibility;

pub use check_eligibility::{
    AccessMode, CheckEligibilityHandler, CheckEligibilityQuery, EMAIL_PARAM,
};
