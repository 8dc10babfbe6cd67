//! HTTP DTOs (Data Transfer Objects) for refill endpoints.
//!
//! These types define the JSON response structure for the refill API.
//! Field names are camelCase to match the storefront widget.

use serde::Serialize;

use crate::domain::refill::{EligibilityOutcome, RefillError};

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for a completed eligibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResponse {
    pub ok: bool,
    pub eligible: bool,
    /// Cart permalink, present only when eligible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,
    /// `customer_not_found` or `missing_tag` when not eligible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

impl From<EligibilityOutcome> for EligibilityResponse {
    fn from(outcome: EligibilityOutcome) -> Self {
        let reason = outcome.reason().map(|r| r.as_str());
        match outcome {
            EligibilityOutcome::Eligible { checkout_url } => Self {
                ok: true,
                eligible: true,
                checkout_url: Some(checkout_url),
                reason: None,
            },
            EligibilityOutcome::NotFound | EligibilityOutcome::Ineligible { .. } => Self {
                ok: true,
                eligible: false,
                checkout_url: None,
                reason,
            },
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response DTO
// ════════════════════════════════════════════════════════════════════════════════

/// Error body shared by every failing refill response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Always false.
    pub ok: bool,
    /// Human-readable error message.
    pub message: String,
    /// Error code for programmatic handling.
    pub error_code: &'static str,
    /// Rejection reason for authentication failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Upstream HTTP status for transport failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Truncated upstream body for transport failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Upstream GraphQL error list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl From<&RefillError> for ErrorResponse {
    fn from(err: &RefillError) -> Self {
        let mut response = Self {
            ok: false,
            message: err.message(),
            error_code: err.error_code(),
            reason: None,
            status: None,
            body: None,
            errors: None,
        };

        match err {
            RefillError::Authentication(rejection) => {
                response.reason = Some(rejection.to_string());
            }
            RefillError::UpstreamTransport {
                status,
                body_excerpt,
            } => {
                response.status = *status;
                response.body = Some(body_excerpt.clone());
            }
            RefillError::UpstreamProtocol { errors } => {
                response.errors = Some(errors.clone());
            }
            RefillError::Configuration(_) | RefillError::Validation { .. } => {}
        }

        response
    }
}
