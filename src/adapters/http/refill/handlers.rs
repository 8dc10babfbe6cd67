//! HTTP handlers for refill endpoints.
//!
//! These handlers connect Axum routes to the eligibility query handler.

use std::sync::Arc;

use axum::extract::{Json, Query, State};
use axum::response::{IntoResponse, Response};
use http::header::CACHE_CONTROL;
use http::StatusCode;

use crate::application::handlers::refill::{
    AccessMode, CheckEligibilityHandler, CheckEligibilityQuery,
};
use crate::config::AppConfig;
use crate::domain::refill::RefillError;
use crate::ports::CustomerDirectory;

use super::dto::{EligibilityResponse, ErrorResponse};

/// Eligibility answers must never be cached by browsers or the proxy.
const NO_STORE: &str = "no-store";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state.
///
/// Cloned for each request; dependencies are Arc-wrapped and immutable.
#[derive(Clone)]
pub struct RefillAppState {
    pub directory: Arc<dyn CustomerDirectory>,
    pub config: Arc<AppConfig>,
}

impl RefillAppState {
    pub fn new(directory: Arc<dyn CustomerDirectory>, config: Arc<AppConfig>) -> Self {
        Self { directory, config }
    }

    pub fn check_eligibility_handler(&self) -> CheckEligibilityHandler {
        CheckEligibilityHandler::new(self.directory.clone(), self.config.clone())
    }

    /// Access mode for the direct route, per `proxy.require_signature`.
    pub fn direct_access_mode(&self) -> AccessMode {
        if self.config.proxy.require_signature {
            AccessMode::ProxySigned
        } else {
            AccessMode::Direct
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /refill/check - Check refill eligibility for `?email=`
pub async fn check_refill(
    State(state): State<RefillAppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, RefillApiError> {
    let access_mode = state.direct_access_mode();
    resolve(&state, params, access_mode).await
}

/// GET /api/refill-check - App proxy route; the signature is always required
pub async fn check_refill_via_proxy(
    State(state): State<RefillAppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, RefillApiError> {
    resolve(&state, params, AccessMode::ProxySigned).await
}

async fn resolve(
    state: &RefillAppState,
    params: Vec<(String, String)>,
    access_mode: AccessMode,
) -> Result<Response, RefillApiError> {
    let handler = state.check_eligibility_handler();
    let query = CheckEligibilityQuery::new(params, access_mode);

    let outcome = handler.handle(query).await?;

    let response = EligibilityResponse::from(outcome);
    Ok(([(CACHE_CONTROL, NO_STORE)], Json(response)).into_response())
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts refill errors to HTTP responses.
#[derive(Debug)]
pub struct RefillApiError(RefillError);

impl From<RefillError> for RefillApiError {
    fn from(err: RefillError) -> Self {
        Self(err)
    }
}

impl RefillApiError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            RefillError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RefillError::Validation { .. } => StatusCode::BAD_REQUEST,
            RefillError::Authentication(_) => StatusCode::UNAUTHORIZED,
            RefillError::UpstreamTransport { .. } => StatusCode::BAD_GATEWAY,
            RefillError::UpstreamProtocol { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RefillApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error_code = self.0.error_code(), "Refill check failed");
        }

        let body = ErrorResponse::from(&self.0);
        (status, [(CACHE_CONTROL, NO_STORE)], Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::shopify::MockCustomerDirectory;
    use crate::domain::refill::ProxyRejection;

    fn state_with(require_signature: bool) -> RefillAppState {
        let mut config = AppConfig::default();
        config.proxy.require_signature = require_signature;
        RefillAppState::new(Arc::new(MockCustomerDirectory::new()), Arc::new(config))
    }

    #[test]
    fn direct_mode_follows_configuration() {
        assert_eq!(state_with(false).direct_access_mode(), AccessMode::Direct);
        assert_eq!(state_with(true).direct_access_mode(), AccessMode::ProxySigned);
    }

    #[test]
    fn status_mapping() {
        let cases = [
            (RefillError::Configuration("shopify.shop"), StatusCode::INTERNAL_SERVER_ERROR),
            (RefillError::validation("email", "Email required"), StatusCode::BAD_REQUEST),
            (
                RefillError::Authentication(ProxyRejection::InvalidSignature),
                StatusCode::UNAUTHORIZED,
            ),
            (RefillError::upstream_transport(Some(500), ""), StatusCode::BAD_GATEWAY),
            (
                RefillError::UpstreamProtocol {
                    errors: serde_json::json!([]),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(RefillApiError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn error_response_is_not_cacheable() {
        let response =
            RefillApiError::from(RefillError::validation("email", "Email required")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[CACHE_CONTROL], NO_STORE);
    }
}
