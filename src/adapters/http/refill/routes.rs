//! Axum router configuration for refill endpoints.

use axum::{routing::get, Router};

use super::handlers::{check_refill, check_refill_via_proxy, RefillAppState};

/// Create the refill API router.
///
/// # Routes
///
/// - `GET /refill/check` - Direct check (signed only if `proxy.require_signature`)
/// - `GET /api/refill-check` - App proxy check (signature always required)
pub fn refill_routes() -> Router<RefillAppState> {
    Router::new()
        .route("/refill/check", get(check_refill))
        .route("/api/refill-check", get(check_refill_via_proxy))
}
