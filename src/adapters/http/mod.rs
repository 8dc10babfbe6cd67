//! HTTP adapters - REST API implementations.
//!
//! Middleware, outermost first:
//! 1. Request ID generation (`x-request-id`)
//! 2. Request/response tracing
//! 3. Request ID propagation to the response
//! 4. Request deadline (`server.request_timeout_secs`), answered as a JSON 502
//! 5. CORS (`server.cors_origins`)
//!
//! The Shopify client runs on `ServerConfig::upstream_timeout`, which is shorter
//! than the request deadline, so a slow upstream normally surfaces as its own
//! 502 before the router deadline fires.

pub mod health;
pub mod refill;

use axum::error_handling::HandleErrorLayer;
use axum::{BoxError, Router};
use http::Method;
use tower::timeout::error::Elapsed;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::domain::refill::RefillError;

pub use health::health_routes;
pub use refill::{refill_routes, RefillApiError, RefillAppState};

/// Creates the Axum router with all routes and middleware.
pub fn build_router(state: RefillAppState) -> Router {
    let server = state.config.server.clone();

    Router::new()
        .merge(health_routes())
        .merge(refill_routes())
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(HandleErrorLayer::new(handle_deadline_error))
                .timeout(server.request_timeout())
                .layer(cors_layer(&server)),
        )
        .with_state(state)
}

/// Turns a missed request deadline into the upstream-failure JSON body.
///
/// Routes are infallible, so the deadline is the only error that reaches here.
async fn handle_deadline_error(err: BoxError) -> RefillApiError {
    if err.is::<Elapsed>() {
        tracing::warn!("Request deadline exceeded");
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
    }
    RefillApiError::from(RefillError::upstream_transport(None, "request timed out"))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins = server.allowed_origins();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(allow_origin)
}
