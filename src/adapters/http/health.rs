//! Health check endpoint.
//!
//! Reports liveness and whether the refill settings are present. Only
//! booleans are reported for credentials; their values never leave the process.

use axum::{extract::State, routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::refill::RefillAppState;

/// Health check response structure.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// Service name from `server.service_name`
    pub service: String,
    /// ISO-8601 timestamp when the check was performed
    pub time: String,
    pub configured: ConfiguredSettings,
}

/// Presence of each credential, never the value.
#[derive(Debug, Serialize)]
pub struct ConfiguredSettings {
    pub shop: bool,
    pub admin_token: bool,
    pub proxy_secret: bool,
}

/// GET /health
pub async fn health_check(State(state): State<RefillAppState>) -> Json<HealthResponse> {
    let config = &state.config;

    Json(HealthResponse {
        ok: true,
        service: config.server.service_name.clone(),
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        configured: ConfiguredSettings {
            shop: config.shopify.shop_host().is_some(),
            admin_token: config.shopify.admin_token().is_some(),
            proxy_secret: config.proxy.secret().is_some(),
        },
    })
}

pub fn health_routes() -> Router<RefillAppState> {
    Router::new().route("/health", get(health_check))
}
