//! Health Routes
//!
//! Health check endpoints for monitoring and load-balancer probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (ready to serve traffic)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::edge::dto::HealthResponse;
use crate::edge::state::EdgeState;

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Not ready while a configured static site directory is missing.
pub async fn readiness(State(state): State<Arc<EdgeState>>) -> StatusCode {
    match static_site_status(&state) {
        "missing" => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    }
}

/// GET /health
pub async fn full_health(State(state): State<Arc<EdgeState>>) -> Json<HealthResponse> {
    let static_site = static_site_status(&state);
    let status = if static_site == "missing" { "degraded" } else { "healthy" };

    Json(HealthResponse {
        status: status.to_string(),
        static_site: static_site.to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn static_site_status(state: &EdgeState) -> &'static str {
    match state.static_dir() {
        None => "disabled",
        Some(dir) if dir.is_dir() => "ok",
        Some(_) => "missing",
    }
}
