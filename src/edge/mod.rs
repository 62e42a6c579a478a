//! SpaceVoice Edge Server
//!
//! Public-facing HTTP front built with Axum. Every request first passes the
//! domain-routing middleware, which bounces dashboard paths off the
//! marketing hosts; the rest is served by the calculator endpoints below or
//! by the pre-built static site.
//!
//! # Endpoints
//!
//! ## Pricing
//! - `GET /api/pricing/tiers` - Published plans
//! - `GET /api/pricing/estimate` - Cost for a usage profile
//! - `GET /api/pricing/roi` - Savings against human agents
//!
//! ## Embed
//! - `GET /api/embed/snippet` - Widget snippet for an agent
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use spacevoice::config::Config;
//! use spacevoice::edge::{serve, EdgeState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     serve(EdgeState::new(config)).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{EdgeError, EdgeResult};
pub use state::EdgeState;

use axum::{http::Uri, middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::routing::domain_routing;

/// Build the edge router with all routes and middleware
pub fn build_router(state: EdgeState) -> Router {
    let api_routes = Router::new()
        .route("/pricing/tiers", get(routes::pricing::list_tiers))
        .route("/pricing/estimate", get(routes::pricing::estimate))
        .route("/pricing/roi", get(routes::pricing::roi))
        .route("/embed/snippet", get(routes::embed::snippet));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let router = Router::new()
        .nest("/api", api_routes)
        .nest("/health", health_routes);

    let router = match state.static_dir() {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "Serving static site");
            router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true))
        }
        None => router.fallback(not_found),
    };

    let rules = Arc::clone(&state.rules);

    router
        .layer(middleware::from_fn_with_state(rules, domain_routing))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

async fn not_found(uri: Uri) -> EdgeError {
    EdgeError::NotFound(uri.path().to_string())
}

/// Start the edge server
pub async fn serve(state: EdgeState) -> Result<(), EdgeError> {
    let addr = state.config.edge.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("SpaceVoice edge listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| EdgeError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("SpaceVoice edge shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
