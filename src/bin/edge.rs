//! SpaceVoice Edge Server
//!
//! Run with: cargo run --bin spacevoice-edge
//!
//! # Configuration
//!
//! Read from `~/.config/spacevoice/config.toml`, `/etc/spacevoice/config.toml`
//! or `./config.toml`, then overridden by environment variables:
//! - `SPACEVOICE_EDGE_HOST`: Host to bind to (default: 0.0.0.0)
//! - `SPACEVOICE_EDGE_PORT`: Port to listen on (default: 3000)
//! - `SPACEVOICE_STATIC_DIR`: Pre-built site to serve (optional)
//! - `SPACEVOICE_DASHBOARD_HOST`: Dashboard hostname (default: dashboard.spacevoice.ai)
//! - `SPACEVOICE_LOG_LEVEL` / `SPACEVOICE_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Full filter override

use spacevoice::config::Config;
use spacevoice::edge::{serve, EdgeState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    config.logging.init();

    tracing::info!("Starting SpaceVoice edge v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Dashboard host: {}", config.site.dashboard_host);
    match &config.edge.static_dir {
        Some(dir) => tracing::info!("Static site: {}", dir),
        None => tracing::info!("No static site configured, unmatched paths return 404"),
    }

    serve(EdgeState::new(config)).await?;
    Ok(())
}
