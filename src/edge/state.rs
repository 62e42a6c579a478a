//! Edge State
//!
//! Shared state accessible by all edge handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::routing::HostRules;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct EdgeState {
    /// Full configuration the server was started with
    pub config: Arc<Config>,
    /// Hostname rules for the domain-routing middleware
    pub rules: Arc<HostRules>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl EdgeState {
    pub fn new(config: Config) -> Self {
        let rules = Arc::new(config.site.host_rules());
        Self {
            config: Arc::new(config),
            rules,
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Pre-built site directory, if one is configured
    pub fn static_dir(&self) -> Option<PathBuf> {
        self.config.edge.static_dir.as_ref().map(PathBuf::from)
    }

    /// Base URL widget snippets point at
    pub fn widget_url(&self) -> &str {
        &self.config.site.widget_url
    }
}
