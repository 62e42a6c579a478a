//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `SPACEVOICE_*` environment overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::client::ClientConfig;
use crate::routing::HostRules;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub edge: EdgeConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_telephony_timeout")]
    pub telephony_timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.spacevoice.ai".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_telephony_timeout() -> u64 {
    15
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            request_timeout_secs: default_request_timeout(),
            telephony_timeout_secs: default_telephony_timeout(),
        }
    }
}

impl ApiConfig {
    /// Build the HTTP client configuration
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            request_timeout_ms: self.request_timeout_secs.saturating_mul(1000),
            telephony_timeout_ms: self.telephony_timeout_secs.saturating_mul(1000),
        }
    }
}

/// Domain layout of the public site
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_marketing_hosts")]
    pub marketing_hosts: Vec<String>,

    #[serde(default = "default_dashboard_host")]
    pub dashboard_host: String,

    #[serde(default = "default_app_prefixes")]
    pub app_prefixes: Vec<String>,

    /// Public base URL the embeddable widget is served from
    #[serde(default = "default_widget_url")]
    pub widget_url: String,
}

fn default_marketing_hosts() -> Vec<String> {
    vec!["spacevoice.ai".to_string(), "www.spacevoice.ai".to_string()]
}

fn default_dashboard_host() -> String {
    "dashboard.spacevoice.ai".to_string()
}

fn default_app_prefixes() -> Vec<String> {
    ["/dashboard", "/login", "/register", "/onboarding"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_widget_url() -> String {
    "https://dashboard.spacevoice.ai".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            marketing_hosts: default_marketing_hosts(),
            dashboard_host: default_dashboard_host(),
            app_prefixes: default_app_prefixes(),
            widget_url: default_widget_url(),
        }
    }
}

impl SiteConfig {
    /// Hostname rules for the domain-routing middleware
    pub fn host_rules(&self) -> HostRules {
        HostRules::new(
            self.marketing_hosts.iter().cloned(),
            &self.dashboard_host,
            self.app_prefixes.iter().cloned(),
        )
    }
}

/// Edge server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Pre-built site served for requests no route matches
    #[serde(default)]
    pub static_dir: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

impl EdgeConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Client-side persisted state
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_session_file")]
    pub session_file: String,
}

fn default_session_file() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("spacevoice").join("session.json").to_string_lossy().to_string())
        .unwrap_or_else(|| "./spacevoice_session.json".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            session_file: default_session_file(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` wins over the configured level when set.
    pub fn init(&self) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("spacevoice={},tower_http=info", self.level)));

        let registry = tracing_subscriber::registry().with(filter);
        if self.format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("spacevoice").join("config.toml")),
            Some(PathBuf::from("/etc/spacevoice/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("SPACEVOICE_API_URL") {
            self.api.base_url = url;
        }

        if let Some(host) = var("SPACEVOICE_EDGE_HOST") {
            self.edge.host = host;
        }
        if let Some(port) = var("SPACEVOICE_EDGE_PORT") {
            if let Ok(p) = port.parse() {
                self.edge.port = p;
            }
        }
        if let Some(dir) = var("SPACEVOICE_STATIC_DIR") {
            self.edge.static_dir = Some(dir);
        }

        if let Some(host) = var("SPACEVOICE_DASHBOARD_HOST") {
            self.site.dashboard_host = host;
        }

        if let Some(file) = var("SPACEVOICE_SESSION_FILE") {
            self.storage.session_file = file;
        }

        if let Some(level) = var("SPACEVOICE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("SPACEVOICE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# SpaceVoice Configuration
#
# Environment variables override these settings:
# - SPACEVOICE_API_URL
# - SPACEVOICE_EDGE_HOST
# - SPACEVOICE_EDGE_PORT
# - SPACEVOICE_STATIC_DIR
# - SPACEVOICE_DASHBOARD_HOST
# - SPACEVOICE_SESSION_FILE
# - SPACEVOICE_LOG_LEVEL
# - SPACEVOICE_LOG_FORMAT

[api]
# Backend base URL (endpoints live under /api/v1)
base_url = "https://api.spacevoice.ai"

# Request timeout in seconds
request_timeout_secs = 30

# Timeout for outbound call requests in seconds
telephony_timeout_secs = 15

[site]
# Hosts serving the marketing site
marketing_hosts = ["spacevoice.ai", "www.spacevoice.ai"]

# Host serving the operator dashboard
dashboard_host = "dashboard.spacevoice.ai"

# Paths on a marketing host that belong to the dashboard
app_prefixes = ["/dashboard", "/login", "/register", "/onboarding"]

# Base URL the embeddable widget is served from
widget_url = "https://dashboard.spacevoice.ai"

[edge]
# Edge server host
host = "0.0.0.0"

# Edge server port
port = 3000

# Optional pre-built site to serve for unmatched paths
# static_dir = "./out"

[storage]
# Where the CLI keeps its bearer token
# session_file = "~/.local/share/spacevoice/session.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
