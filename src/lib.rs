//! # SpaceVoice
//!
//! Web core of the SpaceVoice voice-agent platform: the typed backend
//! client, the dashboard session state machine, the domain-routing edge
//! server, and the public pricing model.
//!
//! ## Modules
//!
//! - [`client`]: Typed wrappers around the backend REST API
//! - [`session`]: Session store, route guards, and token persistence
//! - [`routing`]: Hostname-based routing between marketing and dashboard
//! - [`edge`]: Axum server applying domain routing and serving calculators
//! - [`pricing`]: Per-minute rates, plans, and ROI arithmetic
//! - [`embed`]: Widget embed snippets
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spacevoice::client::{ApiClient, ClientConfig};
//! use spacevoice::session::{MemoryTokenStore, SessionStore, TokenStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
//!     let client = ApiClient::new(
//!         ClientConfig::new("https://api.spacevoice.ai"),
//!         Arc::clone(&tokens),
//!     )?;
//!
//!     let session = SessionStore::new(Arc::new(client.clone()), tokens);
//!     session.login("ops@acme.test", "hunter2").await?;
//!
//!     if let Some(target) = session.redirect_for("/dashboard").await {
//!         println!("Redirecting to {}", target);
//!     }
//!
//!     let numbers = client.list_phone_numbers(Default::default()).await?;
//!     println!("{} phone numbers", numbers.total);
//!
//!     session.teardown().await;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod edge;
pub mod embed;
pub mod pricing;
pub mod routing;
pub mod session;

// Re-export top-level types for convenience
pub use client::{ApiClient, ClientConfig, ClientError, ClientResult, UserProfile};

pub use session::{
    redirect_for, FileTokenStore, MemoryTokenStore, Session, SessionPhase, SessionStore,
    TokenStore,
};

pub use routing::{domain_routing, route_host, HostDecision, HostRules};

pub use edge::{build_router, serve, EdgeError, EdgeState};

pub use embed::{EmbedError, EmbedKind, EmbedOptions, EmbedPosition, EmbedTheme};

pub use pricing::{CostEstimate, PricingTier, RoiEstimate, UsageInput};

pub use config::{Config, ConfigError, LoggingConfig};
