//! Session Management
//!
//! Client-side authentication state for the operator dashboard.
//!
//! ## Architecture
//!
//! - **TokenStore**: injected persistence for the bearer token
//! - **state**: pure transition function over [`Session`]
//! - **redirect**: route guard table keyed on [`SessionPhase`]
//! - **SessionStore**: owns the session, runs transitions and their effects
//!
//! ## Lifecycle
//!
//! 1. The application root builds a `SessionStore` and calls `init`
//! 2. A stored token moves the session to `Loading` and fetches the profile
//! 3. The profile's onboarding flags pick the authenticated phase
//! 4. Any fetch failure, or an explicit `logout`, clears the stored token

mod redirect;
mod state;
mod storage;
mod store;

pub use redirect::{
    redirect_for, RouteKind, DASHBOARD_ROUTE, LOGIN_ROUTE, ONBOARDING_ROUTE, REGISTER_ROUTE,
};
pub use state::{transition, Effect, Session, SessionEvent, SessionPhase};
pub use storage::{
    FileTokenStore, MemoryTokenStore, StoreError, TokenStore, READ_ONLY_KEY, TOKEN_KEY,
};
pub use store::{AuthBackend, SessionError, SessionStore};
