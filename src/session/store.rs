//! Session Store
//!
//! Owns the [`Session`] for one application root. Constructed explicitly
//! and handed to whoever needs it; `init` restores from the token store,
//! `teardown` ends the lifecycle without touching persisted state.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use super::redirect::redirect_for;
use super::state::{transition, Effect, Session, SessionEvent, SessionPhase};
use super::storage::{StoreError, TokenStore};
use crate::client::{ApiClient, ClientError, TokenResponse, UserProfile};

/// Backend operations the session depends on
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ClientError>;

    async fn fetch_profile(&self, token: &str) -> Result<UserProfile, ClientError>;
}

#[async_trait]
impl AuthBackend for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ClientError> {
        ApiClient::login(self, email, password).await
    }

    async fn fetch_profile(&self, token: &str) -> Result<UserProfile, ClientError> {
        self.me_with_token(token).await
    }
}

/// Errors from explicit session operations
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Failed to persist session: {0}")]
    Store(#[from] StoreError),
}

pub struct SessionStore {
    backend: Arc<dyn AuthBackend>,
    tokens: Arc<dyn TokenStore>,
    state: RwLock<Session>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn AuthBackend>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            backend,
            tokens,
            state: RwLock::new(Session::default()),
        }
    }

    /// Restore from the token store and resolve the profile
    pub async fn init(&self) -> Session {
        let token = self.tokens.token();
        tracing::debug!(has_token = token.is_some(), "Restoring session");
        self.dispatch(SessionEvent::Restored(token)).await
    }

    /// Exchange credentials for a token, persist it, and load the profile.
    ///
    /// Invalid credentials leave the session untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, SessionError> {
        let token = self.backend.login(email, password).await?;
        self.adopt_token(&token.access_token, false).await
    }

    /// Sign in with a token obtained elsewhere (e.g. access-code redemption)
    ///
    /// A failed token write leaves storage and state untouched. A failed
    /// flag write after it ends the session rather than keep a token with
    /// the wrong access level.
    pub async fn adopt_token(&self, token: &str, read_only: bool) -> Result<Session, SessionError> {
        self.tokens.set_token(token)?;
        if let Err(e) = self.tokens.set_read_only(read_only) {
            tracing::warn!(error = %e, "Failed to persist read-only flag, discarding token");
            self.dispatch(SessionEvent::LoggedOut).await;
            return Err(e.into());
        }
        Ok(self.dispatch(SessionEvent::LoggedIn(token.to_string())).await)
    }

    /// Re-fetch the profile wholesale
    pub async fn refresh(&self) -> Session {
        self.dispatch(SessionEvent::RefreshRequested).await
    }

    pub async fn logout(&self) -> Session {
        tracing::info!("Logging out");
        self.dispatch(SessionEvent::LoggedOut).await
    }

    /// React to a failed API call. Auth failures force a logout and
    /// return `true`; everything else is the caller's to display.
    pub async fn handle_error(&self, err: &ClientError) -> bool {
        if err.is_auth_failure() {
            tracing::info!("Token rejected, forcing logout");
            self.logout().await;
            true
        } else {
            false
        }
    }

    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    pub async fn phase(&self) -> SessionPhase {
        self.state.read().await.phase()
    }

    /// Read-only sessions come from shared access codes
    pub fn is_read_only(&self) -> bool {
        self.tokens.read_only()
    }

    /// Where the current session must go when viewing `path`
    pub async fn redirect_for(&self, path: &str) -> Option<&'static str> {
        let target = redirect_for(self.phase().await, path);
        if let Some(target) = target {
            tracing::debug!(path, target, "Route guard redirect");
        }
        target
    }

    /// End the lifecycle. In-memory state is dropped; the persisted token
    /// stays so the next `init` can restore it.
    pub async fn teardown(self) {
        let session = self.state.into_inner();
        tracing::debug!(phase = %session.phase(), "Session store torn down");
    }

    /// Apply an event and run its effects until the machine settles.
    ///
    /// Storage effects run under the state write lock so persisted and
    /// in-memory tokens change together; profile fetches run outside it.
    async fn dispatch(&self, event: SessionEvent) -> Session {
        let mut pending = vec![event];

        while let Some(event) = pending.pop() {
            let fetches = {
                let mut state = self.state.write().await;
                let before = state.phase();
                let (next, effects) = transition(&state, event);
                if next.phase() != before {
                    tracing::info!(from = %before, to = %next.phase(), "Session transition");
                }
                *state = next;

                let mut fetches = Vec::new();
                for effect in effects {
                    match effect {
                        Effect::FetchProfile(token) => fetches.push(token),
                        Effect::PersistToken(token) => self.persist(&token),
                        Effect::ClearToken => self.clear(),
                    }
                }
                fetches
            };

            for token in fetches {
                pending.push(self.fetch_profile(token).await);
            }
        }

        self.snapshot().await
    }

    fn persist(&self, token: &str) {
        // adopt_token already wrote it; re-write only if something replaced it
        if self.tokens.token().as_deref() != Some(token) {
            if let Err(e) = self.tokens.set_token(token) {
                tracing::warn!(error = %e, "Failed to persist token");
            }
        }
    }

    fn clear(&self) {
        if let Err(e) = self.tokens.clear() {
            tracing::warn!(error = %e, "Failed to clear persisted token");
        }
    }

    async fn fetch_profile(&self, token: String) -> SessionEvent {
        match self.backend.fetch_profile(&token).await {
            Ok(user) => SessionEvent::ProfileLoaded { token, user },
            Err(e) => {
                // Network failures count as auth failures: no retry, no limbo
                tracing::warn!(error = %e, "Profile fetch failed");
                SessionEvent::ProfileFailed { token }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::tests::user;
    use crate::session::storage::MemoryTokenStore;
    use crate::session::{DASHBOARD_ROUTE, LOGIN_ROUTE, ONBOARDING_ROUTE};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Backend with fixed credentials and per-token profiles
    #[derive(Default)]
    struct FakeBackend {
        profiles: HashMap<String, UserProfile>,
        offline: bool,
        profile_calls: Mutex<u32>,
    }

    impl FakeBackend {
        fn with_profile(mut self, token: &str, user: UserProfile) -> Self {
            self.profiles.insert(token.to_string(), user);
            self
        }
    }

    #[async_trait]
    impl AuthBackend for FakeBackend {
        async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ClientError> {
            if password == "hunter2" {
                Ok(TokenResponse {
                    access_token: format!("tok-{}", email),
                    token_type: "bearer".to_string(),
                })
            } else {
                Err(ClientError::Http {
                    status: 401,
                    detail: "Incorrect email or password".to_string(),
                })
            }
        }

        async fn fetch_profile(&self, token: &str) -> Result<UserProfile, ClientError> {
            *self.profile_calls.lock().unwrap() += 1;
            if self.offline {
                return Err(ClientError::Timeout);
            }
            self.profiles.get(token).cloned().ok_or(ClientError::Http {
                status: 401,
                detail: "Could not validate credentials".to_string(),
            })
        }
    }

    fn store(backend: FakeBackend, tokens: Arc<MemoryTokenStore>) -> SessionStore {
        SessionStore::new(Arc::new(backend), tokens)
    }

    #[tokio::test]
    async fn test_init_without_token() {
        let tokens = Arc::new(MemoryTokenStore::new());
        let store = store(FakeBackend::default(), tokens);

        let session = store.init().await;
        assert_eq!(session.phase(), SessionPhase::Unauthenticated);
        assert_eq!(store.redirect_for("/dashboard").await, Some(LOGIN_ROUTE));
        assert_eq!(store.redirect_for("/pricing").await, None);
    }

    #[tokio::test]
    async fn test_init_restores_valid_token() {
        let tokens = Arc::new(MemoryTokenStore::with_token("tok-a"));
        let backend = FakeBackend::default().with_profile("tok-a", user(true, false));
        let store = store(backend, tokens);

        let session = store.init().await;
        assert_eq!(session.phase(), SessionPhase::AuthenticatedComplete);
        assert!(!session.is_loading);
        assert_eq!(store.redirect_for("/login").await, Some(DASHBOARD_ROUTE));
    }

    #[tokio::test]
    async fn test_init_with_rejected_token_clears_storage() {
        let tokens = Arc::new(MemoryTokenStore::with_token("stale"));
        let store = store(FakeBackend::default(), tokens.clone());

        let session = store.init().await;
        assert_eq!(session.phase(), SessionPhase::Unauthenticated);
        assert!(tokens.token().is_none());
    }

    #[tokio::test]
    async fn test_network_failure_treated_as_auth_failure() {
        let tokens = Arc::new(MemoryTokenStore::with_token("tok-a"));
        let backend = FakeBackend {
            offline: true,
            ..FakeBackend::default().with_profile("tok-a", user(true, false))
        };
        let store = SessionStore::new(Arc::new(backend), tokens.clone());

        let session = store.init().await;
        assert_eq!(session.phase(), SessionPhase::Unauthenticated);
        assert!(tokens.token().is_none());
    }

    #[tokio::test]
    async fn test_login_persists_and_routes_to_onboarding() {
        let tokens = Arc::new(MemoryTokenStore::new());
        let backend =
            FakeBackend::default().with_profile("tok-new@acme.test", user(false, false));
        let store = store(backend, tokens.clone());
        store.init().await;

        let session = store.login("new@acme.test", "hunter2").await.unwrap();
        assert_eq!(session.phase(), SessionPhase::AuthenticatedOnboarding);
        assert_eq!(tokens.token().as_deref(), Some("tok-new@acme.test"));
        assert_eq!(store.redirect_for("/dashboard/calls").await, Some(ONBOARDING_ROUTE));
        assert_eq!(store.redirect_for("/onboarding").await, None);
        assert!(!store.is_read_only());
    }

    #[tokio::test]
    async fn test_bad_credentials_leave_session_alone() {
        let tokens = Arc::new(MemoryTokenStore::new());
        let store = store(FakeBackend::default(), tokens.clone());
        store.init().await;

        let err = store.login("x@acme.test", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Incorrect email or password");
        assert_eq!(store.phase().await, SessionPhase::Unauthenticated);
        assert!(tokens.token().is_none());
    }

    #[tokio::test]
    async fn test_adopt_read_only_token() {
        let tokens = Arc::new(MemoryTokenStore::new());
        let backend = FakeBackend::default().with_profile("tok-demo", user(true, false));
        let store = store(backend, tokens.clone());

        let session = store.adopt_token("tok-demo", true).await.unwrap();
        assert_eq!(session.phase(), SessionPhase::AuthenticatedComplete);
        assert!(store.is_read_only());

        store.logout().await;
        assert!(!store.is_read_only());
        assert!(tokens.token().is_none());
    }

    #[tokio::test]
    async fn test_superuser_skips_onboarding() {
        let tokens = Arc::new(MemoryTokenStore::with_token("root"));
        let backend = FakeBackend::default().with_profile("root", user(false, true));
        let store = store(backend, tokens);

        store.init().await;
        assert_eq!(store.redirect_for("/onboarding").await, Some(DASHBOARD_ROUTE));
        assert_eq!(store.redirect_for("/dashboard").await, None);
    }

    #[tokio::test]
    async fn test_handle_error_logs_out_on_401_only() {
        let tokens = Arc::new(MemoryTokenStore::with_token("tok-a"));
        let backend = FakeBackend::default().with_profile("tok-a", user(true, false));
        let store = store(backend, tokens.clone());
        store.init().await;

        assert!(!store.handle_error(&ClientError::Timeout).await);
        assert_eq!(store.phase().await, SessionPhase::AuthenticatedComplete);

        let expired = ClientError::Http {
            status: 401,
            detail: "Token expired".to_string(),
        };
        assert!(store.handle_error(&expired).await);
        assert_eq!(store.phase().await, SessionPhase::Unauthenticated);
        assert!(tokens.token().is_none());
    }

    #[tokio::test]
    async fn test_refresh_refetches_profile() {
        let tokens = Arc::new(MemoryTokenStore::with_token("tok-a"));
        let backend = Arc::new(FakeBackend::default().with_profile("tok-a", user(true, false)));
        let store = SessionStore::new(backend.clone(), tokens);

        store.init().await;
        let session = store.refresh().await;
        assert_eq!(session.phase(), SessionPhase::AuthenticatedComplete);
        assert_eq!(*backend.profile_calls.lock().unwrap(), 2);
    }

    /// Memory store whose token or flag writes can be made to fail
    #[derive(Default)]
    struct FailingStore {
        inner: MemoryTokenStore,
        fail_token: bool,
        fail_flag: bool,
    }

    impl TokenStore for FailingStore {
        fn token(&self) -> Option<String> {
            self.inner.token()
        }

        fn set_token(&self, token: &str) -> Result<(), StoreError> {
            if self.fail_token {
                return Err(StoreError::Lock("disk full".to_string()));
            }
            self.inner.set_token(token)
        }

        fn read_only(&self) -> bool {
            self.inner.read_only()
        }

        fn set_read_only(&self, read_only: bool) -> Result<(), StoreError> {
            if self.fail_flag {
                return Err(StoreError::Lock("disk full".to_string()));
            }
            self.inner.set_read_only(read_only)
        }

        fn clear(&self) -> Result<(), StoreError> {
            self.inner.clear()
        }
    }

    #[tokio::test]
    async fn test_failed_token_write_keeps_previous_session() {
        let tokens = Arc::new(FailingStore {
            inner: MemoryTokenStore::with_token("tok-a"),
            fail_token: true,
            ..FailingStore::default()
        });
        let backend = FakeBackend::default().with_profile("tok-a", user(true, false));
        let store = SessionStore::new(Arc::new(backend), tokens.clone());
        store.init().await;

        let err = store.adopt_token("tok-demo", true).await.unwrap_err();
        assert!(matches!(err, SessionError::Store(_)));
        assert_eq!(tokens.token().as_deref(), Some("tok-a"));
        assert!(!tokens.read_only());
        assert_eq!(store.snapshot().await.token.as_deref(), Some("tok-a"));
    }

    #[tokio::test]
    async fn test_failed_flag_write_ends_session() {
        let tokens = Arc::new(FailingStore {
            fail_flag: true,
            ..FailingStore::default()
        });
        let backend = FakeBackend::default().with_profile("tok-demo", user(true, false));
        let store = SessionStore::new(Arc::new(backend), tokens.clone());
        store.init().await;

        let err = store.adopt_token("tok-demo", true).await.unwrap_err();
        assert!(matches!(err, SessionError::Store(_)));
        assert!(tokens.token().is_none());
        assert_eq!(store.phase().await, SessionPhase::Unauthenticated);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_logout_and_login_keep_storage_in_sync() {
        for _ in 0..200 {
            let tokens = Arc::new(MemoryTokenStore::with_token("tok-a"));
            let backend = FakeBackend::default()
                .with_profile("tok-a", user(true, false))
                .with_profile("tok-b", user(true, false));
            let store = Arc::new(store(backend, tokens.clone()));
            store.init().await;

            let logout = {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store.logout().await;
                })
            };
            let login = {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store.adopt_token("tok-b", false).await.unwrap();
                })
            };
            logout.await.unwrap();
            login.await.unwrap();

            assert_eq!(store.snapshot().await.token, tokens.token());
        }
    }

    #[tokio::test]
    async fn test_teardown_keeps_persisted_token() {
        let tokens = Arc::new(MemoryTokenStore::with_token("tok-a"));
        let backend = FakeBackend::default().with_profile("tok-a", user(true, false));
        let store = store(backend, tokens.clone());
        store.init().await;

        store.teardown().await;
        assert_eq!(tokens.token().as_deref(), Some("tok-a"));
    }
}
