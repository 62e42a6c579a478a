//! Session state machine
//!
//! [`transition`] is a pure function from the current [`Session`] and an
//! incoming [`SessionEvent`] to the next session plus the side effects the
//! caller must perform. The store drives it; tests can drive it directly.

use serde::Serialize;
use std::fmt;

use crate::client::UserProfile;

/// Token and profile of the current user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    pub is_loading: bool,
}

/// Coarse session state that redirects are decided on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No token
    Unauthenticated,
    /// Token present, profile not yet known
    Loading,
    /// Signed in, onboarding wizard not finished
    AuthenticatedOnboarding,
    /// Signed in, onboarding finished or superuser
    AuthenticatedComplete,
}

impl SessionPhase {
    pub const ALL: [SessionPhase; 4] = [
        SessionPhase::Unauthenticated,
        SessionPhase::Loading,
        SessionPhase::AuthenticatedOnboarding,
        SessionPhase::AuthenticatedComplete,
    ];

    pub fn is_authenticated(&self) -> bool {
        matches!(
            self,
            SessionPhase::AuthenticatedOnboarding | SessionPhase::AuthenticatedComplete
        )
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionPhase::Unauthenticated => "unauthenticated",
            SessionPhase::Loading => "loading",
            SessionPhase::AuthenticatedOnboarding => "authenticated-onboarding",
            SessionPhase::AuthenticatedComplete => "authenticated-complete",
        };
        f.write_str(s)
    }
}

impl Session {
    pub fn phase(&self) -> SessionPhase {
        match (&self.token, &self.user) {
            (None, _) => SessionPhase::Unauthenticated,
            (Some(_), None) => SessionPhase::Loading,
            (Some(_), Some(user)) if user.needs_onboarding() => {
                SessionPhase::AuthenticatedOnboarding
            }
            (Some(_), Some(_)) => SessionPhase::AuthenticatedComplete,
        }
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Token read from storage at startup
    Restored(Option<String>),
    /// Credentials were exchanged for a token
    LoggedIn(String),
    /// Re-fetch the profile for the current token
    RefreshRequested,
    /// Profile fetch for `token` succeeded
    ProfileLoaded { token: String, user: UserProfile },
    /// Profile fetch for `token` failed (HTTP error or network)
    ProfileFailed { token: String },
    LoggedOut,
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    PersistToken(String),
    ClearToken,
    FetchProfile(String),
}

/// Compute the next session and its effects.
///
/// Profile results for a token other than the one currently held are
/// stale (a logout or re-login happened meanwhile) and are dropped.
pub fn transition(session: &Session, event: SessionEvent) -> (Session, Vec<Effect>) {
    match event {
        SessionEvent::Restored(None) => (Session::default(), vec![]),
        SessionEvent::Restored(Some(token)) | SessionEvent::LoggedIn(token)
            if token.trim().is_empty() =>
        {
            (Session::default(), vec![Effect::ClearToken])
        }
        SessionEvent::Restored(Some(token)) => (
            loading(token.clone(), None),
            vec![Effect::FetchProfile(token)],
        ),
        SessionEvent::LoggedIn(token) => (
            loading(token.clone(), None),
            vec![Effect::PersistToken(token.clone()), Effect::FetchProfile(token)],
        ),
        SessionEvent::RefreshRequested => match &session.token {
            Some(token) => (
                loading(token.clone(), session.user.clone()),
                vec![Effect::FetchProfile(token.clone())],
            ),
            None => (session.clone(), vec![]),
        },
        SessionEvent::ProfileLoaded { token, user } => {
            if session.token.as_deref() != Some(token.as_str()) {
                return (session.clone(), vec![]);
            }
            (
                Session {
                    token: Some(token),
                    user: Some(user),
                    is_loading: false,
                },
                vec![],
            )
        }
        SessionEvent::ProfileFailed { token } => {
            if session.token.as_deref() != Some(token.as_str()) {
                return (session.clone(), vec![]);
            }
            (Session::default(), vec![Effect::ClearToken])
        }
        SessionEvent::LoggedOut => (Session::default(), vec![Effect::ClearToken]),
    }
}

fn loading(token: String, user: Option<UserProfile>) -> Session {
    Session {
        token: Some(token),
        user,
        is_loading: true,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn user(onboarding_completed: bool, is_superuser: bool) -> UserProfile {
        UserProfile {
            id: 1,
            email: "ops@acme.test".to_string(),
            username: "ops".to_string(),
            onboarding_completed,
            onboarding_step: if onboarding_completed { 4 } else { 1 },
            is_superuser,
        }
    }

    fn loaded(token: &str, u: UserProfile) -> Session {
        transition(
            &loading(token.to_string(), None),
            SessionEvent::ProfileLoaded {
                token: token.to_string(),
                user: u,
            },
        )
        .0
    }

    #[test]
    fn test_restore_without_token() {
        let (s, effects) = transition(&Session::default(), SessionEvent::Restored(None));
        assert_eq!(s.phase(), SessionPhase::Unauthenticated);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_restore_with_token_starts_loading() {
        let (s, effects) = transition(
            &Session::default(),
            SessionEvent::Restored(Some("tok".to_string())),
        );
        assert_eq!(s.phase(), SessionPhase::Loading);
        assert!(s.is_loading);
        assert_eq!(effects, vec![Effect::FetchProfile("tok".to_string())]);
    }

    #[test]
    fn test_blank_token_is_discarded() {
        let (s, effects) = transition(
            &Session::default(),
            SessionEvent::Restored(Some("  ".to_string())),
        );
        assert_eq!(s.phase(), SessionPhase::Unauthenticated);
        assert_eq!(effects, vec![Effect::ClearToken]);
    }

    #[test]
    fn test_login_persists_then_fetches() {
        let (s, effects) = transition(&Session::default(), SessionEvent::LoggedIn("t".to_string()));
        assert_eq!(s.phase(), SessionPhase::Loading);
        assert_eq!(
            effects,
            vec![
                Effect::PersistToken("t".to_string()),
                Effect::FetchProfile("t".to_string())
            ]
        );
    }

    #[test]
    fn test_profile_flags_pick_phase() {
        assert_eq!(
            loaded("t", user(false, false)).phase(),
            SessionPhase::AuthenticatedOnboarding
        );
        assert_eq!(
            loaded("t", user(true, false)).phase(),
            SessionPhase::AuthenticatedComplete
        );
        assert_eq!(
            loaded("t", user(false, true)).phase(),
            SessionPhase::AuthenticatedComplete
        );
        assert!(!loaded("t", user(true, false)).is_loading);
    }

    #[test]
    fn test_profile_failure_forces_logout() {
        let (s, effects) = transition(
            &loading("t".to_string(), None),
            SessionEvent::ProfileFailed {
                token: "t".to_string(),
            },
        );
        assert_eq!(s, Session::default());
        assert_eq!(effects, vec![Effect::ClearToken]);
    }

    #[test]
    fn test_stale_profile_results_ignored() {
        let (s, effects) = transition(
            &Session::default(),
            SessionEvent::ProfileLoaded {
                token: "old".to_string(),
                user: user(true, false),
            },
        );
        assert_eq!(s.phase(), SessionPhase::Unauthenticated);
        assert!(effects.is_empty());

        let current = loading("new".to_string(), None);
        let (s, effects) = transition(
            &current,
            SessionEvent::ProfileFailed {
                token: "old".to_string(),
            },
        );
        assert_eq!(s, current);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_refresh_keeps_profile_while_loading() {
        let session = loaded("t", user(true, false));
        let (s, effects) = transition(&session, SessionEvent::RefreshRequested);
        assert!(s.is_loading);
        assert_eq!(s.phase(), SessionPhase::AuthenticatedComplete);
        assert_eq!(effects, vec![Effect::FetchProfile("t".to_string())]);

        let (s, effects) = transition(&Session::default(), SessionEvent::RefreshRequested);
        assert_eq!(s, Session::default());
        assert!(effects.is_empty());
    }

    #[test]
    fn test_logout_clears_everything() {
        let (s, effects) = transition(&loaded("t", user(true, true)), SessionEvent::LoggedOut);
        assert_eq!(s, Session::default());
        assert_eq!(effects, vec![Effect::ClearToken]);
    }

    #[test]
    fn test_never_authenticated_without_token() {
        let s = Session {
            token: None,
            user: Some(user(true, true)),
            is_loading: false,
        };
        assert_eq!(s.phase(), SessionPhase::Unauthenticated);
    }
}
