//! Session primitives shared across the UI.
//!
//! # Design
//! - The session is owned by the backend; the UI only mirrors what `/user/me` says.
//! - Mutations are gated locally so an anonymous click never reaches the network.
//! - Keep this DOM-free; redirects happen in the app shell.

use crate::core::http::{ApiError, ApiErrorKind};
use extguard_api_models::UserProfile;

/// Session as currently known to the UI.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SessionState {
    /// The boot-time lookup has not answered yet.
    #[default]
    Checking,
    /// No backend session.
    Anonymous,
    /// Signed-in user.
    Authenticated(UserProfile),
}

impl SessionState {
    /// Whether mutations may be attempted.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Display name of the signed-in user.
    #[must_use]
    pub fn user_name(&self) -> Option<&str> {
        match self {
            Self::Authenticated(profile) => Some(profile.name.as_str()),
            _ => None,
        }
    }

    /// Drop the session after the backend answered 401/403.
    ///
    /// Returns whether anything changed.
    pub fn expire(&mut self) -> bool {
        if matches!(self, Self::Anonymous) {
            return false;
        }
        *self = Self::Anonymous;
        true
    }
}

/// Outcome of the local mutation gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationGate {
    /// Proceed with the request.
    Allowed,
    /// Reject locally and prompt for login.
    LoginRequired,
}

/// Decide whether a mutation may be sent for the given session.
#[must_use]
pub const fn gate_mutation(session: &SessionState) -> MutationGate {
    if session.is_authenticated() {
        MutationGate::Allowed
    } else {
        MutationGate::LoginRequired
    }
}

/// Session resolved from the boot-time `/user/me` lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionLookup {
    /// Resulting session state.
    pub state: SessionState,
    /// Whether the lookup failed for a reason other than "not signed in".
    pub degraded: bool,
}

impl SessionLookup {
    /// Interpret the lookup result.
    ///
    /// A profile without a usable name counts as anonymous.
    #[must_use]
    pub fn from_result(result: Result<Option<UserProfile>, ApiError>) -> Self {
        match result {
            Ok(Some(profile)) if !profile.name.trim().is_empty() => Self {
                state: SessionState::Authenticated(profile),
                degraded: false,
            },
            Ok(_) => Self {
                state: SessionState::Anonymous,
                degraded: false,
            },
            Err(err) => Self {
                state: SessionState::Anonymous,
                degraded: err.kind != ApiErrorKind::Unauthorized,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> UserProfile {
        UserProfile {
            name: name.to_string(),
            email: Some("user@example.com".to_string()),
            picture: None,
        }
    }

    #[test]
    fn only_authenticated_sessions_may_mutate() {
        assert_eq!(gate_mutation(&SessionState::Checking), MutationGate::LoginRequired);
        assert_eq!(gate_mutation(&SessionState::Anonymous), MutationGate::LoginRequired);
        assert_eq!(
            gate_mutation(&SessionState::Authenticated(profile("Kim"))),
            MutationGate::Allowed
        );
    }

    #[test]
    fn lookup_maps_unauthorized_to_plain_anonymous() {
        let lookup = SessionLookup::from_result(Err(ApiError {
            kind: ApiErrorKind::Unauthorized,
            status: Some(401),
            message: None,
        }));
        assert_eq!(lookup.state, SessionState::Anonymous);
        assert!(!lookup.degraded);
    }

    #[test]
    fn lookup_flags_other_failures() {
        let lookup = SessionLookup::from_result(Err(ApiError::transport("offline")));
        assert_eq!(lookup.state, SessionState::Anonymous);
        assert!(lookup.degraded);
    }

    #[test]
    fn lookup_requires_named_profile() {
        let ok = SessionLookup::from_result(Ok(Some(profile("Kim"))));
        assert_eq!(ok.state.user_name(), Some("Kim"));
        assert_eq!(
            SessionLookup::from_result(Ok(Some(profile("  ")))).state,
            SessionState::Anonymous
        );
        assert_eq!(SessionLookup::from_result(Ok(None)).state, SessionState::Anonymous);
    }

    #[test]
    fn expire_reports_changes_once() {
        let mut session = SessionState::Authenticated(profile("Kim"));
        assert!(session.expire());
        assert!(!session.expire());
        assert_eq!(session, SessionState::Anonymous);
    }
}
