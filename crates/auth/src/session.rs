//! Session state machine.
//!
//! ```text
//! Unauthenticated --LoggedIn--> Authenticated --RefreshStarted--> Refreshing
//! Refreshing --RefreshSucceeded--> Authenticated
//! Refreshing --RefreshFailed--> LoggedOut
//! any --LoggedIn--> Authenticated,  any --LoggedOut--> LoggedOut
//! ```

use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No tokens stored.
    Unauthenticated,
    /// An access token is stored and believed valid.
    Authenticated,
    /// The access token was rejected; a refresh exchange is in flight.
    Refreshing,
    /// The session ended (logout or failed refresh); a new login is required.
    LoggedOut,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    RefreshStarted,
    RefreshSucceeded,
    RefreshFailed,
    LoggedOut,
}

impl SessionState {
    /// State of a freshly constructed client.
    pub fn initial(has_access_token: bool) -> Self {
        if has_access_token {
            Self::Authenticated
        } else {
            Self::Unauthenticated
        }
    }

    pub fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated | Self::Refreshing)
    }

    /// Apply an event.
    ///
    /// A refresh can only finish from `Refreshing`; a stray completion (e.g.
    /// after an explicit logout raced it) leaves the state unchanged.
    pub fn apply(self, event: SessionEvent) -> Self {
        match (self, event) {
            (_, SessionEvent::LoggedIn) => Self::Authenticated,
            (_, SessionEvent::LoggedOut) => Self::LoggedOut,
            (Self::LoggedOut, SessionEvent::RefreshStarted) => Self::LoggedOut,
            (_, SessionEvent::RefreshStarted) => Self::Refreshing,
            (Self::Refreshing, SessionEvent::RefreshSucceeded) => Self::Authenticated,
            (Self::Refreshing, SessionEvent::RefreshFailed) => Self::LoggedOut,
            (state, SessionEvent::RefreshSucceeded | SessionEvent::RefreshFailed) => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_follows_stored_token() {
        assert_eq!(SessionState::initial(true), SessionState::Authenticated);
        assert_eq!(SessionState::initial(false), SessionState::Unauthenticated);
    }

    #[test]
    fn refresh_cycle() {
        let s = SessionState::Authenticated.apply(SessionEvent::RefreshStarted);
        assert_eq!(s, SessionState::Refreshing);
        assert!(s.is_authenticated());
        assert_eq!(s.apply(SessionEvent::RefreshSucceeded), SessionState::Authenticated);
        assert_eq!(s.apply(SessionEvent::RefreshFailed), SessionState::LoggedOut);
    }

    #[test]
    fn logged_out_requires_login() {
        let s = SessionState::LoggedOut;
        assert_eq!(s.apply(SessionEvent::RefreshStarted), SessionState::LoggedOut);
        assert_eq!(s.apply(SessionEvent::RefreshSucceeded), SessionState::LoggedOut);
        assert_eq!(s.apply(SessionEvent::LoggedIn), SessionState::Authenticated);
    }

    #[test]
    fn stray_refresh_completion_is_ignored() {
        assert_eq!(
            SessionState::Authenticated.apply(SessionEvent::RefreshFailed),
            SessionState::Authenticated
        );
    }
}
