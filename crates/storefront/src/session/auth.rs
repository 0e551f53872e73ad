//! Authentication state machine.
//!
//! `Unchecked → Checking → Authenticated | Unauthenticated`. User-scoped
//! fetches happen only once the state is resolved; the neutral
//! `Unchecked`/`Checking` states render as loading, never as an error.

use crate::api::types::User;

/// Where the session stands with the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// No auth probe has been attempted yet.
    Unchecked,
    /// A probe is in flight.
    Checking,
    /// A user is signed in.
    Authenticated(User),
    /// Nobody is signed in. `expired` is true when the session ended
    /// underneath the user (mid-session 401) rather than by explicit
    /// logout, so the UI can word the notice differently.
    Unauthenticated {
        /// Whether the session expired rather than being logged out.
        expired: bool,
    },
}

impl AuthState {
    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Whether the auth probe has finished (either outcome).
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Authenticated(_) | Self::Unauthenticated { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchecked_is_not_resolved() {
        assert!(!AuthState::Unchecked.is_resolved());
        assert!(!AuthState::Checking.is_resolved());
        assert!(AuthState::Unauthenticated { expired: false }.is_resolved());
    }

    #[test]
    fn test_unauthenticated_has_no_user() {
        assert!(AuthState::Unauthenticated { expired: true }.user().is_none());
        assert!(!AuthState::Unauthenticated { expired: true }.is_authenticated());
    }
}
