// src/auth/state.rs

use crate::users::Role;

/// Failures allowed before the session locks.
pub const MAX_FAILED_ATTEMPTS: u8 = 3;

/// Authentication state of one session, replaced wholesale on every
/// transition (login, failure, lockout, logout) instead of mutated in
/// place. There is no reset path out of `Locked`: the counter lives and
/// dies with the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous { failed_attempts: u8 },
    Locked,
    SignedIn { username: String, role: Role },
}

impl AuthState {
    pub fn anonymous() -> Self {
        AuthState::Anonymous { failed_attempts: 0 }
    }

    /// Successful login clears the failure history entirely.
    pub fn signed_in(username: &str, role: Role) -> Self {
        AuthState::SignedIn {
            username: username.to_string(),
            role,
        }
    }

    /// The state after one more failed credential check.
    pub fn after_failure(&self) -> Self {
        match self {
            AuthState::Anonymous { failed_attempts } => {
                let attempts = failed_attempts + 1;
                if attempts >= MAX_FAILED_ATTEMPTS {
                    AuthState::Locked
                } else {
                    AuthState::Anonymous {
                        failed_attempts: attempts,
                    }
                }
            }
            // A signed-in session that fails a login falls back to one
            // recorded failure; a locked session stays locked.
            AuthState::SignedIn { .. } => AuthState::Anonymous { failed_attempts: 1 },
            AuthState::Locked => AuthState::Locked,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, AuthState::Locked)
    }

    pub fn signed_in_user(&self) -> Option<(&str, Role)> {
        match self {
            AuthState::SignedIn { username, role } => Some((username.as_str(), *role)),
            _ => None,
        }
    }
}
