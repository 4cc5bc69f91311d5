//! Authenticated caller identity and role checks.

use super::{AccessRole, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who is calling: the verified subject of a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    user_id: UserId,
    role: AccessRole,
}

/// Returned when a valid identity lacks the role an operation requires.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("user {user_id} with role {actual} lacks required role {required}")]
pub struct AuthorizationError {
    /// The caller that was refused.
    pub user_id: UserId,
    /// The role the caller holds.
    pub actual: AccessRole,
    /// The role the operation requires.
    pub required: AccessRole,
}

impl Identity {
    /// Creates an identity value.
    #[must_use]
    pub const fn new(user_id: UserId, role: AccessRole) -> Self {
        Self { user_id, role }
    }

    /// Returns the caller's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the caller's access role.
    #[must_use]
    pub const fn role(&self) -> AccessRole {
        self.role
    }

    /// Returns `true` when the caller is an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, AccessRole::Admin)
    }

    /// Ensures the caller is an administrator.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError`] for any non-admin identity.
    pub const fn require_admin(&self) -> Result<(), AuthorizationError> {
        if self.is_admin() {
            return Ok(());
        }
        Err(AuthorizationError {
            user_id: self.user_id,
            actual: self.role,
            required: AccessRole::Admin,
        })
    }
}
