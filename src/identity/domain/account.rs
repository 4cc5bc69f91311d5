//! User account aggregate root.

use super::{AccessRole, EmailAddress, Identity, IdentityDomainError, PasswordHash, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;

/// Shortest accepted display name for an account.
const MIN_NAME_LENGTH: usize = 3;

/// Validated input for creating a user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserAccount {
    name: String,
    email: EmailAddress,
    password_hash: PasswordHash,
    role: AccessRole,
}

impl NewUserAccount {
    /// Validates account fields and hashes the password.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError`] when the name is shorter than three
    /// characters, the email is malformed, or the password is rejected.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: &str,
        role: AccessRole,
    ) -> Result<Self, IdentityDomainError> {
        let raw_name = name.into();
        let trimmed = raw_name.trim();
        if trimmed.chars().count() < MIN_NAME_LENGTH {
            return Err(IdentityDomainError::AccountNameTooShort(raw_name));
        }

        Ok(Self {
            name: trimmed.to_owned(),
            email: EmailAddress::new(email)?,
            password_hash: PasswordHash::from_plain(password)?,
            role,
        })
    }

    /// Returns the normalized email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }
}

/// A person who can sign in to the desk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAccount {
    id: UserId,
    name: String,
    email: EmailAddress,
    #[serde(skip_serializing)]
    password_hash: PasswordHash,
    role: AccessRole,
    active: bool,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserAccountData {
    /// Persisted account identifier.
    pub id: UserId,
    /// Persisted display name.
    pub name: String,
    /// Persisted login email.
    pub email: EmailAddress,
    /// Persisted password hash.
    pub password_hash: PasswordHash,
    /// Persisted access role.
    pub role: AccessRole,
    /// Whether the account may sign in.
    pub active: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// Creates a new active account.
    #[must_use]
    pub fn create(new_account: NewUserAccount, clock: &impl Clock) -> Self {
        let NewUserAccount {
            name,
            email,
            password_hash,
            role,
        } = new_account;

        Self {
            id: UserId::new(),
            name,
            email,
            password_hash,
            role,
            active: true,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs an account from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserAccountData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            active: data.active,
            created_at: data.created_at,
        }
    }

    /// Returns the account identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the login email.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the stored password hash.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Returns the access role.
    #[must_use]
    pub const fn role(&self) -> AccessRole {
        self.role
    }

    /// Returns `true` when the account may sign in.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the identity this account authenticates as.
    #[must_use]
    pub const fn identity(&self) -> Identity {
        Identity::new(self.id, self.role)
    }
}
