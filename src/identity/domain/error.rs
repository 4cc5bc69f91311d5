//! Error types for identity domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing identity domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The account name is shorter than three characters after trimming.
    #[error("account name '{0}' must have at least 3 characters")]
    AccountNameTooShort(String),

    /// The email address is not of the form `local@domain`.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The password is shorter than the accepted minimum.
    #[error("password must have at least {minimum} characters")]
    PasswordTooShort {
        /// Minimum accepted password length.
        minimum: usize,
    },

    /// The password hasher rejected its input or parameters.
    #[error("password hashing failed: {0}")]
    PasswordHashing(String),
}

/// Error returned while parsing access roles from persistence or requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown access role: {0}")]
pub struct ParseAccessRoleError(pub String);
