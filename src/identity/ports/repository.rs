//! Repository port for user account persistence and lookup.

use crate::identity::domain::{EmailAddress, UserAccount, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user account repository operations.
pub type UserAccountRepositoryResult<T> = Result<T, UserAccountRepositoryError>;

/// User account persistence contract.
#[async_trait]
pub trait UserAccountRepository: Send + Sync {
    /// Stores a new account.
    ///
    /// # Errors
    ///
    /// Returns [`UserAccountRepositoryError::DuplicateAccount`] when the ID
    /// already exists or [`UserAccountRepositoryError::DuplicateEmail`] when
    /// the email is already registered.
    async fn store(&self, account: &UserAccount) -> UserAccountRepositoryResult<()>;

    /// Finds an account by identifier.
    ///
    /// Returns `None` when the account does not exist.
    async fn find_by_id(&self, id: UserId) -> UserAccountRepositoryResult<Option<UserAccount>>;

    /// Finds an account by login email.
    ///
    /// Returns `None` when no account uses the email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> UserAccountRepositoryResult<Option<UserAccount>>;

    /// Returns the number of stored accounts, active or not.
    async fn count(&self) -> UserAccountRepositoryResult<u64>;
}

/// Errors returned by user account repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserAccountRepositoryError {
    /// An account with the same identifier already exists.
    #[error("duplicate account identifier: {0}")]
    DuplicateAccount(UserId),

    /// An account with the same email already exists.
    #[error("email already registered: {0}")]
    DuplicateEmail(EmailAddress),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserAccountRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
