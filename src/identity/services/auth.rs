//! Service layer for credential checks, token issue, and account creation.

use super::token::{SessionToken, TokenCodec, TokenError};
use crate::identity::{
    domain::{
        AccessRole, EmailAddress, Identity, IdentityDomainError, NewUserAccount, PasswordHash,
        UserAccount,
    },
    ports::{UserAccountRepository, UserAccountRepositoryError},
};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for creating a user account.
#[derive(Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    name: String,
    email: String,
    password: String,
    role: AccessRole,
}

impl CreateUserRequest {
    /// Creates a request for a front-desk (`user` role) account.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role: AccessRole::User,
        }
    }

    /// Sets the access role granted to the new account.
    #[must_use]
    pub const fn with_role(mut self, role: AccessRole) -> Self {
        self.role = role;
        self
    }
}

impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Result of a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    /// Who signed in.
    pub identity: Identity,
    /// Session token to present on later calls.
    pub token: SessionToken,
}

/// Service-level errors for authentication operations.
#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// Email and password did not identify an active account.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The presented token is missing, invalid, expired, or belongs to an
    /// account that is no longer active.
    #[error("authentication required")]
    Unauthenticated,

    /// An account already exists, so the first-admin bootstrap is closed.
    #[error("an account already exists; bootstrap is only allowed once")]
    AlreadyBootstrapped,

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),

    /// Token issue failed.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserAccountRepositoryError),

    /// The blocking password task panicked or was cancelled.
    #[error("password hashing task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

/// Result type for authentication service operations.
pub type AuthServiceResult<T> = Result<T, AuthServiceError>;

/// Authentication and account orchestration service.
#[derive(Clone)]
pub struct AuthService<R, C>
where
    R: UserAccountRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    tokens: TokenCodec,
}

impl<R, C> AuthService<R, C>
where
    R: UserAccountRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new authentication service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>, tokens: TokenCodec) -> Self {
        Self {
            repository,
            clock,
            tokens,
        }
    }

    /// Checks email and password against the stored account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::InvalidCredentials`] for a malformed or
    /// unknown email, an inactive account, or a wrong password, and
    /// [`AuthServiceError::Repository`] when the lookup fails.
    ///
    /// Every rejection costs one argon2 verification on the blocking pool;
    /// without a matching account the password is checked against
    /// [`PasswordHash::decoy`].
    pub async fn authenticate(&self, email: &str, password: &str) -> AuthServiceResult<Identity> {
        let account = match EmailAddress::new(email) {
            Ok(address) => self
                .repository
                .find_by_email(&address)
                .await?
                .filter(UserAccount::is_active),
            Err(_) => None,
        };

        let hash = account
            .as_ref()
            .map_or_else(PasswordHash::decoy, |found| found.password_hash().clone());
        let candidate = password.to_owned();
        let verified = tokio::task::spawn_blocking(move || hash.verify(&candidate)).await?;

        match account {
            Some(found) if verified => Ok(found.identity()),
            Some(found) => {
                warn!(user_id = %found.id(), "rejected sign-in with wrong password");
                Err(AuthServiceError::InvalidCredentials)
            }
            None => Err(AuthServiceError::InvalidCredentials),
        }
    }

    /// Issues a session token for an identity.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::Token`] if the token cannot be encoded.
    pub fn issue_token(&self, identity: &Identity) -> AuthServiceResult<SessionToken> {
        Ok(self.tokens.issue(identity, self.clock.utc())?)
    }

    /// Verifies a token signature and expiry without touching storage.
    #[must_use]
    pub fn verify_token(&self, token: &str) -> Option<Identity> {
        self.tokens.verify(token, self.clock.utc())
    }

    /// Resolves a token to the current identity of its account.
    ///
    /// The role is re-read from storage so a changed role takes effect on
    /// the next request.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::Unauthenticated`] when the token fails
    /// verification or the account is missing or inactive.
    pub async fn resolve(&self, token: &str) -> AuthServiceResult<Identity> {
        let claimed = self
            .verify_token(token)
            .ok_or(AuthServiceError::Unauthenticated)?;
        self.repository
            .find_by_id(claimed.user_id())
            .await?
            .filter(UserAccount::is_active)
            .map(|account| account.identity())
            .ok_or(AuthServiceError::Unauthenticated)
    }

    /// Authenticates and issues a session token in one step.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::authenticate`] and
    /// [`Self::issue_token`].
    pub async fn login(&self, email: &str, password: &str) -> AuthServiceResult<LoginOutcome> {
        let identity = self.authenticate(email, password).await?;
        let token = self.issue_token(&identity)?;
        info!(user_id = %identity.user_id(), role = %identity.role(), "user signed in");
        Ok(LoginOutcome { identity, token })
    }

    /// Creates the first administrator account.
    ///
    /// The requested role is ignored; the account is always an admin.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::AlreadyBootstrapped`] when any account
    /// exists, [`AuthServiceError::Domain`] for invalid fields, and
    /// [`AuthServiceError::Repository`] when persistence fails.
    pub async fn bootstrap_admin(
        &self,
        request: CreateUserRequest,
    ) -> AuthServiceResult<UserAccount> {
        if self.repository.count().await? > 0 {
            return Err(AuthServiceError::AlreadyBootstrapped);
        }
        self.create_user(request.with_role(AccessRole::Admin)).await
    }

    /// Creates a user account with the requested role.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::Domain`] for invalid fields and
    /// [`AuthServiceError::Repository`] for a duplicate email or a
    /// persistence failure. The password is hashed on the blocking pool.
    pub async fn create_user(&self, request: CreateUserRequest) -> AuthServiceResult<UserAccount> {
        let CreateUserRequest {
            name,
            email,
            password,
            role,
        } = request;
        let new_account =
            tokio::task::spawn_blocking(move || NewUserAccount::new(name, email, &password, role))
                .await??;
        let account = UserAccount::create(new_account, &*self.clock);
        self.repository.store(&account).await?;
        info!(user_id = %account.id(), role = %account.role(), "created user account");
        Ok(account)
    }
}
