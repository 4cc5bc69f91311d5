//! Domain model for user accounts and caller identities.
//!
//! Accounts carry validated contact data and an argon2 password hash; the
//! [`Identity`] value is what the rest of the system sees after a token has
//! been verified.

mod account;
mod email;
mod error;
mod ids;
mod identity;
mod password;
mod role;

pub use account::{NewUserAccount, PersistedUserAccountData, UserAccount};
pub use email::EmailAddress;
pub use error::{IdentityDomainError, ParseAccessRoleError};
pub use identity::{AuthorizationError, Identity};
pub use ids::UserId;
pub use password::PasswordHash;
pub use role::AccessRole;
