//! Argon2 password hashes.

use super::IdentityDomainError;
use argon2::password_hash::{PasswordHash as PhcString, SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use std::fmt;

/// Shortest password accepted when creating an account.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Well-formed hash with the default argon2 cost whose password nobody
/// knows. Checked when no account matches so every failed sign-in costs
/// one full verification.
const DECOY_PHC: &str = concat!(
    "$argon2id$v=19$m=19456,t=2,p=1$reirrvnDCfIgs8nmwlg0+A$",
    "YrCRBLCpyU09dCA0erIegMMepVmYxZBV/nFOQYaIxzk",
);

/// Argon2 hash of an account password in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hashes a plain-text password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::PasswordTooShort`] when the password
    /// has fewer than six characters, or
    /// [`IdentityDomainError::PasswordHashing`] when argon2 rejects the
    /// input.
    pub fn from_plain(password: &str) -> Result<Self, IdentityDomainError> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(IdentityDomainError::PasswordTooShort {
                minimum: MIN_PASSWORD_LENGTH,
            });
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| IdentityDomainError::PasswordHashing(err.to_string()))?;
        Ok(Self(hash.to_string()))
    }

    /// Wraps a PHC string loaded from persistence.
    #[must_use]
    pub const fn from_phc(value: String) -> Self {
        Self(value)
    }

    /// Returns the hash checked in place of a missing account.
    #[must_use]
    pub fn decoy() -> Self {
        Self(DECOY_PHC.to_owned())
    }

    /// Returns the PHC string for storage.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks a candidate password against this hash.
    ///
    /// A malformed stored hash never verifies.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        PhcString::new(&self.0).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok()
        })
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
