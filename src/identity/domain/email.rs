//! Validated email address type.

use super::IdentityDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for an email address, matching the `VARCHAR(255)` column.
const MAX_EMAIL_LENGTH: usize = 255;

/// Normalized (trimmed, lower-cased) email address used as login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::InvalidEmail`] unless the value has
    /// exactly one `@` separating a non-empty local part from a domain that
    /// contains a dot, with no whitespace anywhere.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_lowercase();

        let mut parts = normalized.split('@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        let has_more_parts = parts.next().is_some();

        let is_valid = !local.is_empty()
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !has_more_parts
            && normalized.len() <= MAX_EMAIL_LENGTH
            && !normalized.chars().any(char::is_whitespace);

        if !is_valid {
            return Err(IdentityDomainError::InvalidEmail(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
