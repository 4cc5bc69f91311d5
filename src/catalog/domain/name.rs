//! Validated display names for catalog entries.

use super::CatalogDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MIN_NAME_LENGTH: usize = 2;
const MAX_NAME_LENGTH: usize = 100;

/// Trimmed name of a role, gira type, or practitioner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogName(String);

impl CatalogName {
    /// Creates a validated name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::NameTooShort`] when fewer than two
    /// characters remain after trimming, or
    /// [`CatalogDomainError::NameTooLong`] above one hundred characters.
    pub fn new(value: impl Into<String>) -> Result<Self, CatalogDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let length = trimmed.chars().count();

        if length < MIN_NAME_LENGTH {
            return Err(CatalogDomainError::NameTooShort {
                value: raw,
                minimum: MIN_NAME_LENGTH,
            });
        }
        if length > MAX_NAME_LENGTH {
            return Err(CatalogDomainError::NameTooLong {
                maximum: MAX_NAME_LENGTH,
                actual: length,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CatalogName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CatalogName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
