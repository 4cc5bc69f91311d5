//! Access roles granted to user accounts.

use super::ParseAccessRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role carried by an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRole {
    /// May open and close giras, mark presence, and manage the catalog.
    Admin,
    /// Front-desk operator: may work the queue of any open gira.
    User,
}

impl AccessRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for AccessRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AccessRole {
    type Error = ParseAccessRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(ParseAccessRoleError(value.to_owned())),
        }
    }
}
