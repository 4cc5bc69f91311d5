//! Configurable business rules for assignment and enqueueing.

use super::ParsePolicyError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which entries a practitioner may be assigned to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentPolicy {
    /// Only `waiting` entries can be assigned.
    #[default]
    Strict,
    /// `in_service` and `done` entries can also be (re)assigned, which puts
    /// them back in service. `canceled` entries never can.
    Lenient,
}

impl AssignmentPolicy {
    /// Returns the configuration representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }
}

impl fmt::Display for AssignmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AssignmentPolicy {
    type Error = ParsePolicyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(ParsePolicyError(value.to_owned())),
        }
    }
}

/// Whether consultants may join the queue of a closed gira.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnqueueGuard {
    /// Enqueueing into a closed gira is refused.
    #[default]
    RequireOpen,
    /// Any existing gira accepts new entries.
    AllowClosed,
}

impl EnqueueGuard {
    /// Returns the configuration representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequireOpen => "require_open",
            Self::AllowClosed => "allow_closed",
        }
    }

    /// Returns `true` when the target gira must be open.
    #[must_use]
    pub const fn requires_open(self) -> bool {
        matches!(self, Self::RequireOpen)
    }
}

impl fmt::Display for EnqueueGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for EnqueueGuard {
    type Error = ParsePolicyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "require_open" => Ok(Self::RequireOpen),
            "allow_closed" => Ok(Self::AllowClosed),
            _ => Err(ParsePolicyError(value.to_owned())),
        }
    }
}
