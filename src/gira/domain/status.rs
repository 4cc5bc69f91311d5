//! Gira and queue entry status enums with their transition table.

use super::{ParseGiraStatusError, ParseQueueStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a gira accepts queue work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiraStatus {
    /// The gira is running.
    Open,
    /// The gira has ended. Terminal.
    Closed,
}

impl GiraStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for GiraStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for GiraStatus {
    type Error = ParseGiraStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" | "aberta" => Ok(Self::Open),
            "closed" | "fechada" => Ok(Self::Closed),
            _ => Err(ParseGiraStatusError(value.to_owned())),
        }
    }
}

/// Where a consultant's ticket is in the service lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    /// Registered and waiting for a practitioner.
    Waiting,
    /// Being attended by the assigned practitioner.
    InService,
    /// Consultation finished. Terminal.
    Done,
    /// Withdrawn before finishing. Terminal.
    Canceled,
}

impl QueueStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::InService => "in_service",
            Self::Done => "done",
            Self::Canceled => "canceled",
        }
    }

    /// Returns `true` if the transition table allows moving to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Waiting, Self::InService | Self::Canceled)
                | (Self::InService, Self::Done | Self::Canceled)
        )
    }

    /// Returns `true` for `done` and `canceled`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Canceled)
    }

    /// Returns `true` while the entry keeps its gira from closing.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Waiting | Self::InService)
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for QueueStatus {
    type Error = ParseQueueStatusError;

    /// Accepts the canonical names and the Portuguese labels used by the
    /// front desk (`aguardando`, `em_atendimento`, `atendido`, `cancelado`).
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "waiting" | "aguardando" => Ok(Self::Waiting),
            "in_service" | "em_atendimento" => Ok(Self::InService),
            "done" | "atendido" => Ok(Self::Done),
            "canceled" | "cancelled" | "cancelado" => Ok(Self::Canceled),
            _ => Err(ParseQueueStatusError(value.to_owned())),
        }
    }
}
