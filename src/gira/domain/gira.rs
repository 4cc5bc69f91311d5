//! Gira aggregate root.

use super::{GiraDomainError, GiraId, GiraStatus};
use crate::catalog::domain::GiraTypeId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;

/// One service session of a given type.
///
/// `closed_at` is set exactly when the status is [`GiraStatus::Closed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gira {
    id: GiraId,
    gira_type_id: GiraTypeId,
    status: GiraStatus,
    opened_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted gira.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedGiraData {
    /// Persisted gira identifier.
    pub id: GiraId,
    /// Persisted gira type.
    pub gira_type_id: GiraTypeId,
    /// Persisted status.
    pub status: GiraStatus,
    /// Persisted opening timestamp.
    pub opened_at: DateTime<Utc>,
    /// Persisted closing timestamp.
    pub closed_at: Option<DateTime<Utc>>,
}

impl Gira {
    /// Opens a new gira of the given type.
    #[must_use]
    pub fn open(gira_type_id: GiraTypeId, clock: &impl Clock) -> Self {
        Self {
            id: GiraId::new(),
            gira_type_id,
            status: GiraStatus::Open,
            opened_at: clock.utc(),
            closed_at: None,
        }
    }

    /// Reconstructs a gira from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedGiraData) -> Self {
        Self {
            id: data.id,
            gira_type_id: data.gira_type_id,
            status: data.status,
            opened_at: data.opened_at,
            closed_at: data.closed_at,
        }
    }

    /// Returns the gira identifier.
    #[must_use]
    pub const fn id(&self) -> GiraId {
        self.id
    }

    /// Returns the gira type.
    #[must_use]
    pub const fn gira_type_id(&self) -> GiraTypeId {
        self.gira_type_id
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> GiraStatus {
        self.status
    }

    /// Returns `true` while the gira is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.status, GiraStatus::Open)
    }

    /// Returns the opening timestamp.
    #[must_use]
    pub const fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Returns the closing timestamp, if closed.
    #[must_use]
    pub const fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Closes the gira.
    ///
    /// Pending queue entries are checked by the store, atomically with the
    /// status update.
    ///
    /// # Errors
    ///
    /// Returns [`GiraDomainError::GiraAlreadyClosed`] when already closed.
    pub fn close(&mut self, clock: &impl Clock) -> Result<(), GiraDomainError> {
        if !self.is_open() {
            return Err(GiraDomainError::GiraAlreadyClosed(self.id));
        }
        self.status = GiraStatus::Closed;
        self.closed_at = Some(clock.utc());
        Ok(())
    }
}

/// An open gira with its queue length and presence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenGiraCounts {
    /// The open gira.
    pub gira: Gira,
    /// Number of queue entries in any status.
    pub queue_length: u64,
    /// Number of practitioners marked present.
    pub present_count: u64,
}
