//! Queue entry aggregate and its per-gira sequence number.

use super::{AssignmentPolicy, Consultant, GiraDomainError, GiraId, QueueEntryId, QueueStatus};
use crate::catalog::domain::PractitionerId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use std::fmt;

/// Per-gira ticket number. Starts at one and only ever grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SequenceNumber(i64);

impl SequenceNumber {
    /// The first ticket of every gira.
    pub const FIRST: Self = Self(1);

    /// Creates a validated sequence number.
    ///
    /// # Errors
    ///
    /// Returns [`GiraDomainError::NonPositiveSequence`] for zero or
    /// negative values.
    pub const fn new(value: i64) -> Result<Self, GiraDomainError> {
        if value <= 0 {
            return Err(GiraDomainError::NonPositiveSequence(value));
        }
        Ok(Self(value))
    }

    /// Returns the number following the highest one already issued.
    ///
    /// `None` (an empty queue) yields [`Self::FIRST`].
    #[must_use]
    pub const fn after(highest: Option<Self>) -> Self {
        match highest {
            Some(Self(value)) => Self(value.saturating_add(1)),
            None => Self::FIRST,
        }
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated entry that has not been given a sequence number yet.
///
/// The store numbers it atomically with insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQueueEntry {
    id: QueueEntryId,
    gira_id: GiraId,
    consultant: Consultant,
    created_at: DateTime<Utc>,
}

impl PendingQueueEntry {
    /// Prepares a new entry for the given gira.
    #[must_use]
    pub fn new(gira_id: GiraId, consultant: Consultant, clock: &impl Clock) -> Self {
        Self {
            id: QueueEntryId::new(),
            gira_id,
            consultant,
            created_at: clock.utc(),
        }
    }

    /// Returns the identifier the entry will be stored under.
    #[must_use]
    pub const fn id(&self) -> QueueEntryId {
        self.id
    }

    /// Returns the target gira.
    #[must_use]
    pub const fn gira_id(&self) -> GiraId {
        self.gira_id
    }

    /// Turns the pending entry into a waiting queue entry.
    #[must_use]
    pub fn into_entry(self, sequence: SequenceNumber) -> QueueEntry {
        QueueEntry {
            id: self.id,
            gira_id: self.gira_id,
            consultant: self.consultant,
            sequence,
            status: QueueStatus::Waiting,
            assigned_practitioner_id: None,
            created_at: self.created_at,
            started_at: None,
            finished_at: None,
        }
    }
}

/// One consultant's ticket within a gira.
///
/// A practitioner is assigned exactly when the status is `in_service` or
/// `done`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueEntry {
    id: QueueEntryId,
    gira_id: GiraId,
    consultant: Consultant,
    sequence: SequenceNumber,
    status: QueueStatus,
    assigned_practitioner_id: Option<PractitionerId>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted queue entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedQueueEntryData {
    /// Persisted entry identifier.
    pub id: QueueEntryId,
    /// Persisted gira.
    pub gira_id: GiraId,
    /// Persisted consultant details.
    pub consultant: Consultant,
    /// Persisted sequence number.
    pub sequence: SequenceNumber,
    /// Persisted status.
    pub status: QueueStatus,
    /// Persisted practitioner assignment.
    pub assigned_practitioner_id: Option<PractitionerId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted service start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Persisted service end timestamp.
    pub finished_at: Option<DateTime<Utc>>,
}

impl QueueEntry {
    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedQueueEntryData) -> Self {
        Self {
            id: data.id,
            gira_id: data.gira_id,
            consultant: data.consultant,
            sequence: data.sequence,
            status: data.status,
            assigned_practitioner_id: data.assigned_practitioner_id,
            created_at: data.created_at,
            started_at: data.started_at,
            finished_at: data.finished_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> QueueEntryId {
        self.id
    }

    /// Returns the owning gira.
    #[must_use]
    pub const fn gira_id(&self) -> GiraId {
        self.gira_id
    }

    /// Returns the consultant details.
    #[must_use]
    pub const fn consultant(&self) -> &Consultant {
        &self.consultant
    }

    /// Returns the ticket number.
    #[must_use]
    pub const fn sequence(&self) -> SequenceNumber {
        self.sequence
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> QueueStatus {
        self.status
    }

    /// Returns the practitioner serving or having served the entry.
    #[must_use]
    pub const fn assigned_practitioner_id(&self) -> Option<PractitionerId> {
        self.assigned_practitioner_id
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when service (last) started.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns when service ended.
    #[must_use]
    pub const fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Puts the entry in service with `practitioner`.
    ///
    /// Under [`AssignmentPolicy::Strict`] only waiting entries qualify.
    /// [`AssignmentPolicy::Lenient`] also re-opens `in_service` and `done`
    /// entries, restarting the service clock. Canceled entries never
    /// qualify.
    ///
    /// # Errors
    ///
    /// Returns [`GiraDomainError::InvalidTransition`] when the policy does
    /// not allow assigning an entry in its current status.
    pub fn assign(
        &mut self,
        practitioner: PractitionerId,
        policy: AssignmentPolicy,
        clock: &impl Clock,
    ) -> Result<(), GiraDomainError> {
        let allowed = match (self.status, policy) {
            (QueueStatus::Waiting, _)
            | (QueueStatus::InService | QueueStatus::Done, AssignmentPolicy::Lenient) => true,
            (QueueStatus::InService | QueueStatus::Done, AssignmentPolicy::Strict)
            | (QueueStatus::Canceled, _) => false,
        };
        if !allowed {
            return Err(self.invalid_transition(QueueStatus::InService));
        }

        self.status = QueueStatus::InService;
        self.assigned_practitioner_id = Some(practitioner);
        self.started_at = Some(clock.utc());
        self.finished_at = None;
        Ok(())
    }

    /// Moves the entry to `next` along the transition table.
    ///
    /// Finishing stamps `finished_at`. Canceling an entry in service also
    /// stamps `finished_at` and releases its practitioner.
    ///
    /// # Errors
    ///
    /// Returns [`GiraDomainError::InvalidTransition`] for moves outside the
    /// table and for `in_service`, which needs [`Self::assign`].
    pub fn transition_to(
        &mut self,
        next: QueueStatus,
        clock: &impl Clock,
    ) -> Result<(), GiraDomainError> {
        if next == QueueStatus::InService || !self.status.can_transition_to(next) {
            return Err(self.invalid_transition(next));
        }

        let previous = self.status;
        self.status = next;
        match next {
            QueueStatus::Done => self.finished_at = Some(clock.utc()),
            QueueStatus::Canceled if previous == QueueStatus::InService => {
                self.assigned_practitioner_id = None;
                self.finished_at = Some(clock.utc());
            }
            QueueStatus::Waiting | QueueStatus::InService | QueueStatus::Canceled => {}
        }
        Ok(())
    }

    const fn invalid_transition(&self, to: QueueStatus) -> GiraDomainError {
        GiraDomainError::InvalidTransition {
            entry_id: self.id,
            from: self.status,
            to,
        }
    }
}
