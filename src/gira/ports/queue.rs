//! Repository port for queue entries.

use crate::catalog::domain::PractitionerId;
use crate::gira::domain::{
    EnqueueGuard, GiraId, PendingQueueEntry, QueueEntry, QueueEntryId, QueueStatus,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for queue repository operations.
pub type QueueRepositoryResult<T> = Result<T, QueueRepositoryError>;

/// A mutated entry together with the status it had when it was read.
///
/// The store only applies the change if the stored status still matches
/// `expected`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryChange {
    /// The entry in its new state.
    pub entry: QueueEntry,
    /// The status the entry had before the change.
    pub expected: QueueStatus,
}

impl EntryChange {
    /// Pairs a changed entry with its prior status.
    #[must_use]
    pub const fn new(entry: QueueEntry, expected: QueueStatus) -> Self {
        Self { entry, expected }
    }
}

/// Queue entry persistence contract.
#[async_trait]
pub trait QueueRepository: Send + Sync {
    /// Numbers and inserts a pending entry.
    ///
    /// The sequence is one more than the highest already issued for the
    /// gira, computed under a per-gira lock.
    ///
    /// # Errors
    ///
    /// Returns [`QueueRepositoryError::GiraNotFound`],
    /// [`QueueRepositoryError::GiraClosed`] when `guard` requires an open
    /// gira, or [`QueueRepositoryError::SequenceConflict`] when a
    /// concurrent insert took the same number.
    async fn append(
        &self,
        pending: &PendingQueueEntry,
        guard: EnqueueGuard,
    ) -> QueueRepositoryResult<QueueEntry>;

    /// Applies entry changes in order, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`QueueRepositoryError::EntryNotFound`],
    /// [`QueueRepositoryError::StaleEntry`] when a stored status differs
    /// from the expected one, or [`QueueRepositoryError::PractitionerBusy`]
    /// when a practitioner would serve two entries of a gira at once.
    async fn commit(&self, changes: &[EntryChange]) -> QueueRepositoryResult<()>;

    /// Finds an entry by identifier.
    async fn find_by_id(&self, id: QueueEntryId) -> QueueRepositoryResult<Option<QueueEntry>>;

    /// Lists every entry of a gira by ascending sequence.
    ///
    /// # Errors
    ///
    /// Returns [`QueueRepositoryError::GiraNotFound`] for an unknown gira.
    async fn list_by_gira(&self, gira_id: GiraId) -> QueueRepositoryResult<Vec<QueueEntry>>;

    /// Finds the entry a practitioner is currently serving in a gira.
    async fn find_in_service(
        &self,
        gira_id: GiraId,
        practitioner_id: PractitionerId,
    ) -> QueueRepositoryResult<Option<QueueEntry>>;
}

/// Errors returned by queue repository implementations.
#[derive(Debug, Clone, Error)]
pub enum QueueRepositoryError {
    /// The gira does not exist.
    #[error("gira not found: {0}")]
    GiraNotFound(GiraId),

    /// The gira is closed and the guard requires an open one.
    #[error("gira {0} is closed")]
    GiraClosed(GiraId),

    /// A concurrent insert claimed the same sequence number.
    #[error("sequence number conflict in gira {0}")]
    SequenceConflict(GiraId),

    /// The entry does not exist.
    #[error("queue entry not found: {0}")]
    EntryNotFound(QueueEntryId),

    /// The entry changed since it was read.
    #[error("queue entry {entry_id} is {actual}, expected {expected}")]
    StaleEntry {
        /// Entry that changed.
        entry_id: QueueEntryId,
        /// Status the caller read.
        expected: QueueStatus,
        /// Status currently stored.
        actual: QueueStatus,
    },

    /// The practitioner is already serving another entry in the gira.
    #[error("practitioner {practitioner_id} is already in service in gira {gira_id}")]
    PractitionerBusy {
        /// Gira in which the conflict happened.
        gira_id: GiraId,
        /// Practitioner with two active entries.
        practitioner_id: PractitionerId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl QueueRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
