//! Service layer for the consultation queue.

use super::{GiraServiceError, GiraServiceResult};
use crate::catalog::{domain::PractitionerId, ports::CatalogRepository};
use crate::gira::{
    domain::{
        AssignmentPolicy, Consultant, EnqueueGuard, GiraId, PendingQueueEntry, QueueEntry,
        QueueEntryId, QueueStatus,
    },
    ports::{EntryChange, QueueRepository, QueueRepositoryError},
};
use mockable::Clock;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Policies that shape queue behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueuePolicy {
    /// Which entries may be (re)assigned.
    pub assignment: AssignmentPolicy,
    /// Whether closed giras accept new entries.
    pub enqueue_guard: EnqueueGuard,
}

impl QueuePolicy {
    /// Sets the assignment policy.
    #[must_use]
    pub const fn with_assignment(mut self, assignment: AssignmentPolicy) -> Self {
        self.assignment = assignment;
        self
    }

    /// Sets the enqueue guard.
    #[must_use]
    pub const fn with_enqueue_guard(mut self, enqueue_guard: EnqueueGuard) -> Self {
        self.enqueue_guard = enqueue_guard;
        self
    }
}

/// Request payload for adding a consultant to a gira's queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnqueueRequest {
    gira_id: GiraId,
    consultant_name: String,
    consultant_phone: Option<String>,
}

impl EnqueueRequest {
    /// Creates a request without a phone number.
    #[must_use]
    pub fn new(gira_id: GiraId, consultant_name: impl Into<String>) -> Self {
        Self {
            gira_id,
            consultant_name: consultant_name.into(),
            consultant_phone: None,
        }
    }

    /// Attaches a contact phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.consultant_phone = Some(phone.into());
        self
    }
}

/// Queue orchestration service.
#[derive(Clone)]
pub struct QueueEngine<Q, K, C>
where
    Q: QueueRepository,
    K: CatalogRepository,
    C: Clock + Send + Sync,
{
    queue: Arc<Q>,
    catalog: Arc<K>,
    clock: Arc<C>,
    policy: QueuePolicy,
}

impl<Q, K, C> QueueEngine<Q, K, C>
where
    Q: QueueRepository,
    K: CatalogRepository,
    C: Clock + Send + Sync,
{
    /// Creates a queue engine with the default policy.
    #[must_use]
    pub fn new(queue: Arc<Q>, catalog: Arc<K>, clock: Arc<C>) -> Self {
        Self {
            queue,
            catalog,
            clock,
            policy: QueuePolicy::default(),
        }
    }

    /// Replaces the queue policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: QueuePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the active queue policy.
    #[must_use]
    pub const fn policy(&self) -> QueuePolicy {
        self.policy
    }

    /// Adds a consultant to the end of a gira's queue.
    ///
    /// A sequence conflict with a concurrent enqueue is retried once.
    ///
    /// # Errors
    ///
    /// Returns [`GiraServiceError::Domain`] for invalid consultant details,
    /// [`GiraServiceError::GiraNotFound`] for an unknown gira,
    /// [`QueueRepositoryError::GiraClosed`] when the guard rejects a closed
    /// gira, and [`QueueRepositoryError::SequenceConflict`] when the retry
    /// also loses the race.
    pub async fn enqueue(&self, request: EnqueueRequest) -> GiraServiceResult<QueueEntry> {
        let EnqueueRequest {
            gira_id,
            consultant_name,
            consultant_phone,
        } = request;
        let consultant = Consultant::new(consultant_name, consultant_phone)?;
        let pending = PendingQueueEntry::new(gira_id, consultant, &*self.clock);
        let guard = self.policy.enqueue_guard;

        let entry = match self.queue.append(&pending, guard).await {
            Err(QueueRepositoryError::SequenceConflict(_)) => {
                warn!(gira_id = %gira_id, "sequence conflict on enqueue, retrying");
                self.queue.append(&pending, guard).await
            }
            other => other,
        }
        .map_err(map_queue_error)?;

        info!(
            gira_id = %gira_id,
            entry_id = %entry.id(),
            sequence = %entry.sequence(),
            "enqueued consultant"
        );
        Ok(entry)
    }

    /// Puts an entry in service with a practitioner.
    ///
    /// If the practitioner is already serving another entry of the same
    /// gira, that entry is completed in the same atomic commit.
    ///
    /// # Errors
    ///
    /// Returns [`GiraServiceError::PractitionersNotFound`] or
    /// [`GiraServiceError::EntryNotFound`] for unknown references,
    /// [`GiraServiceError::Domain`] when the assignment policy rejects the
    /// entry's status, and [`QueueRepositoryError::StaleEntry`] or
    /// [`QueueRepositoryError::PractitionerBusy`] when a concurrent change
    /// won.
    pub async fn assign_practitioner(
        &self,
        entry_id: QueueEntryId,
        practitioner_id: PractitionerId,
    ) -> GiraServiceResult<QueueEntry> {
        if self
            .catalog
            .find_practitioner(practitioner_id)
            .await?
            .is_none()
        {
            return Err(GiraServiceError::PractitionersNotFound(vec![
                practitioner_id,
            ]));
        }

        let mut entry = self.find(entry_id).await?;
        let expected = entry.status();
        if let Err(err) = entry.assign(practitioner_id, self.policy.assignment, &*self.clock) {
            warn!(entry_id = %entry_id, status = %expected, "rejected assignment");
            return Err(err.into());
        }

        let mut changes = Vec::with_capacity(2);
        let previous = self
            .queue
            .find_in_service(entry.gira_id(), practitioner_id)
            .await
            .map_err(map_queue_error)?
            .filter(|serving| serving.id() != entry_id);
        if let Some(mut serving) = previous {
            serving.transition_to(QueueStatus::Done, &*self.clock)?;
            info!(
                entry_id = %serving.id(),
                practitioner_id = %practitioner_id,
                "completed previous entry on reassignment"
            );
            changes.push(EntryChange::new(serving, QueueStatus::InService));
        }
        changes.push(EntryChange::new(entry.clone(), expected));

        self.queue.commit(&changes).await.map_err(map_queue_error)?;
        info!(
            entry_id = %entry_id,
            practitioner_id = %practitioner_id,
            "assigned practitioner"
        );
        Ok(entry)
    }

    /// Moves an entry along the transition table.
    ///
    /// # Errors
    ///
    /// Returns [`GiraServiceError::EntryNotFound`] for an unknown entry,
    /// [`GiraServiceError::Domain`] for a move outside the table (including
    /// `in_service`, which goes through
    /// [`Self::assign_practitioner`]), and
    /// [`QueueRepositoryError::StaleEntry`] when a concurrent change won.
    pub async fn update_status(
        &self,
        entry_id: QueueEntryId,
        status: QueueStatus,
    ) -> GiraServiceResult<QueueEntry> {
        let mut entry = self.find(entry_id).await?;
        let expected = entry.status();
        if let Err(err) = entry.transition_to(status, &*self.clock) {
            warn!(entry_id = %entry_id, from = %expected, to = %status, "rejected transition");
            return Err(err.into());
        }

        self.queue
            .commit(&[EntryChange::new(entry.clone(), expected)])
            .await
            .map_err(map_queue_error)?;
        info!(entry_id = %entry_id, from = %expected, to = %status, "updated entry status");
        Ok(entry)
    }

    /// Lists a gira's queue by ascending sequence.
    ///
    /// # Errors
    ///
    /// Returns [`GiraServiceError::GiraNotFound`] for an unknown gira.
    pub async fn list_queue(&self, gira_id: GiraId) -> GiraServiceResult<Vec<QueueEntry>> {
        self.queue
            .list_by_gira(gira_id)
            .await
            .map_err(map_queue_error)
    }

    /// Finds a queue entry by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GiraServiceError::EntryNotFound`] for an unknown entry.
    pub async fn find(&self, entry_id: QueueEntryId) -> GiraServiceResult<QueueEntry> {
        self.queue
            .find_by_id(entry_id)
            .await
            .map_err(map_queue_error)?
            .ok_or(GiraServiceError::EntryNotFound(entry_id))
    }
}

fn map_queue_error(err: QueueRepositoryError) -> GiraServiceError {
    match err {
        QueueRepositoryError::GiraNotFound(id) => GiraServiceError::GiraNotFound(id),
        QueueRepositoryError::EntryNotFound(id) => GiraServiceError::EntryNotFound(id),
        other => GiraServiceError::Queue(other),
    }
}
