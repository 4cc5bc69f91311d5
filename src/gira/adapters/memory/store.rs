//! In-memory store for giras, presence, and queue entries.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::catalog::domain::PractitionerId;
use crate::gira::{
    domain::{
        EnqueueGuard, Gira, GiraId, OpenGiraCounts, PendingQueueEntry, PresenceSet, QueueEntry,
        QueueEntryId, QueueStatus, SequenceNumber,
    },
    ports::{
        EntryChange, GiraRepository, GiraRepositoryError, GiraRepositoryResult, QueueRepository,
        QueueRepositoryError, QueueRepositoryResult,
    },
};

/// Thread-safe in-memory store implementing both gira ports.
///
/// Every mutation runs under one write lock, which gives the same
/// atomicity the database adapter gets from row locks and transactions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGiraStore {
    state: Arc<RwLock<InMemoryGiraState>>,
}

#[derive(Debug, Default)]
struct InMemoryGiraState {
    giras: HashMap<GiraId, Gira>,
    presence: HashMap<GiraId, PresenceSet>,
    entries: HashMap<QueueEntryId, QueueEntry>,
}

impl InMemoryGiraState {
    fn entries_of(&self, gira_id: GiraId) -> impl Iterator<Item = &QueueEntry> {
        self.entries
            .values()
            .filter(move |entry| entry.gira_id() == gira_id)
    }

    fn busy_practitioner(&self, changes: &[EntryChange]) -> Option<(GiraId, PractitionerId)> {
        let changed: HashSet<QueueEntryId> =
            changes.iter().map(|change| change.entry.id()).collect();
        let unchanged = self
            .entries
            .values()
            .filter(|entry| !changed.contains(&entry.id()));
        let after: Vec<&QueueEntry> = unchanged
            .chain(changes.iter().map(|change| &change.entry))
            .collect();

        changes
            .iter()
            .map(|change| &change.entry)
            .filter(|entry| entry.status() == QueueStatus::InService)
            .find_map(|entry| {
                let practitioner = entry.assigned_practitioner_id()?;
                let serving = after
                    .iter()
                    .filter(|other| {
                        other.gira_id() == entry.gira_id()
                            && other.status() == QueueStatus::InService
                            && other.assigned_practitioner_id() == Some(practitioner)
                    })
                    .count();
                (serving > 1).then_some((entry.gira_id(), practitioner))
            })
    }
}

impl InMemoryGiraStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

fn gira_poisoned(err: impl ToString) -> GiraRepositoryError {
    GiraRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn queue_poisoned(err: impl ToString) -> QueueRepositoryError {
    QueueRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl GiraRepository for InMemoryGiraStore {
    async fn store(&self, gira: &Gira) -> GiraRepositoryResult<()> {
        let mut state = self.state.write().map_err(gira_poisoned)?;
        if state.giras.contains_key(&gira.id()) {
            return Err(GiraRepositoryError::DuplicateGira(gira.id()));
        }
        state.giras.insert(gira.id(), gira.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: GiraId) -> GiraRepositoryResult<Option<Gira>> {
        let state = self.state.read().map_err(gira_poisoned)?;
        Ok(state.giras.get(&id).cloned())
    }

    async fn list_open(&self) -> GiraRepositoryResult<Vec<OpenGiraCounts>> {
        let state = self.state.read().map_err(gira_poisoned)?;
        let mut open: Vec<OpenGiraCounts> = state
            .giras
            .values()
            .filter(|gira| gira.is_open())
            .map(|gira| OpenGiraCounts {
                gira: gira.clone(),
                queue_length: count(state.entries_of(gira.id()).count()),
                present_count: count(state.presence.get(&gira.id()).map_or(0, PresenceSet::len)),
            })
            .collect();
        open.sort_by(|left, right| {
            right
                .gira
                .opened_at()
                .cmp(&left.gira.opened_at())
                .then_with(|| left.gira.id().into_inner().cmp(&right.gira.id().into_inner()))
        });
        Ok(open)
    }

    async fn close(&self, gira: &Gira) -> GiraRepositoryResult<()> {
        let mut state = self.state.write().map_err(gira_poisoned)?;
        let gira_id = gira.id();
        let pending = count(
            state
                .entries_of(gira_id)
                .filter(|entry| entry.status().is_pending())
                .count(),
        );

        let stored = state
            .giras
            .get_mut(&gira_id)
            .ok_or(GiraRepositoryError::NotFound(gira_id))?;
        if !stored.is_open() {
            return Err(GiraRepositoryError::AlreadyClosed(gira_id));
        }
        if pending > 0 {
            return Err(GiraRepositoryError::PendingEntries { gira_id, pending });
        }
        *stored = gira.clone();
        Ok(())
    }

    async fn replace_presence(
        &self,
        gira_id: GiraId,
        presence: &PresenceSet,
    ) -> GiraRepositoryResult<()> {
        let mut state = self.state.write().map_err(gira_poisoned)?;
        if !state.giras.contains_key(&gira_id) {
            return Err(GiraRepositoryError::NotFound(gira_id));
        }
        state.presence.insert(gira_id, presence.clone());
        Ok(())
    }

    async fn presence(&self, gira_id: GiraId) -> GiraRepositoryResult<PresenceSet> {
        let state = self.state.read().map_err(gira_poisoned)?;
        if !state.giras.contains_key(&gira_id) {
            return Err(GiraRepositoryError::NotFound(gira_id));
        }
        Ok(state.presence.get(&gira_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl QueueRepository for InMemoryGiraStore {
    async fn append(
        &self,
        pending: &PendingQueueEntry,
        guard: EnqueueGuard,
    ) -> QueueRepositoryResult<QueueEntry> {
        let mut state = self.state.write().map_err(queue_poisoned)?;
        let gira_id = pending.gira_id();
        let gira = state
            .giras
            .get(&gira_id)
            .ok_or(QueueRepositoryError::GiraNotFound(gira_id))?;
        if guard.requires_open() && !gira.is_open() {
            return Err(QueueRepositoryError::GiraClosed(gira_id));
        }

        let highest = state.entries_of(gira_id).map(QueueEntry::sequence).max();
        let entry = pending.clone().into_entry(SequenceNumber::after(highest));
        state.entries.insert(entry.id(), entry.clone());
        Ok(entry)
    }

    async fn commit(&self, changes: &[EntryChange]) -> QueueRepositoryResult<()> {
        let mut state = self.state.write().map_err(queue_poisoned)?;

        for change in changes {
            let entry_id = change.entry.id();
            let stored = state
                .entries
                .get(&entry_id)
                .ok_or(QueueRepositoryError::EntryNotFound(entry_id))?;
            if stored.status() != change.expected {
                return Err(QueueRepositoryError::StaleEntry {
                    entry_id,
                    expected: change.expected,
                    actual: stored.status(),
                });
            }
        }

        if let Some((gira_id, practitioner_id)) = state.busy_practitioner(changes) {
            return Err(QueueRepositoryError::PractitionerBusy {
                gira_id,
                practitioner_id,
            });
        }

        for change in changes {
            state
                .entries
                .insert(change.entry.id(), change.entry.clone());
        }
        Ok(())
    }

    async fn find_by_id(&self, id: QueueEntryId) -> QueueRepositoryResult<Option<QueueEntry>> {
        let state = self.state.read().map_err(queue_poisoned)?;
        Ok(state.entries.get(&id).cloned())
    }

    async fn list_by_gira(&self, gira_id: GiraId) -> QueueRepositoryResult<Vec<QueueEntry>> {
        let state = self.state.read().map_err(queue_poisoned)?;
        if !state.giras.contains_key(&gira_id) {
            return Err(QueueRepositoryError::GiraNotFound(gira_id));
        }
        let mut entries: Vec<QueueEntry> = state.entries_of(gira_id).cloned().collect();
        entries.sort_by_key(QueueEntry::sequence);
        Ok(entries)
    }

    async fn find_in_service(
        &self,
        gira_id: GiraId,
        practitioner_id: PractitionerId,
    ) -> QueueRepositoryResult<Option<QueueEntry>> {
        let state = self.state.read().map_err(queue_poisoned)?;
        Ok(state
            .entries_of(gira_id)
            .find(|entry| {
                entry.status() == QueueStatus::InService
                    && entry.assigned_practitioner_id() == Some(practitioner_id)
            })
            .cloned())
    }
}
