//! Repository port for giras and their presence registry.

use crate::gira::domain::{Gira, GiraId, OpenGiraCounts, PresenceSet};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for gira repository operations.
pub type GiraRepositoryResult<T> = Result<T, GiraRepositoryError>;

/// Gira persistence contract.
#[async_trait]
pub trait GiraRepository: Send + Sync {
    /// Stores a newly opened gira.
    ///
    /// # Errors
    ///
    /// Returns [`GiraRepositoryError::DuplicateGira`] when the ID exists.
    async fn store(&self, gira: &Gira) -> GiraRepositoryResult<()>;

    /// Finds a gira by identifier.
    async fn find_by_id(&self, id: GiraId) -> GiraRepositoryResult<Option<Gira>>;

    /// Lists open giras, most recently opened first, with their queue
    /// length and presence count.
    async fn list_open(&self) -> GiraRepositoryResult<Vec<OpenGiraCounts>>;

    /// Persists a gira the domain has just closed.
    ///
    /// The pending-entry check and the status update happen atomically,
    /// under the same lock enqueueing takes, so no entry can slip in
    /// between.
    ///
    /// # Errors
    ///
    /// Returns [`GiraRepositoryError::NotFound`],
    /// [`GiraRepositoryError::AlreadyClosed`] when another caller closed it
    /// first, or [`GiraRepositoryError::PendingEntries`] while entries are
    /// waiting or in service.
    async fn close(&self, gira: &Gira) -> GiraRepositoryResult<()>;

    /// Replaces the whole presence set of a gira in one step.
    ///
    /// # Errors
    ///
    /// Returns [`GiraRepositoryError::NotFound`] for an unknown gira.
    async fn replace_presence(
        &self,
        gira_id: GiraId,
        presence: &PresenceSet,
    ) -> GiraRepositoryResult<()>;

    /// Returns the practitioners present at a gira.
    ///
    /// # Errors
    ///
    /// Returns [`GiraRepositoryError::NotFound`] for an unknown gira.
    async fn presence(&self, gira_id: GiraId) -> GiraRepositoryResult<PresenceSet>;
}

/// Errors returned by gira repository implementations.
#[derive(Debug, Clone, Error)]
pub enum GiraRepositoryError {
    /// A gira with the same identifier already exists.
    #[error("duplicate gira identifier: {0}")]
    DuplicateGira(GiraId),

    /// The gira does not exist.
    #[error("gira not found: {0}")]
    NotFound(GiraId),

    /// The stored gira is already closed.
    #[error("gira {0} is already closed")]
    AlreadyClosed(GiraId),

    /// Entries are still waiting or in service.
    #[error("cannot close gira {gira_id} while {pending} consultants are waiting or in service")]
    PendingEntries {
        /// The gira that stays open.
        gira_id: GiraId,
        /// Number of waiting or in-service entries.
        pending: u64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl GiraRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
