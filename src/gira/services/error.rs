//! Errors shared by the gira services.

use crate::catalog::domain::{GiraTypeId, PractitionerId};
use crate::catalog::ports::CatalogRepositoryError;
use crate::gira::{
    domain::{GiraDomainError, GiraId, QueueEntryId},
    ports::{GiraRepositoryError, QueueRepositoryError},
};
use thiserror::Error;

/// Service-level errors for gira, presence, and queue operations.
#[derive(Debug, Error)]
pub enum GiraServiceError {
    /// Domain validation or a state transition failed.
    #[error(transparent)]
    Domain(#[from] GiraDomainError),

    /// The gira does not exist.
    #[error("gira not found: {0}")]
    GiraNotFound(GiraId),

    /// The gira type does not exist.
    #[error("gira type not found: {0}")]
    GiraTypeNotFound(GiraTypeId),

    /// The queue entry does not exist.
    #[error("queue entry not found: {0}")]
    EntryNotFound(QueueEntryId),

    /// One or more practitioners do not exist.
    #[error("unknown practitioners: {0:?}")]
    PractitionersNotFound(Vec<PractitionerId>),

    /// Gira repository operation failed.
    #[error(transparent)]
    Gira(#[from] GiraRepositoryError),

    /// Queue repository operation failed.
    #[error(transparent)]
    Queue(#[from] QueueRepositoryError),

    /// Catalog lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogRepositoryError),
}

/// Result type for gira service operations.
pub type GiraServiceResult<T> = Result<T, GiraServiceError>;
