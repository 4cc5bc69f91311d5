//! Error taxonomy shown to desk clients.

use crate::catalog::{ports::CatalogRepositoryError, services::CatalogServiceError};
use crate::gira::{
    domain::{GiraDomainError, ParseQueueStatusError},
    ports::{GiraRepositoryError, QueueRepositoryError},
    services::GiraServiceError,
};
use crate::identity::{
    domain::{AuthorizationError, IdentityDomainError},
    ports::UserAccountRepositoryError,
    services::AuthServiceError,
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::error;

const INTERNAL_MESSAGE: &str = "internal error";
const PENDING_ENTRIES_MESSAGE: &str =
    "cannot close while consultants are waiting or in service";

/// Category of a failed desk operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeskErrorKind {
    /// No valid session token was presented.
    Unauthenticated,
    /// The caller's role does not allow the operation.
    Unauthorized,
    /// Input failed validation.
    ValidationFailed,
    /// The current state does not allow the operation.
    PreconditionFailed,
    /// A referenced record does not exist.
    NotFound,
    /// A uniqueness rule or a concurrent change got in the way.
    Conflict,
    /// The store failed. Details are logged, not returned.
    Internal,
}

impl DeskErrorKind {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Unauthorized => "unauthorized",
            Self::ValidationFailed => "validation_failed",
            Self::PreconditionFailed => "precondition_failed",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for DeskErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed desk operation: a kind plus a message safe to show.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind}: {message}")]
pub struct DeskError {
    kind: DeskErrorKind,
    message: String,
}

/// Result type for desk operations.
pub type DeskResult<T> = Result<T, DeskError>;

impl DeskError {
    /// Creates an error of the given kind.
    #[must_use]
    pub fn new(kind: DeskErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Logs `cause` and returns a generic internal error.
    #[must_use]
    pub fn internal(cause: &dyn std::error::Error) -> Self {
        error!(error = %cause, "desk operation failed in the store");
        Self::new(DeskErrorKind::Internal, INTERNAL_MESSAGE)
    }

    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> DeskErrorKind {
        self.kind
    }

    /// Returns the client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    fn from_display(kind: DeskErrorKind, err: &impl fmt::Display) -> Self {
        Self::new(kind, err.to_string())
    }
}

impl From<AuthorizationError> for DeskError {
    fn from(err: AuthorizationError) -> Self {
        Self::from_display(DeskErrorKind::Unauthorized, &err)
    }
}

impl From<ParseQueueStatusError> for DeskError {
    fn from(err: ParseQueueStatusError) -> Self {
        Self::from_display(DeskErrorKind::ValidationFailed, &err)
    }
}

impl From<AuthServiceError> for DeskError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::InvalidCredentials | AuthServiceError::Unauthenticated => {
                Self::from_display(DeskErrorKind::Unauthenticated, &err)
            }
            AuthServiceError::AlreadyBootstrapped => {
                Self::from_display(DeskErrorKind::PreconditionFailed, &err)
            }
            AuthServiceError::Domain(IdentityDomainError::PasswordHashing(_))
            | AuthServiceError::Token(_)
            | AuthServiceError::Blocking(_) => Self::internal(&err),
            AuthServiceError::Domain(ref domain) => {
                Self::from_display(DeskErrorKind::ValidationFailed, domain)
            }
            AuthServiceError::Repository(repository) => repository.into(),
        }
    }
}

impl From<UserAccountRepositoryError> for DeskError {
    fn from(err: UserAccountRepositoryError) -> Self {
        match err {
            UserAccountRepositoryError::DuplicateAccount(_)
            | UserAccountRepositoryError::DuplicateEmail(_) => {
                Self::from_display(DeskErrorKind::Conflict, &err)
            }
            UserAccountRepositoryError::Persistence(_) => Self::internal(&err),
        }
    }
}

impl From<CatalogServiceError> for DeskError {
    fn from(err: CatalogServiceError) -> Self {
        match err {
            CatalogServiceError::Domain(ref domain) => {
                Self::from_display(DeskErrorKind::ValidationFailed, domain)
            }
            CatalogServiceError::RoleNotFound(_) | CatalogServiceError::PractitionerNotFound(_) => {
                Self::from_display(DeskErrorKind::NotFound, &err)
            }
            CatalogServiceError::Repository(repository) => repository.into(),
        }
    }
}

impl From<CatalogRepositoryError> for DeskError {
    fn from(err: CatalogRepositoryError) -> Self {
        match err {
            CatalogRepositoryError::DuplicateName(_) => {
                Self::from_display(DeskErrorKind::Conflict, &err)
            }
            CatalogRepositoryError::PractitionerNotFound(_) => {
                Self::from_display(DeskErrorKind::NotFound, &err)
            }
            CatalogRepositoryError::Persistence(_) => Self::internal(&err),
        }
    }
}

impl From<GiraServiceError> for DeskError {
    fn from(err: GiraServiceError) -> Self {
        match err {
            GiraServiceError::Domain(domain) => domain.into(),
            GiraServiceError::GiraNotFound(_)
            | GiraServiceError::GiraTypeNotFound(_)
            | GiraServiceError::EntryNotFound(_)
            | GiraServiceError::PractitionersNotFound(_) => {
                Self::from_display(DeskErrorKind::NotFound, &err)
            }
            GiraServiceError::Gira(repository) => repository.into(),
            GiraServiceError::Queue(repository) => repository.into(),
            GiraServiceError::Catalog(repository) => repository.into(),
        }
    }
}

impl From<GiraDomainError> for DeskError {
    fn from(err: GiraDomainError) -> Self {
        let kind = match err {
            GiraDomainError::ConsultantNameTooShort(_)
            | GiraDomainError::ConsultantNameTooLong { .. }
            | GiraDomainError::ConsultantPhoneTooLong { .. }
            | GiraDomainError::NonPositiveSequence(_) => DeskErrorKind::ValidationFailed,
            GiraDomainError::GiraAlreadyClosed(_) | GiraDomainError::InvalidTransition { .. } => {
                DeskErrorKind::PreconditionFailed
            }
        };
        Self::from_display(kind, &err)
    }
}

impl From<GiraRepositoryError> for DeskError {
    fn from(err: GiraRepositoryError) -> Self {
        match err {
            GiraRepositoryError::NotFound(_) => Self::from_display(DeskErrorKind::NotFound, &err),
            GiraRepositoryError::DuplicateGira(_) => {
                Self::from_display(DeskErrorKind::Conflict, &err)
            }
            GiraRepositoryError::AlreadyClosed(_) => {
                Self::from_display(DeskErrorKind::PreconditionFailed, &err)
            }
            GiraRepositoryError::PendingEntries { .. } => {
                Self::new(DeskErrorKind::PreconditionFailed, PENDING_ENTRIES_MESSAGE)
            }
            GiraRepositoryError::Persistence(_) => Self::internal(&err),
        }
    }
}

impl From<QueueRepositoryError> for DeskError {
    fn from(err: QueueRepositoryError) -> Self {
        match err {
            QueueRepositoryError::GiraNotFound(_) | QueueRepositoryError::EntryNotFound(_) => {
                Self::from_display(DeskErrorKind::NotFound, &err)
            }
            QueueRepositoryError::GiraClosed(_) => {
                Self::from_display(DeskErrorKind::PreconditionFailed, &err)
            }
            QueueRepositoryError::SequenceConflict(_)
            | QueueRepositoryError::StaleEntry { .. }
            | QueueRepositoryError::PractitionerBusy { .. } => {
                Self::from_display(DeskErrorKind::Conflict, &err)
            }
            QueueRepositoryError::Persistence(_) => Self::internal(&err),
        }
    }
}
