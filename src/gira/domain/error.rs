//! Error types for gira domain validation and state transitions.

use super::{GiraId, QueueEntryId, QueueStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating gira domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GiraDomainError {
    /// The consultant name has fewer than two characters after trimming.
    #[error("consultant name '{0}' must have at least 2 characters")]
    ConsultantNameTooShort(String),

    /// The consultant name exceeds the storage limit.
    #[error("consultant name must have at most {maximum} characters")]
    ConsultantNameTooLong {
        /// Maximum accepted length.
        maximum: usize,
    },

    /// The consultant phone exceeds the storage limit.
    #[error("consultant phone must have at most {maximum} characters")]
    ConsultantPhoneTooLong {
        /// Maximum accepted length.
        maximum: usize,
    },

    /// Sequence numbers start at one.
    #[error("sequence number must be positive, got {0}")]
    NonPositiveSequence(i64),

    /// The gira has already been closed.
    #[error("gira {0} is already closed")]
    GiraAlreadyClosed(GiraId),

    /// The requested status change is not in the transition table, or
    /// needs a practitioner and must go through assignment.
    #[error("queue entry {entry_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Entry being changed.
        entry_id: QueueEntryId,
        /// Current status.
        from: QueueStatus,
        /// Requested status.
        to: QueueStatus,
    },
}

/// Error returned while parsing a gira status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown gira status: {0}")]
pub struct ParseGiraStatusError(pub String);

/// Error returned while parsing a queue status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown queue status: {0}")]
pub struct ParseQueueStatusError(pub String);

/// Error returned while parsing an assignment policy or enqueue guard.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown policy value: {0}")]
pub struct ParsePolicyError(pub String);
