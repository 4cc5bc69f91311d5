//! Error types for catalog domain validation.

use thiserror::Error;

/// Errors returned while constructing catalog domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogDomainError {
    /// The name has fewer than the minimum number of characters after
    /// trimming.
    #[error("name '{value}' must have at least {minimum} characters")]
    NameTooShort {
        /// The rejected input.
        value: String,
        /// Minimum accepted length.
        minimum: usize,
    },

    /// The name exceeds the storage limit.
    #[error("name must have at most {maximum} characters, got {actual}")]
    NameTooLong {
        /// Maximum accepted length.
        maximum: usize,
        /// Length of the rejected input.
        actual: usize,
    },
}
