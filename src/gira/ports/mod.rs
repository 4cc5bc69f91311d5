//! Port contracts for gira and queue persistence.

mod gira;
mod queue;

pub use gira::{GiraRepository, GiraRepositoryError, GiraRepositoryResult};
pub use queue::{EntryChange, QueueRepository, QueueRepositoryError, QueueRepositoryResult};
