//! Domain model for giras, presence, and the consultation queue.
//!
//! A [`Gira`] is opened once and closed once. Its [`QueueEntry`] values move
//! through the [`QueueStatus`] state machine:
//!
//! ```text
//! waiting ──► in_service ──► done
//!    │             │
//!    └──► canceled ◄┘
//! ```
//!
//! `done` and `canceled` are terminal. Entering `in_service` always goes
//! through [`QueueEntry::assign`] so an entry in service has a practitioner.

mod consultant;
mod error;
mod gira;
mod ids;
mod policy;
mod presence;
mod queue_entry;
mod status;

pub use consultant::Consultant;
pub use error::{GiraDomainError, ParseGiraStatusError, ParsePolicyError, ParseQueueStatusError};
pub use gira::{Gira, OpenGiraCounts, PersistedGiraData};
pub use ids::{GiraId, QueueEntryId};
pub use policy::{AssignmentPolicy, EnqueueGuard};
pub use presence::PresenceSet;
pub use queue_entry::{PendingQueueEntry, PersistedQueueEntryData, QueueEntry, SequenceNumber};
pub use status::{GiraStatus, QueueStatus};
