//! Application services for the gira lifecycle, presence, and the queue.

mod error;
mod lifecycle;
mod poller;
mod presence;
mod queue;

pub use error::{GiraServiceError, GiraServiceResult};
pub use lifecycle::{GiraLifecycleService, OpenGiraSummary};
pub use poller::{DEFAULT_POLL_INTERVAL, QueuePoller, QueueSnapshot, QueueWatch};
pub use presence::PresenceRegistryService;
pub use queue::{EnqueueRequest, QueueEngine, QueuePolicy};
