//! Periodic queue re-fetch for dashboards.
//!
//! A [`QueuePoller`] spawns one task per watched gira. The task publishes
//! a [`QueueSnapshot`] on a `tokio::sync::watch` channel after every
//! successful read and exits once every receiver is gone.

use crate::gira::{
    domain::{GiraId, QueueEntry},
    ports::QueueRepository,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Interval between two queue reads.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// One read of a gira's queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueSnapshot {
    /// Gira the entries belong to.
    pub gira_id: GiraId,
    /// Entries by ascending sequence.
    pub entries: Vec<QueueEntry>,
    /// When the read completed.
    pub fetched_at: DateTime<Utc>,
}

/// Spawns queue watchers.
#[derive(Clone)]
pub struct QueuePoller<Q, C>
where
    Q: QueueRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    queue: Arc<Q>,
    clock: Arc<C>,
    interval: Duration,
}

impl<Q, C> QueuePoller<Q, C>
where
    Q: QueueRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a poller reading every [`DEFAULT_POLL_INTERVAL`].
    #[must_use]
    pub const fn new(queue: Arc<Q>, clock: Arc<C>) -> Self {
        Self {
            queue,
            clock,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Changes the poll interval. A zero interval keeps the default.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.interval = interval;
        }
        self
    }

    /// Returns the poll interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts polling a gira's queue.
    ///
    /// The first read happens immediately. Must be called from within a
    /// Tokio runtime.
    #[must_use]
    pub fn watch(&self, gira_id: GiraId) -> QueueWatch {
        let (sender, receiver) = watch::channel(None);
        let handle = tokio::spawn(poll_queue(
            Arc::clone(&self.queue),
            Arc::clone(&self.clock),
            gira_id,
            self.interval,
            sender,
        ));
        QueueWatch { receiver, handle }
    }
}

async fn poll_queue<Q, C>(
    queue: Arc<Q>,
    clock: Arc<C>,
    gira_id: GiraId,
    interval: Duration,
    sender: watch::Sender<Option<QueueSnapshot>>,
) where
    Q: QueueRepository,
    C: Clock + Send + Sync,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            () = sender.closed() => {
                debug!(gira_id = %gira_id, "queue viewers gone, stopping poller");
                break;
            }
            _ = ticker.tick() => {
                match queue.list_by_gira(gira_id).await {
                    Ok(entries) => {
                        sender.send_replace(Some(QueueSnapshot {
                            gira_id,
                            entries,
                            fetched_at: clock.utc(),
                        }));
                    }
                    Err(err) => warn!(gira_id = %gira_id, error = %err, "queue poll failed"),
                }
            }
        }
    }
}

/// Handle to a running queue watcher.
///
/// Dropping the handle and every subscriber stops the task at its next
/// wake-up.
#[derive(Debug)]
pub struct QueueWatch {
    receiver: watch::Receiver<Option<QueueSnapshot>>,
    handle: JoinHandle<()>,
}

impl QueueWatch {
    /// Returns another receiver for the same snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<QueueSnapshot>> {
        self.receiver.clone()
    }

    /// Returns the most recent snapshot, if any read succeeded yet.
    #[must_use]
    pub fn latest(&self) -> Option<QueueSnapshot> {
        self.receiver.borrow().clone()
    }

    /// Waits for the next snapshot.
    ///
    /// Returns `None` once the poller has stopped.
    pub async fn changed(&mut self) -> Option<QueueSnapshot> {
        self.receiver.changed().await.ok()?;
        self.receiver.borrow_and_update().clone()
    }

    /// Stops the poller immediately.
    pub fn stop(self) {
        self.handle.abort();
    }

    /// Splits the watch into its receiver and task handle.
    #[must_use]
    pub fn detach(self) -> (watch::Receiver<Option<QueueSnapshot>>, JoinHandle<()>) {
        (self.receiver, self.handle)
    }
}
