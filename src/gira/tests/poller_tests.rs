//! Tests for the periodic queue watcher.

use std::sync::Arc;
use std::time::Duration;

use crate::catalog::domain::GiraTypeId;
use crate::gira::{
    adapters::memory::InMemoryGiraStore,
    domain::{Consultant, EnqueueGuard, Gira, PendingQueueEntry},
    ports::{GiraRepository, QueueRepository},
    services::{DEFAULT_POLL_INTERVAL, QueuePoller},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

const FAST: Duration = Duration::from_millis(20);
const PATIENCE: Duration = Duration::from_secs(5);

#[fixture]
fn store() -> Arc<InMemoryGiraStore> {
    Arc::new(InMemoryGiraStore::new())
}

fn poller(store: &Arc<InMemoryGiraStore>) -> QueuePoller<InMemoryGiraStore, DefaultClock> {
    QueuePoller::new(Arc::clone(store), Arc::new(DefaultClock)).with_interval(FAST)
}

async fn open_gira(store: &InMemoryGiraStore) -> Gira {
    let gira = Gira::open(GiraTypeId::new(), &DefaultClock);
    store.store(&gira).await.expect("gira stored");
    gira
}

async fn enqueue(store: &InMemoryGiraStore, gira: &Gira, name: &str) {
    let consultant = Consultant::new(name, None).expect("valid consultant");
    let pending = PendingQueueEntry::new(gira.id(), consultant, &DefaultClock);
    store
        .append(&pending, EnqueueGuard::RequireOpen)
        .await
        .expect("entry appended");
}

#[rstest]
fn zero_interval_keeps_default(store: Arc<InMemoryGiraStore>) {
    let poller = QueuePoller::new(store, Arc::new(DefaultClock)).with_interval(Duration::ZERO);
    assert_eq!(poller.interval(), DEFAULT_POLL_INTERVAL);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn watch_publishes_fresh_snapshots(store: Arc<InMemoryGiraStore>) {
    let gira = open_gira(&store).await;
    enqueue(&store, &gira, "Maria").await;
    let mut watch = poller(&store).watch(gira.id());

    let first = tokio::time::timeout(PATIENCE, watch.changed())
        .await
        .expect("snapshot arrives")
        .expect("poller running");
    assert_eq!(first.gira_id, gira.id());
    assert_eq!(first.entries.len(), 1);

    enqueue(&store, &gira, "João").await;
    let refreshed = tokio::time::timeout(PATIENCE, async {
        loop {
            let snapshot = watch.changed().await.expect("poller running");
            if snapshot.entries.len() == 2 {
                return snapshot;
            }
        }
    })
    .await
    .expect("new entry becomes visible");

    let sequences: Vec<i64> = refreshed
        .entries
        .iter()
        .map(|entry| entry.sequence().value())
        .collect();
    assert_eq!(sequences, vec![1, 2]);
    assert_eq!(watch.latest().map(|snapshot| snapshot.entries.len()), Some(2));
    watch.stop();
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn poller_stops_when_viewers_leave(store: Arc<InMemoryGiraStore>) {
    let gira = open_gira(&store).await;
    let watch = poller(&store).watch(gira.id());
    let extra = watch.subscribe();

    let (receiver, handle) = watch.detach();
    drop(receiver);
    drop(extra);

    tokio::time::timeout(PATIENCE, handle)
        .await
        .expect("poller exits once unobserved")
        .expect("poller task completes cleanly");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_polls_publish_nothing(store: Arc<InMemoryGiraStore>) {
    let unknown = Gira::open(GiraTypeId::new(), &DefaultClock);
    let watch = poller(&store).watch(unknown.id());

    tokio::time::sleep(FAST * 5).await;

    assert!(watch.latest().is_none());
    watch.stop();
}
