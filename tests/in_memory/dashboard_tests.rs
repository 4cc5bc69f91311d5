//! Queue snapshots pushed to dashboard viewers.

use crate::in_memory::helpers::terreiro;
use rstest::rstest;
use std::time::Duration;
use terreiro::gira::services::EnqueueRequest;
use tokio::time::timeout;

const POLL: Duration = Duration::from_millis(20);
const WAIT: Duration = Duration::from_secs(5);

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn viewers_see_new_consultants() -> eyre::Result<()> {
    let terreiro = terreiro().await?;
    let gira = terreiro.open_caboclo().await?;
    let mut watch = terreiro.desk.queue_poller(POLL).watch(gira.id());

    let first = timeout(WAIT, watch.changed())
        .await?
        .ok_or_else(|| eyre::eyre!("poller stopped early"))?;
    assert!(first.entries.is_empty());

    terreiro
        .desk
        .enqueue(&terreiro.operator, EnqueueRequest::new(gira.id(), "Maria"))
        .await?;

    let seen = timeout(WAIT, async {
        loop {
            match watch.changed().await {
                Some(snapshot) if !snapshot.entries.is_empty() => return Some(snapshot),
                Some(_) => {}
                None => return None,
            }
        }
    })
    .await?
    .ok_or_else(|| eyre::eyre!("poller stopped before the entry appeared"))?;

    let names: Vec<&str> = seen
        .entries
        .iter()
        .map(|entry| entry.consultant().name())
        .collect();
    assert_eq!(names, ["Maria"]);
    watch.stop();
    Ok(())
}
