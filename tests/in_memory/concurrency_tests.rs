//! Several front desks working one gira at the same time.

use crate::in_memory::helpers::terreiro;
use rstest::rstest;
use std::sync::Arc;
use terreiro::desk::DeskErrorKind;
use terreiro::gira::{domain::QueueStatus, services::EnqueueRequest};

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_enqueues_number_without_gaps() -> eyre::Result<()> {
    let terreiro = terreiro().await?;
    let gira = terreiro.open_caboclo().await?;
    let operator: Arc<str> = Arc::from(terreiro.operator.as_str());

    let handles: Vec<_> = (0..32)
        .map(|index| {
            let desk = Arc::clone(&terreiro.desk);
            let token = Arc::clone(&operator);
            let request = EnqueueRequest::new(gira.id(), format!("Consulente {index}"));
            tokio::spawn(async move { desk.enqueue(&token, request).await })
        })
        .collect();

    let mut sequences = Vec::new();
    for handle in handles {
        sequences.push(handle.await??.sequence().value());
    }
    sequences.sort_unstable();
    assert_eq!(sequences, (1..=32).collect::<Vec<i64>>());

    let listed: Vec<i64> = terreiro
        .desk
        .list_queue(gira.id())
        .await?
        .iter()
        .map(|entry| entry.sequence().value())
        .collect();
    assert_eq!(listed, sequences);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_assignments_leave_one_consultation_in_service() -> eyre::Result<()> {
    let terreiro = terreiro().await?;
    let gira = terreiro.open_caboclo().await?;
    let practitioner = terreiro.practitioner(0)?;

    let mut entry_ids = Vec::new();
    for name in ["Maria", "João", "Ana", "Pedro"] {
        let entry = terreiro
            .desk
            .enqueue(&terreiro.operator, EnqueueRequest::new(gira.id(), name))
            .await?;
        entry_ids.push(entry.id());
    }

    let operator: Arc<str> = Arc::from(terreiro.operator.as_str());
    let handles: Vec<_> = entry_ids
        .iter()
        .map(|&entry_id| {
            let desk = Arc::clone(&terreiro.desk);
            let token = Arc::clone(&operator);
            tokio::spawn(async move {
                desk.assign_practitioner(&token, entry_id, practitioner)
                    .await
            })
        })
        .collect();

    for handle in handles {
        if let Err(err) = handle.await? {
            assert_eq!(err.kind(), DeskErrorKind::Conflict, "unexpected: {err}");
        }
    }

    let queue = terreiro.desk.list_queue(gira.id()).await?;
    let serving = queue
        .iter()
        .filter(|entry| {
            entry.status() == QueueStatus::InService
                && entry.assigned_practitioner_id() == Some(practitioner)
        })
        .count();
    assert_eq!(serving, 1);
    Ok(())
}
