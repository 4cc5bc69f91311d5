//! Full consultation flows through the front desk.

use crate::in_memory::helpers::{terreiro, terreiro_with_policy};
use rstest::rstest;
use serde_json::json;
use terreiro::desk::{DeskErrorKind, DeskResponse};
use terreiro::gira::{
    domain::{AssignmentPolicy, GiraStatus, QueueStatus},
    services::{EnqueueRequest, QueuePolicy},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn caboclo_gira_runs_from_opening_to_closing() -> eyre::Result<()> {
    let terreiro = terreiro().await?;
    let desk = &terreiro.desk;
    let operator = terreiro.operator.as_str();
    let pai_joaquim = terreiro.practitioner(0)?;
    let gira = terreiro.open_caboclo().await?;

    let maria = desk
        .enqueue(operator, EnqueueRequest::new(gira.id(), "Maria"))
        .await?;
    assert_eq!(maria.sequence().value(), 1);
    assert_eq!(maria.status(), QueueStatus::Waiting);

    let joao = desk
        .enqueue(
            operator,
            EnqueueRequest::new(gira.id(), "João").with_phone("+55 21 99999-0000"),
        )
        .await?;
    assert_eq!(joao.sequence().value(), 2);
    assert_eq!(joao.consultant().phone(), Some("+55 21 99999-0000"));

    let serving = desk
        .assign_practitioner(operator, maria.id(), pai_joaquim)
        .await?;
    assert_eq!(serving.status(), QueueStatus::InService);
    assert_eq!(serving.assigned_practitioner_id(), Some(pai_joaquim));
    assert!(serving.started_at().is_some());

    let finished = desk.update_status(operator, maria.id(), "done").await?;
    assert!(finished.finished_at().is_some());

    let refused = desk.close_gira(&terreiro.admin, gira.id()).await;
    assert_eq!(
        refused.err().map(|err| err.kind()),
        Some(DeskErrorKind::PreconditionFailed)
    );

    desk.update_status(operator, joao.id(), "canceled").await?;
    let closed = desk.close_gira(&terreiro.admin, gira.id()).await?;
    assert_eq!(closed.status(), GiraStatus::Closed);
    assert!(closed.closed_at().is_some());

    assert!(desk.list_open_giras().await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dashboard_counts_follow_the_queue() -> eyre::Result<()> {
    let terreiro = terreiro().await?;
    let desk = &terreiro.desk;
    let gira = terreiro.open_caboclo().await?;

    for name in ["Maria", "João", "Ana"] {
        desk.enqueue(&terreiro.operator, EnqueueRequest::new(gira.id(), name))
            .await?;
    }

    let open = desk.list_open_giras().await?;
    let summary = open
        .iter()
        .find(|summary| summary.gira.id() == gira.id())
        .ok_or_else(|| eyre::eyre!("opened gira not listed"))?;
    assert_eq!(summary.queue_length, 3);
    assert_eq!(summary.present_count, 2);
    assert_eq!(
        summary.gira_type_name.as_ref().map(|name| name.as_str()),
        Some("Caboclo")
    );

    let present = desk.list_present(&terreiro.operator, gira.id()).await?;
    let names: Vec<&str> = present.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Pai Joaquim", "Vó Maria Conga"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lenient_desk_reopens_finished_consultations() -> eyre::Result<()> {
    let policy = QueuePolicy::default().with_assignment(AssignmentPolicy::Lenient);
    let terreiro = terreiro_with_policy(policy).await?;
    let desk = &terreiro.desk;
    let gira = terreiro.open_caboclo().await?;
    let first = terreiro.practitioner(0)?;
    let second = terreiro.practitioner(1)?;

    let maria = desk
        .enqueue(&terreiro.operator, EnqueueRequest::new(gira.id(), "Maria"))
        .await?;
    desk.assign_practitioner(&terreiro.operator, maria.id(), first)
        .await?;
    desk.update_status(&terreiro.operator, maria.id(), "done")
        .await?;

    let reopened = desk
        .assign_practitioner(&terreiro.operator, maria.id(), second)
        .await?;
    assert_eq!(reopened.status(), QueueStatus::InService);
    assert_eq!(reopened.assigned_practitioner_id(), Some(second));
    assert!(reopened.finished_at().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn responses_serialise_to_the_client_envelope() -> eyre::Result<()> {
    let terreiro = terreiro().await?;
    let desk = &terreiro.desk;
    let gira = terreiro.open_caboclo().await?;

    let accepted = DeskResponse::from(
        desk.enqueue(&terreiro.operator, EnqueueRequest::new(gira.id(), "Maria"))
            .await,
    );
    let body = serde_json::to_value(&accepted)?;
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["data"]["sequence"], json!(1));
    assert_eq!(body["data"]["status"], json!("waiting"));

    let rejected = DeskResponse::from(
        desk.enqueue("not-a-token", EnqueueRequest::new(gira.id(), "João"))
            .await,
    );
    let error = serde_json::to_value(&rejected)?;
    assert_eq!(error["ok"], json!(false));
    assert_eq!(error["error"]["kind"], json!("unauthenticated"));
    Ok(())
}
