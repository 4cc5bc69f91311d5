//! Then steps for gira queue BDD scenarios.

use super::world::GiraQueueWorld;
use eyre::eyre;
use rstest_bdd_macros::then;
use terreiro::gira::domain::{GiraStatus, QueueStatus};

#[then(r#""{consultant}" holds ticket {sequence:i64} with status "{status}""#)]
fn holds_ticket(
    world: &GiraQueueWorld,
    consultant: String,
    sequence: i64,
    status: String,
) -> Result<(), eyre::Report> {
    let expected =
        QueueStatus::try_from(status.as_str()).map_err(|err| eyre!("bad status: {err}"))?;
    let entry = world.current_entry(&consultant)?;

    if entry.sequence().value() != sequence {
        return Err(eyre!(
            "expected ticket {sequence} for {consultant}, found {}",
            entry.sequence()
        ));
    }
    if entry.status() != expected {
        return Err(eyre!(
            "expected {consultant} to be {}, found {}",
            expected.as_str(),
            entry.status().as_str()
        ));
    }
    Ok(())
}

#[then(r#""{consultant}" is "{status}" with "{practitioner}""#)]
fn served_by(
    world: &GiraQueueWorld,
    consultant: String,
    status: String,
    practitioner: String,
) -> Result<(), eyre::Report> {
    let expected =
        QueueStatus::try_from(status.as_str()).map_err(|err| eyre!("bad status: {err}"))?;
    let practitioner_id = world.practitioner_id(&practitioner)?;
    let entry = world.current_entry(&consultant)?;

    if entry.status() != expected {
        return Err(eyre!(
            "expected {consultant} to be {}, found {}",
            expected.as_str(),
            entry.status().as_str()
        ));
    }
    if entry.assigned_practitioner_id() != Some(practitioner_id) {
        return Err(eyre!("{consultant} is not assigned to {practitioner}"));
    }
    Ok(())
}

#[then(r#""{consultant}" has a start time"#)]
fn has_start_time(world: &GiraQueueWorld, consultant: String) -> Result<(), eyre::Report> {
    let entry = world.current_entry(&consultant)?;
    if entry.started_at().is_none() {
        return Err(eyre!("{consultant} has no start time"));
    }
    Ok(())
}

#[then(r#""{consultant}" has a finish time"#)]
fn has_finish_time(world: &GiraQueueWorld, consultant: String) -> Result<(), eyre::Report> {
    let entry = world.current_entry(&consultant)?;
    if entry.finished_at().is_none() {
        return Err(eyre!("{consultant} has no finish time"));
    }
    Ok(())
}

#[then(r#"the desk refuses with "{kind}""#)]
fn desk_refuses(world: &mut GiraQueueWorld, kind: String) -> Result<(), eyre::Report> {
    let error = world
        .last_error
        .take()
        .ok_or_else(|| eyre!("expected the desk to refuse, but it did not"))?;
    if error.kind().as_str() != kind {
        return Err(eyre!(
            "expected {kind}, got {} ({})",
            error.kind(),
            error.message()
        ));
    }
    Ok(())
}

#[then("the gira is closed with a closing time")]
fn gira_closed(world: &GiraQueueWorld) -> Result<(), eyre::Report> {
    if let Some(error) = &world.last_error {
        return Err(eyre!("unexpected desk error: {error}"));
    }
    let gira = world.gira()?;
    if gira.status() != GiraStatus::Closed || gira.closed_at().is_none() {
        return Err(eyre!("gira is still open"));
    }
    Ok(())
}
