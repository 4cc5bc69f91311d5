//! When steps for gira queue BDD scenarios.
//!
//! Desk refusals are recorded in the world rather than failing the step, so
//! that `then` steps can assert on the error kind.

use super::world::{GiraQueueWorld, run_async};
use rstest_bdd_macros::when;
use terreiro::gira::services::EnqueueRequest;

pub(super) fn enqueue_consultant(
    world: &mut GiraQueueWorld,
    consultant: String,
) -> Result<(), eyre::Report> {
    let request = EnqueueRequest::new(world.gira()?.id(), &consultant);
    match run_async(world.desk.enqueue(world.token()?, request)) {
        Ok(entry) => {
            world.entries.insert(consultant, entry.id());
        }
        Err(err) => world.last_error = Some(err),
    }
    Ok(())
}

pub(super) fn assign_to(
    world: &mut GiraQueueWorld,
    practitioner: &str,
    consultant: &str,
) -> Result<(), eyre::Report> {
    let entry_id = world.entry_id(consultant)?;
    let practitioner_id = world.practitioner_id(practitioner)?;
    if let Err(err) = run_async(world.desk.assign_practitioner(
        world.token()?,
        entry_id,
        practitioner_id,
    )) {
        world.last_error = Some(err);
    }
    Ok(())
}

pub(super) fn close_current_gira(world: &mut GiraQueueWorld) -> Result<(), eyre::Report> {
    let gira_id = world.gira()?.id();
    match run_async(world.desk.close_gira(world.token()?, gira_id)) {
        Ok(closed) => world.gira = Some(closed),
        Err(err) => world.last_error = Some(err),
    }
    Ok(())
}

#[when(r#""{consultant}" is enqueued"#)]
fn enqueue(world: &mut GiraQueueWorld, consultant: String) -> Result<(), eyre::Report> {
    enqueue_consultant(world, consultant)
}

#[when(r#""{practitioner}" is assigned to "{consultant}""#)]
fn assign(
    world: &mut GiraQueueWorld,
    practitioner: String,
    consultant: String,
) -> Result<(), eyre::Report> {
    assign_to(world, &practitioner, &consultant)
}

#[when(r#"the status of "{consultant}" is set to "{status}""#)]
fn set_status(
    world: &mut GiraQueueWorld,
    consultant: String,
    status: String,
) -> Result<(), eyre::Report> {
    let entry_id = world.entry_id(&consultant)?;
    if let Err(err) = run_async(world.desk.update_status(world.token()?, entry_id, &status)) {
        world.last_error = Some(err);
    }
    Ok(())
}

#[when("the gira is closed")]
fn close_gira(world: &mut GiraQueueWorld) -> Result<(), eyre::Report> {
    close_current_gira(world)
}
