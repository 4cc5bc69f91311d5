//! Given steps for gira queue BDD scenarios.

use super::when;
use super::world::{GiraQueueWorld, run_async};
use eyre::eyre;
use rstest_bdd_macros::given;
use terreiro::catalog::services::RegisterPractitionerRequest;

#[given("a front desk with an administrator")]
fn desk_with_admin(world: &mut GiraQueueWorld) -> Result<(), eyre::Report> {
    run_async(
        world
            .desk
            .bootstrap_admin("Mãe Cida", "cida@terreiro.org", "axe-forte-1"),
    )
    .map_err(|err| eyre!("bootstrap admin: {err}"))?;
    let outcome = run_async(world.desk.login("cida@terreiro.org", "axe-forte-1"))
        .map_err(|err| eyre!("admin login: {err}"))?;
    world.token = Some(outcome.token.into_string());
    Ok(())
}

#[given(r#"a gira type "{name}""#)]
fn gira_type(world: &mut GiraQueueWorld, name: String) -> Result<(), eyre::Report> {
    let created = run_async(world.desk.create_gira_type(world.token()?, &name))
        .map_err(|err| eyre!("create gira type {name}: {err}"))?;
    world.gira_types.insert(name, created.id());
    Ok(())
}

#[given(r#"a practitioner "{name}""#)]
fn practitioner(world: &mut GiraQueueWorld, name: String) -> Result<(), eyre::Report> {
    let registered = run_async(
        world
            .desk
            .register_practitioner(world.token()?, RegisterPractitionerRequest::new(&name)),
    )
    .map_err(|err| eyre!("register practitioner {name}: {err}"))?;
    world.practitioners.insert(name, registered.id());
    Ok(())
}

#[given(r#"an open "{type_name}" gira"#)]
fn open_gira(world: &mut GiraQueueWorld, type_name: String) -> Result<(), eyre::Report> {
    let gira_type_id = world
        .gira_types
        .get(&type_name)
        .copied()
        .ok_or_else(|| eyre!("no gira type named {type_name}"))?;
    let gira = run_async(world.desk.open_gira(world.token()?, gira_type_id))
        .map_err(|err| eyre!("open gira: {err}"))?;

    let present: Vec<_> = world.practitioners.values().copied().collect();
    run_async(world.desk.set_presence(world.token()?, gira.id(), present))
        .map_err(|err| eyre!("mark presence: {err}"))?;

    world.gira = Some(gira);
    Ok(())
}

#[given(r#""{consultant}" is enqueued"#)]
fn consultant_enqueued(world: &mut GiraQueueWorld, consultant: String) -> Result<(), eyre::Report> {
    when::enqueue_consultant(world, consultant)
}

#[given(r#""{practitioner}" is assigned to "{consultant}""#)]
fn practitioner_assigned(
    world: &mut GiraQueueWorld,
    practitioner: String,
    consultant: String,
) -> Result<(), eyre::Report> {
    when::assign_to(world, &practitioner, &consultant)
}

#[given("the gira is closed")]
fn gira_closed(world: &mut GiraQueueWorld) -> Result<(), eyre::Report> {
    when::close_current_gira(world)
}
