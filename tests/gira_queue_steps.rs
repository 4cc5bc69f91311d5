//! Behaviour tests for the walk-in consultation queue.

#[path = "gira_queue_steps/mod.rs"]
mod gira_queue_steps_defs;

use gira_queue_steps_defs::world::{GiraQueueWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/gira_queue.feature",
    name = "Serve a gira from opening to closing"
)]
#[tokio::test(flavor = "multi_thread")]
async fn serve_a_gira(world: GiraQueueWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/gira_queue.feature",
    name = "Reassigning a busy practitioner completes the previous consultation"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reassign_busy_practitioner(world: GiraQueueWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/gira_queue.feature",
    name = "A closed gira accepts no new consultants"
)]
#[tokio::test(flavor = "multi_thread")]
async fn closed_gira_refuses_consultants(world: GiraQueueWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/gira_queue.feature",
    name = "Finished consultations cannot be reopened"
)]
#[tokio::test(flavor = "multi_thread")]
async fn finished_consultation_stays_finished(world: GiraQueueWorld) {
    let _ = world;
}
