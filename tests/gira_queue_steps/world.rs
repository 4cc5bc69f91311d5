//! Shared world state for gira queue BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::TimeDelta;
use eyre::eyre;
use mockable::DefaultClock;
use rstest::fixture;
use terreiro::catalog::{
    adapters::memory::InMemoryCatalogRepository,
    domain::{GiraTypeId, PractitionerId},
};
use terreiro::desk::{DeskError, FrontDesk};
use terreiro::gira::{
    adapters::memory::InMemoryGiraStore,
    domain::{Gira, QueueEntry, QueueEntryId},
};
use terreiro::identity::{adapters::memory::InMemoryUserAccountRepository, services::TokenCodec};

/// Desk type used by the BDD world.
pub type TestDesk = FrontDesk<
    InMemoryUserAccountRepository,
    InMemoryCatalogRepository,
    InMemoryGiraStore,
    DefaultClock,
>;

/// Scenario world for gira queue behaviour tests.
pub struct GiraQueueWorld {
    pub desk: TestDesk,
    pub token: Option<String>,
    pub gira_types: HashMap<String, GiraTypeId>,
    pub practitioners: HashMap<String, PractitionerId>,
    pub gira: Option<Gira>,
    pub entries: HashMap<String, QueueEntryId>,
    pub last_error: Option<DeskError>,
}

impl GiraQueueWorld {
    /// Creates a world over empty in-memory stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the token codec rejects the test secret.
    pub fn new() -> eyre::Result<Self> {
        let tokens = TokenCodec::new(b"scenario-secret", TimeDelta::hours(12))
            .map_err(|err| eyre!("token codec: {err}"))?;
        let desk = FrontDesk::new(
            Arc::new(InMemoryUserAccountRepository::new()),
            Arc::new(InMemoryCatalogRepository::new()),
            Arc::new(InMemoryGiraStore::new()),
            Arc::new(DefaultClock),
            tokens,
        );

        Ok(Self {
            desk,
            token: None,
            gira_types: HashMap::new(),
            practitioners: HashMap::new(),
            gira: None,
            entries: HashMap::new(),
            last_error: None,
        })
    }

    /// Returns the administrator token.
    ///
    /// # Errors
    ///
    /// Returns an error before the administrator has signed in.
    pub fn token(&self) -> eyre::Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| eyre!("no administrator signed in"))
    }

    /// Returns the open gira under test.
    ///
    /// # Errors
    ///
    /// Returns an error before a gira has been opened.
    pub fn gira(&self) -> eyre::Result<&Gira> {
        self.gira
            .as_ref()
            .ok_or_else(|| eyre!("missing gira in scenario world"))
    }

    /// Returns the entry registered for `consultant`.
    ///
    /// # Errors
    ///
    /// Returns an error for a consultant the scenario never enqueued.
    pub fn entry_id(&self, consultant: &str) -> eyre::Result<QueueEntryId> {
        self.entries
            .get(consultant)
            .copied()
            .ok_or_else(|| eyre!("no entry for consultant {consultant}"))
    }

    /// Returns the practitioner registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown practitioner name.
    pub fn practitioner_id(&self, name: &str) -> eyre::Result<PractitionerId> {
        self.practitioners
            .get(name)
            .copied()
            .ok_or_else(|| eyre!("no practitioner named {name}"))
    }

    /// Reads the current state of `consultant`'s entry from the queue.
    ///
    /// # Errors
    ///
    /// Returns an error when the queue cannot be listed or lacks the entry.
    pub fn current_entry(&self, consultant: &str) -> eyre::Result<QueueEntry> {
        let entry_id = self.entry_id(consultant)?;
        let gira_id = self.gira()?.id();
        let queue = run_async(self.desk.list_queue(gira_id))
            .map_err(|err| eyre!("list queue: {err}"))?;
        queue
            .into_iter()
            .find(|entry| entry.id() == entry_id)
            .ok_or_else(|| eyre!("entry for {consultant} missing from queue"))
    }
}

/// Fixture that creates a new scenario world.
///
/// # Panics
///
/// Panics if the world cannot be built.
#[fixture]
pub fn world() -> GiraQueueWorld {
    match GiraQueueWorld::new() {
        Ok(world) => world,
        Err(err) => panic!("scenario world setup failed: {err}"),
    }
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
