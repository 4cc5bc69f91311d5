//! Shared fixtures for front-desk integration tests over in-memory stores.

use std::sync::Arc;

use chrono::TimeDelta;
use eyre::eyre;
use mockable::DefaultClock;
use terreiro::catalog::{
    adapters::memory::InMemoryCatalogRepository,
    domain::{GiraTypeId, PractitionerId},
    services::RegisterPractitionerRequest,
};
use terreiro::desk::FrontDesk;
use terreiro::gira::{
    adapters::memory::InMemoryGiraStore, domain::Gira, services::QueuePolicy,
};
use terreiro::identity::{
    adapters::memory::InMemoryUserAccountRepository,
    services::{CreateUserRequest, TokenCodec},
};

/// Desk wired over in-memory stores.
pub type TestDesk = FrontDesk<
    InMemoryUserAccountRepository,
    InMemoryCatalogRepository,
    InMemoryGiraStore,
    DefaultClock,
>;

/// A desk with an administrator, an operator, and a seeded catalog.
pub struct Terreiro {
    pub desk: Arc<TestDesk>,
    pub admin: String,
    pub operator: String,
    pub caboclo: GiraTypeId,
    pub practitioners: Vec<PractitionerId>,
}

impl Terreiro {
    /// Opens a Caboclo gira with every practitioner present.
    ///
    /// # Errors
    ///
    /// Returns an error when the desk refuses to open the gira.
    pub async fn open_caboclo(&self) -> eyre::Result<Gira> {
        let gira = self.desk.open_gira(&self.admin, self.caboclo).await?;
        self.desk
            .set_presence(&self.admin, gira.id(), self.practitioners.clone())
            .await?;
        Ok(gira)
    }

    /// Returns the practitioner registered at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error when fewer practitioners were registered.
    pub fn practitioner(&self, index: usize) -> eyre::Result<PractitionerId> {
        self.practitioners
            .get(index)
            .copied()
            .ok_or_else(|| eyre!("no practitioner at index {index}"))
    }
}

/// Builds a desk with the default policy.
///
/// # Errors
///
/// Returns an error if any setup call is refused.
pub async fn terreiro() -> eyre::Result<Terreiro> {
    terreiro_with_policy(QueuePolicy::default()).await
}

/// Builds a desk with the given queue policy.
///
/// # Errors
///
/// Returns an error if any setup call is refused.
pub async fn terreiro_with_policy(policy: QueuePolicy) -> eyre::Result<Terreiro> {
    let tokens = TokenCodec::new(b"integration-secret", TimeDelta::hours(12))?;
    let desk = FrontDesk::new(
        Arc::new(InMemoryUserAccountRepository::new()),
        Arc::new(InMemoryCatalogRepository::new()),
        Arc::new(InMemoryGiraStore::new()),
        Arc::new(DefaultClock),
        tokens,
    )
    .with_queue_policy(policy);

    desk.bootstrap_admin("Mãe Cida", "cida@terreiro.org", "axe-forte-1")
        .await?;
    let admin = desk
        .login("cida@terreiro.org", "axe-forte-1")
        .await?
        .token
        .into_string();
    desk.create_user(
        &admin,
        CreateUserRequest::new("Operador", "desk@terreiro.org", "fila-123"),
    )
    .await?;
    let operator = desk
        .login("desk@terreiro.org", "fila-123")
        .await?
        .token
        .into_string();

    desk.seed_defaults(&admin).await?;
    let caboclo = desk
        .list_gira_types()
        .await?
        .into_iter()
        .find(|gira_type| gira_type.name().as_str() == "Caboclo")
        .ok_or_else(|| eyre!("seeded catalog lacks Caboclo"))?
        .id();

    let mut practitioners = Vec::new();
    for name in ["Pai Joaquim", "Vó Maria Conga"] {
        let practitioner = desk
            .register_practitioner(&admin, RegisterPractitionerRequest::new(name))
            .await?;
        practitioners.push(practitioner.id());
    }

    Ok(Terreiro {
        desk: Arc::new(desk),
        admin,
        operator,
        caboclo,
        practitioners,
    })
}
