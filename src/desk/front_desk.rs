//! Role-gated operation surface over the Terreiro services.

use super::{DeskError, DeskResult};
use crate::catalog::{
    domain::{
        GiraType, GiraTypeId, Practitioner, PractitionerId, PractitionerRole, PractitionerSummary,
    },
    ports::CatalogRepository,
    services::{CatalogService, RegisterPractitionerRequest, SeedReport},
};
use crate::gira::{
    domain::{Gira, GiraId, PresenceSet, QueueEntry, QueueEntryId, QueueStatus},
    ports::{GiraRepository, QueueRepository},
    services::{
        EnqueueRequest, GiraLifecycleService, OpenGiraSummary, PresenceRegistryService,
        QueueEngine, QueuePoller, QueuePolicy,
    },
};
use crate::identity::{
    domain::{Identity, UserAccount},
    ports::UserAccountRepository,
    services::{AuthService, CreateUserRequest, LoginOutcome, TokenCodec},
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// The front desk: every operation a client can call, with its access rule.
///
/// Operations that change giras or the catalog need an administrator
/// token. Queue work needs any valid token. Listings are public.
#[derive(Clone)]
pub struct FrontDesk<A, K, S, C>
where
    A: UserAccountRepository,
    K: CatalogRepository,
    S: GiraRepository + QueueRepository,
    C: Clock + Send + Sync,
{
    auth: AuthService<A, C>,
    catalog: CatalogService<K, C>,
    lifecycle: GiraLifecycleService<S, K, C>,
    presence: PresenceRegistryService<S, K>,
    queue: QueueEngine<S, K, C>,
    store: Arc<S>,
    clock: Arc<C>,
}

impl<A, K, S, C> FrontDesk<A, K, S, C>
where
    A: UserAccountRepository,
    K: CatalogRepository,
    S: GiraRepository + QueueRepository,
    C: Clock + Send + Sync,
{
    /// Wires the desk over its stores with the default queue policy.
    #[must_use]
    pub fn new(
        accounts: Arc<A>,
        catalog: Arc<K>,
        store: Arc<S>,
        clock: Arc<C>,
        tokens: TokenCodec,
    ) -> Self {
        Self {
            auth: AuthService::new(accounts, Arc::clone(&clock), tokens),
            catalog: CatalogService::new(Arc::clone(&catalog), Arc::clone(&clock)),
            lifecycle: GiraLifecycleService::new(
                Arc::clone(&store),
                Arc::clone(&catalog),
                Arc::clone(&clock),
            ),
            presence: PresenceRegistryService::new(Arc::clone(&store), Arc::clone(&catalog)),
            queue: QueueEngine::new(Arc::clone(&store), catalog, Arc::clone(&clock)),
            store,
            clock,
        }
    }

    /// Replaces the queue policy.
    #[must_use]
    pub fn with_queue_policy(mut self, policy: QueuePolicy) -> Self {
        self.queue = self.queue.with_policy(policy);
        self
    }

    async fn authenticate(&self, token: &str) -> DeskResult<Identity> {
        Ok(self.auth.resolve(token).await?)
    }

    async fn authorize_admin(&self, token: &str) -> DeskResult<Identity> {
        let identity = self.authenticate(token).await?;
        identity.require_admin().map_err(|err| {
            warn!(user_id = %identity.user_id(), "refused admin-only desk operation");
            DeskError::from(err)
        })?;
        Ok(identity)
    }

    // Identity

    /// Signs in and returns a session token.
    ///
    /// # Errors
    ///
    /// Returns an `unauthenticated` error for bad credentials.
    pub async fn login(&self, email: &str, password: &str) -> DeskResult<LoginOutcome> {
        Ok(self.auth.login(email, password).await?)
    }

    /// Creates the first administrator. Only works while no account exists.
    ///
    /// # Errors
    ///
    /// Returns `precondition_failed` once any account exists and
    /// `validation_failed` for invalid fields.
    pub async fn bootstrap_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> DeskResult<UserAccount> {
        Ok(self
            .auth
            .bootstrap_admin(CreateUserRequest::new(name, email, password))
            .await?)
    }

    /// Creates a user account. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `unauthorized` for non-admins and `conflict` for a taken
    /// email.
    pub async fn create_user(
        &self,
        token: &str,
        request: CreateUserRequest,
    ) -> DeskResult<UserAccount> {
        self.authorize_admin(token).await?;
        Ok(self.auth.create_user(request).await?)
    }

    // Catalog

    /// Creates a practitioner role. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `conflict` for a duplicate name.
    pub async fn create_role(&self, token: &str, name: &str) -> DeskResult<PractitionerRole> {
        self.authorize_admin(token).await?;
        Ok(self.catalog.create_role(name).await?)
    }

    /// Creates a gira type. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `conflict` for a duplicate name.
    pub async fn create_gira_type(&self, token: &str, name: &str) -> DeskResult<GiraType> {
        self.authorize_admin(token).await?;
        Ok(self.catalog.create_gira_type(name).await?)
    }

    /// Registers a practitioner. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `not_found` for an unknown role.
    pub async fn register_practitioner(
        &self,
        token: &str,
        request: RegisterPractitionerRequest,
    ) -> DeskResult<Practitioner> {
        self.authorize_admin(token).await?;
        Ok(self.catalog.register_practitioner(request).await?)
    }

    /// Hides a practitioner from listings. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `not_found` for an unknown practitioner.
    pub async fn deactivate_practitioner(
        &self,
        token: &str,
        practitioner_id: PractitionerId,
    ) -> DeskResult<Practitioner> {
        self.authorize_admin(token).await?;
        Ok(self.catalog.deactivate_practitioner(practitioner_id).await?)
    }

    /// Creates the standard roles and gira types. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `unauthorized` for non-admins.
    pub async fn seed_defaults(&self, token: &str) -> DeskResult<SeedReport> {
        self.authorize_admin(token).await?;
        Ok(self.catalog.seed_defaults().await?)
    }

    /// Lists practitioner roles by name.
    ///
    /// # Errors
    ///
    /// Returns `internal` when the store fails.
    pub async fn list_roles(&self) -> DeskResult<Vec<PractitionerRole>> {
        Ok(self.catalog.list_roles().await?)
    }

    /// Lists gira types by name.
    ///
    /// # Errors
    ///
    /// Returns `internal` when the store fails.
    pub async fn list_gira_types(&self) -> DeskResult<Vec<GiraType>> {
        Ok(self.catalog.list_gira_types().await?)
    }

    /// Lists active practitioners by name.
    ///
    /// # Errors
    ///
    /// Returns `internal` when the store fails.
    pub async fn list_practitioners(&self) -> DeskResult<Vec<PractitionerSummary>> {
        Ok(self.catalog.list_practitioners().await?)
    }

    // Giras

    /// Opens a gira. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `not_found` for an unknown gira type.
    pub async fn open_gira(&self, token: &str, gira_type_id: GiraTypeId) -> DeskResult<Gira> {
        self.authorize_admin(token).await?;
        Ok(self.lifecycle.open(gira_type_id).await?)
    }

    /// Closes a gira. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `precondition_failed` while consultants are waiting or in
    /// service, or when the gira is already closed.
    pub async fn close_gira(&self, token: &str, gira_id: GiraId) -> DeskResult<Gira> {
        self.authorize_admin(token).await?;
        Ok(self.lifecycle.close(gira_id).await?)
    }

    /// Lists open giras with their queue and presence counts.
    ///
    /// # Errors
    ///
    /// Returns `internal` when the store fails.
    pub async fn list_open_giras(&self) -> DeskResult<Vec<OpenGiraSummary>> {
        Ok(self.lifecycle.list_open().await?)
    }

    // Presence

    /// Replaces the practitioners present at a gira. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `not_found` for an unknown gira or practitioner.
    pub async fn set_presence(
        &self,
        token: &str,
        gira_id: GiraId,
        practitioner_ids: Vec<PractitionerId>,
    ) -> DeskResult<PresenceSet> {
        self.authorize_admin(token).await?;
        Ok(self.presence.set_presence(gira_id, practitioner_ids).await?)
    }

    /// Lists the practitioners present at a gira.
    ///
    /// # Errors
    ///
    /// Returns `unauthenticated` without a valid token and `not_found` for
    /// an unknown gira.
    pub async fn list_present(
        &self,
        token: &str,
        gira_id: GiraId,
    ) -> DeskResult<Vec<PractitionerSummary>> {
        self.authenticate(token).await?;
        Ok(self.presence.list_present(gira_id).await?)
    }

    // Queue

    /// Adds a consultant to a gira's queue.
    ///
    /// # Errors
    ///
    /// Returns `validation_failed` for invalid consultant details,
    /// `precondition_failed` for a closed gira, and `conflict` when a
    /// concurrent enqueue keeps winning.
    pub async fn enqueue(&self, token: &str, request: EnqueueRequest) -> DeskResult<QueueEntry> {
        self.authenticate(token).await?;
        Ok(self.queue.enqueue(request).await?)
    }

    /// Puts an entry in service with a practitioner.
    ///
    /// # Errors
    ///
    /// Returns `precondition_failed` when the policy forbids assigning the
    /// entry and `conflict` when a concurrent change won.
    pub async fn assign_practitioner(
        &self,
        token: &str,
        entry_id: QueueEntryId,
        practitioner_id: PractitionerId,
    ) -> DeskResult<QueueEntry> {
        self.authenticate(token).await?;
        Ok(self
            .queue
            .assign_practitioner(entry_id, practitioner_id)
            .await?)
    }

    /// Moves an entry to the named status.
    ///
    /// # Errors
    ///
    /// Returns `validation_failed` for an unknown status name and
    /// `precondition_failed` for a move outside the transition table.
    pub async fn update_status(
        &self,
        token: &str,
        entry_id: QueueEntryId,
        status: &str,
    ) -> DeskResult<QueueEntry> {
        self.authenticate(token).await?;
        let next = QueueStatus::try_from(status)?;
        Ok(self.queue.update_status(entry_id, next).await?)
    }

    /// Lists a gira's queue by ascending sequence.
    ///
    /// # Errors
    ///
    /// Returns `not_found` for an unknown gira.
    pub async fn list_queue(&self, gira_id: GiraId) -> DeskResult<Vec<QueueEntry>> {
        Ok(self.queue.list_queue(gira_id).await?)
    }
}

impl<A, K, S, C> FrontDesk<A, K, S, C>
where
    A: UserAccountRepository,
    K: CatalogRepository,
    S: GiraRepository + QueueRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Returns a poller that re-reads queues every `interval`.
    #[must_use]
    pub fn queue_poller(&self, interval: Duration) -> QueuePoller<S, C> {
        QueuePoller::new(Arc::clone(&self.store), Arc::clone(&self.clock)).with_interval(interval)
    }
}
