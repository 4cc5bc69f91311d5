//! Service layer for roles, gira types, and practitioners.

use crate::catalog::{
    domain::{
        CatalogDomainError, CatalogName, GiraType, GiraTypeId, Practitioner, PractitionerId,
        PractitionerRole, PractitionerRoleId, PractitionerSummary,
    },
    ports::{CatalogRepository, CatalogRepositoryError},
};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Roles created by [`CatalogService::seed_defaults`].
pub const DEFAULT_ROLES: [&str; 3] = ["Médium", "Cambone", "Ogã"];

/// Gira types created by [`CatalogService::seed_defaults`].
pub const DEFAULT_GIRA_TYPES: [&str; 4] = ["Preto-Velho", "Caboclo", "Exu", "Pomba-Gira"];

/// Request payload for registering a practitioner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterPractitionerRequest {
    name: String,
    role_id: Option<PractitionerRoleId>,
}

impl RegisterPractitionerRequest {
    /// Creates a request for a practitioner without a role.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role_id: None,
        }
    }

    /// Sets the practitioner's role.
    #[must_use]
    pub const fn with_role(mut self, role_id: PractitionerRoleId) -> Self {
        self.role_id = Some(role_id);
        self
    }
}

/// Counts of entries created by a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Roles that did not exist before.
    pub roles_created: usize,
    /// Gira types that did not exist before.
    pub gira_types_created: usize,
}

/// Service-level errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] CatalogDomainError),

    /// The referenced role does not exist.
    #[error("practitioner role not found: {0}")]
    RoleNotFound(PractitionerRoleId),

    /// The referenced practitioner does not exist.
    #[error("practitioner not found: {0}")]
    PractitionerNotFound(PractitionerId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] CatalogRepositoryError),
}

/// Result type for catalog service operations.
pub type CatalogServiceResult<T> = Result<T, CatalogServiceError>;

/// Catalog orchestration service.
#[derive(Clone)]
pub struct CatalogService<R, C>
where
    R: CatalogRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> CatalogService<R, C>
where
    R: CatalogRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new catalog service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a practitioner role.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Domain`] for an invalid name and
    /// [`CatalogServiceError::Repository`] when the name is taken or
    /// persistence fails.
    pub async fn create_role(&self, name: &str) -> CatalogServiceResult<PractitionerRole> {
        let role = PractitionerRole::new(CatalogName::new(name)?);
        self.repository.store_role(&role).await?;
        info!(role_id = %role.id(), name = %role.name(), "created practitioner role");
        Ok(role)
    }

    /// Creates a gira type.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Domain`] for an invalid name and
    /// [`CatalogServiceError::Repository`] when the name is taken or
    /// persistence fails.
    pub async fn create_gira_type(&self, name: &str) -> CatalogServiceResult<GiraType> {
        let gira_type = GiraType::new(CatalogName::new(name)?);
        self.repository.store_gira_type(&gira_type).await?;
        info!(gira_type_id = %gira_type.id(), name = %gira_type.name(), "created gira type");
        Ok(gira_type)
    }

    /// Registers a new active practitioner.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Domain`] for an invalid name,
    /// [`CatalogServiceError::RoleNotFound`] for an unknown role, and
    /// [`CatalogServiceError::Repository`] when persistence fails.
    pub async fn register_practitioner(
        &self,
        request: RegisterPractitionerRequest,
    ) -> CatalogServiceResult<Practitioner> {
        let name = CatalogName::new(request.name)?;
        if let Some(role_id) = request.role_id {
            self.repository
                .find_role(role_id)
                .await?
                .ok_or(CatalogServiceError::RoleNotFound(role_id))?;
        }

        let practitioner = Practitioner::register(name, request.role_id, &*self.clock);
        self.repository.store_practitioner(&practitioner).await?;
        info!(
            practitioner_id = %practitioner.id(),
            name = %practitioner.name(),
            "registered practitioner"
        );
        Ok(practitioner)
    }

    /// Hides a practitioner from listings.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::PractitionerNotFound`] for an unknown
    /// practitioner and [`CatalogServiceError::Repository`] when persistence
    /// fails.
    pub async fn deactivate_practitioner(
        &self,
        id: PractitionerId,
    ) -> CatalogServiceResult<Practitioner> {
        let mut practitioner = self
            .repository
            .find_practitioner(id)
            .await?
            .ok_or(CatalogServiceError::PractitionerNotFound(id))?;
        practitioner.deactivate();
        self.repository.update_practitioner(&practitioner).await?;
        info!(practitioner_id = %id, "deactivated practitioner");
        Ok(practitioner)
    }

    /// Lists roles by name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when the lookup fails.
    pub async fn list_roles(&self) -> CatalogServiceResult<Vec<PractitionerRole>> {
        Ok(self.repository.list_roles().await?)
    }

    /// Lists gira types by name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when the lookup fails.
    pub async fn list_gira_types(&self) -> CatalogServiceResult<Vec<GiraType>> {
        Ok(self.repository.list_gira_types().await?)
    }

    /// Lists active practitioners by name, with role names.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when the lookup fails.
    pub async fn list_practitioners(&self) -> CatalogServiceResult<Vec<PractitionerSummary>> {
        Ok(self.repository.list_practitioners().await?)
    }

    /// Finds a gira type by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when the lookup fails.
    pub async fn find_gira_type(&self, id: GiraTypeId) -> CatalogServiceResult<Option<GiraType>> {
        Ok(self.repository.find_gira_type(id).await?)
    }

    /// Creates the standard roles and gira types that are missing.
    ///
    /// Running it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when persistence fails.
    pub async fn seed_defaults(&self) -> CatalogServiceResult<SeedReport> {
        let mut report = SeedReport::default();

        for raw in DEFAULT_ROLES {
            let name = CatalogName::new(raw)?;
            if self.repository.find_role_by_name(&name).await?.is_some() {
                debug!(name = raw, "role already present");
                continue;
            }
            match self.repository.store_role(&PractitionerRole::new(name)).await {
                Ok(()) => report.roles_created += 1,
                Err(CatalogRepositoryError::DuplicateName(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }

        for raw in DEFAULT_GIRA_TYPES {
            let name = CatalogName::new(raw)?;
            if self.repository.find_gira_type_by_name(&name).await?.is_some() {
                debug!(name = raw, "gira type already present");
                continue;
            }
            match self.repository.store_gira_type(&GiraType::new(name)).await {
                Ok(()) => report.gira_types_created += 1,
                Err(CatalogRepositoryError::DuplicateName(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }

        info!(
            roles_created = report.roles_created,
            gira_types_created = report.gira_types_created,
            "seeded catalog defaults"
        );
        Ok(report)
    }
}
