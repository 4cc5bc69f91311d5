//! Repository port for catalog reference data.

use crate::catalog::domain::{
    CatalogName, GiraType, GiraTypeId, Practitioner, PractitionerId, PractitionerRole,
    PractitionerRoleId, PractitionerSummary,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for catalog repository operations.
pub type CatalogRepositoryResult<T> = Result<T, CatalogRepositoryError>;

/// Catalog persistence contract.
///
/// Every listing is ordered by name ascending.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Stores a new practitioner role.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::DuplicateName`] when a role with
    /// the same name exists.
    async fn store_role(&self, role: &PractitionerRole) -> CatalogRepositoryResult<()>;

    /// Stores a new gira type.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::DuplicateName`] when a gira type
    /// with the same name exists.
    async fn store_gira_type(&self, gira_type: &GiraType) -> CatalogRepositoryResult<()>;

    /// Stores a new practitioner. Names need not be unique.
    async fn store_practitioner(&self, practitioner: &Practitioner) -> CatalogRepositoryResult<()>;

    /// Persists changes to an existing practitioner.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::PractitionerNotFound`] when the
    /// practitioner was never stored.
    async fn update_practitioner(&self, practitioner: &Practitioner)
    -> CatalogRepositoryResult<()>;

    /// Finds a role by identifier.
    async fn find_role(
        &self,
        id: PractitionerRoleId,
    ) -> CatalogRepositoryResult<Option<PractitionerRole>>;

    /// Finds a role by exact name.
    async fn find_role_by_name(
        &self,
        name: &CatalogName,
    ) -> CatalogRepositoryResult<Option<PractitionerRole>>;

    /// Finds a gira type by identifier.
    async fn find_gira_type(&self, id: GiraTypeId) -> CatalogRepositoryResult<Option<GiraType>>;

    /// Finds a gira type by exact name.
    async fn find_gira_type_by_name(
        &self,
        name: &CatalogName,
    ) -> CatalogRepositoryResult<Option<GiraType>>;

    /// Finds a practitioner by identifier, active or not.
    async fn find_practitioner(
        &self,
        id: PractitionerId,
    ) -> CatalogRepositoryResult<Option<Practitioner>>;

    /// Lists all roles.
    async fn list_roles(&self) -> CatalogRepositoryResult<Vec<PractitionerRole>>;

    /// Lists all gira types.
    async fn list_gira_types(&self) -> CatalogRepositoryResult<Vec<GiraType>>;

    /// Lists active practitioners with their role names.
    async fn list_practitioners(&self) -> CatalogRepositoryResult<Vec<PractitionerSummary>>;

    /// Returns summaries for the given practitioners, active or not.
    ///
    /// Unknown identifiers are skipped, so callers compare lengths to detect
    /// missing practitioners.
    async fn find_practitioners(
        &self,
        ids: &[PractitionerId],
    ) -> CatalogRepositoryResult<Vec<PractitionerSummary>>;
}

/// Errors returned by catalog repository implementations.
#[derive(Debug, Clone, Error)]
pub enum CatalogRepositoryError {
    /// A role or gira type with the same name already exists.
    #[error("name already in use: {0}")]
    DuplicateName(CatalogName),

    /// The practitioner to update does not exist.
    #[error("practitioner not found: {0}")]
    PractitionerNotFound(PractitionerId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CatalogRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
