//! Service layer for the per-gira presence registry.

use super::{GiraServiceError, GiraServiceResult};
use crate::catalog::{
    domain::{PractitionerId, PractitionerSummary},
    ports::CatalogRepository,
};
use crate::gira::{
    domain::{GiraId, PresenceSet},
    ports::{GiraRepository, GiraRepositoryError},
};
use std::sync::Arc;
use tracing::info;

/// Presence registry orchestration service.
#[derive(Clone)]
pub struct PresenceRegistryService<G, K>
where
    G: GiraRepository,
    K: CatalogRepository,
{
    giras: Arc<G>,
    catalog: Arc<K>,
}

impl<G, K> PresenceRegistryService<G, K>
where
    G: GiraRepository,
    K: CatalogRepository,
{
    /// Creates a new presence registry service.
    #[must_use]
    pub const fn new(giras: Arc<G>, catalog: Arc<K>) -> Self {
        Self { giras, catalog }
    }

    /// Replaces the set of practitioners present at a gira.
    ///
    /// Duplicate identifiers collapse. Applying the same set twice leaves
    /// the registry unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GiraServiceError::PractitionersNotFound`] listing every
    /// unknown practitioner, [`GiraServiceError::GiraNotFound`] for an
    /// unknown gira, and repository errors when persistence fails.
    pub async fn set_presence(
        &self,
        gira_id: GiraId,
        practitioner_ids: impl IntoIterator<Item = PractitionerId>,
    ) -> GiraServiceResult<PresenceSet> {
        let presence: PresenceSet = practitioner_ids.into_iter().collect();
        let requested = presence.to_vec();

        let known = self.catalog.find_practitioners(&requested).await?;
        if known.len() != requested.len() {
            let missing = requested
                .into_iter()
                .filter(|id| !known.iter().any(|summary| summary.id == *id))
                .collect();
            return Err(GiraServiceError::PractitionersNotFound(missing));
        }

        self.giras
            .replace_presence(gira_id, &presence)
            .await
            .map_err(|err| match err {
                GiraRepositoryError::NotFound(id) => GiraServiceError::GiraNotFound(id),
                other => other.into(),
            })?;
        info!(gira_id = %gira_id, present = presence.len(), "replaced gira presence");
        Ok(presence)
    }

    /// Lists the practitioners present at a gira, by name, with their
    /// role names.
    ///
    /// # Errors
    ///
    /// Returns [`GiraServiceError::GiraNotFound`] for an unknown gira and
    /// repository errors when a lookup fails.
    pub async fn list_present(
        &self,
        gira_id: GiraId,
    ) -> GiraServiceResult<Vec<PractitionerSummary>> {
        let presence = self
            .giras
            .presence(gira_id)
            .await
            .map_err(|err| match err {
                GiraRepositoryError::NotFound(id) => GiraServiceError::GiraNotFound(id),
                other => other.into(),
            })?;
        if presence.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.catalog.find_practitioners(&presence.to_vec()).await?)
    }
}
