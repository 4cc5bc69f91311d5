//! Service layer for opening, closing, and listing giras.

use super::{GiraServiceError, GiraServiceResult};
use crate::catalog::{
    domain::{CatalogName, GiraTypeId},
    ports::CatalogRepository,
};
use crate::gira::{
    domain::{Gira, GiraId},
    ports::{GiraRepository, GiraRepositoryError},
};
use mockable::Clock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// An open gira as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenGiraSummary {
    /// The open gira.
    pub gira: Gira,
    /// Name of the gira type.
    pub gira_type_name: Option<CatalogName>,
    /// Number of queue entries in any status.
    pub queue_length: u64,
    /// Number of practitioners marked present.
    pub present_count: u64,
}

/// Gira lifecycle orchestration service.
#[derive(Clone)]
pub struct GiraLifecycleService<G, K, C>
where
    G: GiraRepository,
    K: CatalogRepository,
    C: Clock + Send + Sync,
{
    giras: Arc<G>,
    catalog: Arc<K>,
    clock: Arc<C>,
}

impl<G, K, C> GiraLifecycleService<G, K, C>
where
    G: GiraRepository,
    K: CatalogRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new gira lifecycle service.
    #[must_use]
    pub const fn new(giras: Arc<G>, catalog: Arc<K>, clock: Arc<C>) -> Self {
        Self {
            giras,
            catalog,
            clock,
        }
    }

    /// Opens a gira of the given type.
    ///
    /// # Errors
    ///
    /// Returns [`GiraServiceError::GiraTypeNotFound`] for an unknown type
    /// and repository errors when persistence fails.
    pub async fn open(&self, gira_type_id: GiraTypeId) -> GiraServiceResult<Gira> {
        let gira_type = self
            .catalog
            .find_gira_type(gira_type_id)
            .await?
            .ok_or(GiraServiceError::GiraTypeNotFound(gira_type_id))?;

        let gira = Gira::open(gira_type.id(), &*self.clock);
        self.giras.store(&gira).await?;
        info!(gira_id = %gira.id(), gira_type = %gira_type.name(), "opened gira");
        Ok(gira)
    }

    /// Closes a gira once no consultant is waiting or in service.
    ///
    /// # Errors
    ///
    /// Returns [`GiraServiceError::GiraNotFound`] for an unknown gira,
    /// [`GiraServiceError::Domain`] or
    /// [`GiraRepositoryError::AlreadyClosed`] when it is already closed,
    /// and [`GiraRepositoryError::PendingEntries`] while entries are
    /// pending.
    pub async fn close(&self, gira_id: GiraId) -> GiraServiceResult<Gira> {
        let mut gira = self.find(gira_id).await?;
        gira.close(&*self.clock)?;

        match self.giras.close(&gira).await {
            Ok(()) => {
                info!(gira_id = %gira_id, "closed gira");
                Ok(gira)
            }
            Err(GiraRepositoryError::NotFound(id)) => Err(GiraServiceError::GiraNotFound(id)),
            Err(err @ GiraRepositoryError::PendingEntries { pending, .. }) => {
                warn!(gira_id = %gira_id, pending, "refused to close gira with pending entries");
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Lists open giras, most recently opened first, with counts.
    ///
    /// # Errors
    ///
    /// Returns repository errors when a lookup fails.
    pub async fn list_open(&self) -> GiraServiceResult<Vec<OpenGiraSummary>> {
        let open = self.giras.list_open().await?;
        let type_names: HashMap<GiraTypeId, CatalogName> = self
            .catalog
            .list_gira_types()
            .await?
            .into_iter()
            .map(|gira_type| (gira_type.id(), gira_type.name().clone()))
            .collect();

        Ok(open
            .into_iter()
            .map(|counts| OpenGiraSummary {
                gira_type_name: type_names.get(&counts.gira.gira_type_id()).cloned(),
                gira: counts.gira,
                queue_length: counts.queue_length,
                present_count: counts.present_count,
            })
            .collect())
    }

    /// Finds a gira by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GiraServiceError::GiraNotFound`] for an unknown gira.
    pub async fn find(&self, gira_id: GiraId) -> GiraServiceResult<Gira> {
        self.giras
            .find_by_id(gira_id)
            .await?
            .ok_or(GiraServiceError::GiraNotFound(gira_id))
    }
}
