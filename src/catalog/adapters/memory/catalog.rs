//! In-memory repository for catalog reference data.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::catalog::{
    domain::{
        CatalogName, GiraType, GiraTypeId, Practitioner, PractitionerId, PractitionerRole,
        PractitionerRoleId, PractitionerSummary,
    },
    ports::{CatalogRepository, CatalogRepositoryError, CatalogRepositoryResult},
};

/// Thread-safe in-memory catalog repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogRepository {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    roles: HashMap<PractitionerRoleId, PractitionerRole>,
    gira_types: HashMap<GiraTypeId, GiraType>,
    practitioners: HashMap<PractitionerId, Practitioner>,
}

impl InMemoryCatalogState {
    fn summarize(&self, practitioner: &Practitioner) -> PractitionerSummary {
        PractitionerSummary {
            id: practitioner.id(),
            name: practitioner.name().clone(),
            role_name: practitioner
                .role_id()
                .and_then(|role_id| self.roles.get(&role_id))
                .map(|role| role.name().clone()),
            active: practitioner.is_active(),
        }
    }
}

impl InMemoryCatalogRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> CatalogRepositoryError {
    CatalogRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn sorted_by_name<T>(mut items: Vec<T>, name: impl Fn(&T) -> &CatalogName) -> Vec<T> {
    items.sort_by(|left, right| name(left).cmp(name(right)));
    items
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn store_role(&self, role: &PractitionerRole) -> CatalogRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state
            .roles
            .values()
            .any(|existing| existing.name() == role.name())
        {
            return Err(CatalogRepositoryError::DuplicateName(role.name().clone()));
        }
        state.roles.insert(role.id(), role.clone());
        Ok(())
    }

    async fn store_gira_type(&self, gira_type: &GiraType) -> CatalogRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state
            .gira_types
            .values()
            .any(|existing| existing.name() == gira_type.name())
        {
            return Err(CatalogRepositoryError::DuplicateName(
                gira_type.name().clone(),
            ));
        }
        state.gira_types.insert(gira_type.id(), gira_type.clone());
        Ok(())
    }

    async fn store_practitioner(&self, practitioner: &Practitioner) -> CatalogRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state
            .practitioners
            .insert(practitioner.id(), practitioner.clone());
        Ok(())
    }

    async fn update_practitioner(
        &self,
        practitioner: &Practitioner,
    ) -> CatalogRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let stored = state
            .practitioners
            .get_mut(&practitioner.id())
            .ok_or(CatalogRepositoryError::PractitionerNotFound(
                practitioner.id(),
            ))?;
        *stored = practitioner.clone();
        Ok(())
    }

    async fn find_role(
        &self,
        id: PractitionerRoleId,
    ) -> CatalogRepositoryResult<Option<PractitionerRole>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.roles.get(&id).cloned())
    }

    async fn find_role_by_name(
        &self,
        name: &CatalogName,
    ) -> CatalogRepositoryResult<Option<PractitionerRole>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .roles
            .values()
            .find(|role| role.name() == name)
            .cloned())
    }

    async fn find_gira_type(&self, id: GiraTypeId) -> CatalogRepositoryResult<Option<GiraType>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.gira_types.get(&id).cloned())
    }

    async fn find_gira_type_by_name(
        &self,
        name: &CatalogName,
    ) -> CatalogRepositoryResult<Option<GiraType>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .gira_types
            .values()
            .find(|gira_type| gira_type.name() == name)
            .cloned())
    }

    async fn find_practitioner(
        &self,
        id: PractitionerId,
    ) -> CatalogRepositoryResult<Option<Practitioner>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.practitioners.get(&id).cloned())
    }

    async fn list_roles(&self) -> CatalogRepositoryResult<Vec<PractitionerRole>> {
        let state = self.state.read().map_err(poisoned)?;
        let roles = state.roles.values().cloned().collect();
        Ok(sorted_by_name(roles, PractitionerRole::name))
    }

    async fn list_gira_types(&self) -> CatalogRepositoryResult<Vec<GiraType>> {
        let state = self.state.read().map_err(poisoned)?;
        let gira_types = state.gira_types.values().cloned().collect();
        Ok(sorted_by_name(gira_types, GiraType::name))
    }

    async fn list_practitioners(&self) -> CatalogRepositoryResult<Vec<PractitionerSummary>> {
        let state = self.state.read().map_err(poisoned)?;
        let summaries = state
            .practitioners
            .values()
            .filter(|practitioner| practitioner.is_active())
            .map(|practitioner| state.summarize(practitioner))
            .collect();
        Ok(sorted_by_name(summaries, |summary| &summary.name))
    }

    async fn find_practitioners(
        &self,
        ids: &[PractitionerId],
    ) -> CatalogRepositoryResult<Vec<PractitionerSummary>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut unique_ids = ids.to_vec();
        unique_ids.sort_unstable();
        unique_ids.dedup();
        let summaries = unique_ids
            .iter()
            .filter_map(|id| state.practitioners.get(id))
            .map(|practitioner| state.summarize(practitioner))
            .collect();
        Ok(sorted_by_name(summaries, |summary| &summary.name))
    }
}
