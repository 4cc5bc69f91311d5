//! Practitioner aggregate and its listing view.

use super::{CatalogName, PractitionerId, PractitionerRoleId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;

/// A person who can be marked present at a gira and assigned consultants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Practitioner {
    id: PractitionerId,
    name: CatalogName,
    role_id: Option<PractitionerRoleId>,
    active: bool,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted practitioner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedPractitionerData {
    /// Persisted practitioner identifier.
    pub id: PractitionerId,
    /// Persisted name.
    pub name: CatalogName,
    /// Persisted role, if any.
    pub role_id: Option<PractitionerRoleId>,
    /// Whether the practitioner is listed.
    pub active: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Practitioner {
    /// Registers a new active practitioner.
    #[must_use]
    pub fn register(
        name: CatalogName,
        role_id: Option<PractitionerRoleId>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: PractitionerId::new(),
            name,
            role_id,
            active: true,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a practitioner from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedPractitionerData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            role_id: data.role_id,
            active: data.active,
            created_at: data.created_at,
        }
    }

    /// Returns the practitioner identifier.
    #[must_use]
    pub const fn id(&self) -> PractitionerId {
        self.id
    }

    /// Returns the practitioner name.
    #[must_use]
    pub const fn name(&self) -> &CatalogName {
        &self.name
    }

    /// Returns the practitioner's role, if one was assigned.
    #[must_use]
    pub const fn role_id(&self) -> Option<PractitionerRoleId> {
        self.role_id
    }

    /// Returns `true` while the practitioner appears in listings.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Removes the practitioner from listings. Past queue entries keep
    /// their reference.
    pub const fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Listing view of a practitioner joined with its role name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PractitionerSummary {
    /// Practitioner identifier.
    pub id: PractitionerId,
    /// Practitioner name.
    pub name: CatalogName,
    /// Name of the practitioner's role, if any.
    pub role_name: Option<CatalogName>,
    /// Whether the practitioner is active.
    pub active: bool,
}
