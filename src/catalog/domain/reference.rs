//! Immutable named reference entries: practitioner roles and gira types.

use super::{CatalogName, GiraTypeId, PractitionerRoleId};
use serde::Serialize;

/// A function a practitioner performs during a gira (Médium, Cambone, Ogã).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PractitionerRole {
    id: PractitionerRoleId,
    name: CatalogName,
}

impl PractitionerRole {
    /// Creates a role with a fresh identifier.
    #[must_use]
    pub fn new(name: CatalogName) -> Self {
        Self {
            id: PractitionerRoleId::new(),
            name,
        }
    }

    /// Reconstructs a role from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: PractitionerRoleId, name: CatalogName) -> Self {
        Self { id, name }
    }

    /// Returns the role identifier.
    #[must_use]
    pub const fn id(&self) -> PractitionerRoleId {
        self.id
    }

    /// Returns the role name.
    #[must_use]
    pub const fn name(&self) -> &CatalogName {
        &self.name
    }
}

/// The kind of session being held (Preto-Velho, Caboclo, Exu...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GiraType {
    id: GiraTypeId,
    name: CatalogName,
}

impl GiraType {
    /// Creates a gira type with a fresh identifier.
    #[must_use]
    pub fn new(name: CatalogName) -> Self {
        Self {
            id: GiraTypeId::new(),
            name,
        }
    }

    /// Reconstructs a gira type from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: GiraTypeId, name: CatalogName) -> Self {
        Self { id, name }
    }

    /// Returns the gira type identifier.
    #[must_use]
    pub const fn id(&self) -> GiraTypeId {
        self.id
    }

    /// Returns the gira type name.
    #[must_use]
    pub const fn name(&self) -> &CatalogName {
        &self.name
    }
}
