//! Domain model for catalog reference data.

mod error;
mod ids;
mod name;
mod practitioner;
mod reference;

pub use error::CatalogDomainError;
pub use ids::{GiraTypeId, PractitionerId, PractitionerRoleId};
pub use name::CatalogName;
pub use practitioner::{PersistedPractitionerData, Practitioner, PractitionerSummary};
pub use reference::{GiraType, PractitionerRole};
