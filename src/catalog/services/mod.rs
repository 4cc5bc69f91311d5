//! Application services for catalog management.

mod catalog;

pub use catalog::{
    CatalogService, CatalogServiceError, CatalogServiceResult, DEFAULT_GIRA_TYPES,
    DEFAULT_ROLES, RegisterPractitionerRequest, SeedReport,
};
