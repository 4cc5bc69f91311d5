//! `PostgreSQL` adapters for catalog persistence.

mod models;
mod repository;
mod schema;

pub use repository::{CatalogPgPool, PostgresCatalogRepository};
