//! In-memory catalog adapter for tests and single-process deployments.

mod catalog;

pub use catalog::InMemoryCatalogRepository;
