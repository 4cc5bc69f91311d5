//! In-memory gira store for tests and single-process deployments.

mod store;

pub use store::InMemoryGiraStore;
