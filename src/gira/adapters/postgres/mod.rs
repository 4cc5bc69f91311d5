//! `PostgreSQL` adapter for giras, presence, and queue entries.

mod models;
mod schema;
mod store;

pub use store::{GiraPgPool, PostgresGiraStore};
