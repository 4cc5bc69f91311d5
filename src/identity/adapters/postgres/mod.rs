//! `PostgreSQL` adapters for user account persistence.

mod models;
mod repository;
mod schema;

pub use repository::{IdentityPgPool, PostgresUserAccountRepository};
