//! Diesel row models for user account persistence.

use super::schema::user_accounts;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for user accounts.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserAccountRow {
    /// Account identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Normalized login email.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Access role.
    pub role: String,
    /// Whether the account may sign in.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for user accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_accounts)]
pub struct NewUserAccountRow {
    /// Account identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Normalized login email.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Access role.
    pub role: String,
    /// Whether the account may sign in.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
