//! Diesel row models for catalog persistence.

use super::schema::{gira_types, practitioner_roles, practitioners};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row for the `practitioner_roles` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = practitioner_roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PractitionerRoleRow {
    /// Role identifier.
    pub id: uuid::Uuid,
    /// Role name.
    pub name: String,
}

/// Row for the `gira_types` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = gira_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GiraTypeRow {
    /// Gira type identifier.
    pub id: uuid::Uuid,
    /// Gira type name.
    pub name: String,
}

/// Row for the `practitioners` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = practitioners)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PractitionerRow {
    /// Practitioner identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Optional role reference.
    pub role_id: Option<uuid::Uuid>,
    /// Whether the practitioner is listed.
    pub active: bool,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}
