//! Diesel row models for gira persistence.

use super::schema::{gira_presence, giras, queue_entries};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row for the `giras` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = giras)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GiraRow {
    /// Gira identifier.
    pub id: uuid::Uuid,
    /// Gira type reference.
    pub gira_type_id: uuid::Uuid,
    /// Status string.
    pub status: String,
    /// Opening timestamp.
    pub opened_at: DateTime<Utc>,
    /// Closing timestamp.
    pub closed_at: Option<DateTime<Utc>>,
}

/// Result row of the open-gira listing query.
#[derive(Debug, Clone, QueryableByName)]
pub struct OpenGiraRow {
    /// Gira identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Gira type reference.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub gira_type_id: uuid::Uuid,
    /// Status string.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub status: String,
    /// Opening timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub opened_at: DateTime<Utc>,
    /// Closing timestamp.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Timestamptz>)]
    pub closed_at: Option<DateTime<Utc>>,
    /// Number of queue entries.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub queue_length: i64,
    /// Number of present practitioners.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub present_count: i64,
}

/// Insert model for presence rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = gira_presence)]
pub struct PresenceRow {
    /// Gira reference.
    pub gira_id: uuid::Uuid,
    /// Practitioner reference.
    pub practitioner_id: uuid::Uuid,
}

/// Row for the `queue_entries` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = queue_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct QueueEntryRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Owning gira.
    pub gira_id: uuid::Uuid,
    /// Consultant name.
    pub consultant_name: String,
    /// Consultant phone.
    pub consultant_phone: Option<String>,
    /// Ticket number.
    pub sequence_number: i64,
    /// Status string.
    pub status: String,
    /// Assigned practitioner.
    pub assigned_practitioner_id: Option<uuid::Uuid>,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Service start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Service end timestamp.
    pub finished_at: Option<DateTime<Utc>>,
}

/// Mutable columns of a queue entry. `None` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = queue_entries)]
#[diesel(treat_none_as_null = true)]
pub struct QueueEntryChangeset {
    /// Status string.
    pub status: String,
    /// Assigned practitioner.
    pub assigned_practitioner_id: Option<uuid::Uuid>,
    /// Service start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Service end timestamp.
    pub finished_at: Option<DateTime<Utc>>,
}
