//! `PostgreSQL` store implementing both gira ports.
//!
//! Enqueue and close both take `SELECT ... FOR UPDATE` on the gira row, so
//! a close cannot interleave with numbering a new entry. Entry changes lock
//! the affected rows in identifier order and compare their status before
//! writing.

use super::{
    models::{GiraRow, OpenGiraRow, PresenceRow, QueueEntryChangeset, QueueEntryRow},
    schema::{gira_presence, giras, queue_entries},
};
use crate::catalog::domain::{GiraTypeId, PractitionerId};
use crate::gira::{
    domain::{
        Consultant, EnqueueGuard, Gira, GiraId, GiraStatus, OpenGiraCounts, ParseGiraStatusError,
        PendingQueueEntry, PersistedGiraData, PersistedQueueEntryData, PresenceSet, QueueEntry,
        QueueEntryId, QueueStatus, SequenceNumber,
    },
    ports::{
        EntryChange, GiraRepository, GiraRepositoryError, GiraRepositoryResult, QueueRepository,
        QueueRepositoryError, QueueRepositoryResult,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by gira adapters.
pub type GiraPgPool = Pool<ConnectionManager<PgConnection>>;

const SEQUENCE_CONSTRAINT: &str = "uq_queue_entries_gira_sequence";
const IN_SERVICE_INDEX: &str = "idx_queue_entries_practitioner_in_service";

const OPEN_GIRAS_QUERY: &str = concat!(
    "SELECT g.id, g.gira_type_id, g.status, g.opened_at, g.closed_at, ",
    "(SELECT COUNT(*) FROM queue_entries q WHERE q.gira_id = g.id) AS queue_length, ",
    "(SELECT COUNT(*) FROM gira_presence p WHERE p.gira_id = g.id) AS present_count ",
    "FROM giras g WHERE g.status = 'open' ",
    "ORDER BY g.opened_at DESC, g.id ASC",
);

/// `PostgreSQL`-backed store for giras, presence, and queue entries.
#[derive(Debug, Clone)]
pub struct PostgresGiraStore {
    pool: GiraPgPool,
}

trait WrapPersistence: Send + 'static {
    fn wrap(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

impl WrapPersistence for GiraRepositoryError {
    fn wrap(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl WrapPersistence for QueueRepositoryError {
    fn wrap(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl From<DieselError> for GiraRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl From<DieselError> for QueueRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl PostgresGiraStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: GiraPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: WrapPersistence,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(E::wrap)?;
            f(&mut connection)
        })
        .await
        .map_err(E::wrap)?
    }
}

#[async_trait]
impl GiraRepository for PostgresGiraStore {
    async fn store(&self, gira: &Gira) -> GiraRepositoryResult<()> {
        let gira_id = gira.id();
        let row = to_gira_row(gira);
        self.run_blocking(move |connection| {
            diesel::insert_into(giras::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        GiraRepositoryError::DuplicateGira(gira_id)
                    }
                    _ => GiraRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: GiraId) -> GiraRepositoryResult<Option<Gira>> {
        self.run_blocking(move |connection| {
            let row = giras::table
                .find(id.into_inner())
                .select(GiraRow::as_select())
                .first::<GiraRow>(connection)
                .optional()?;
            row.map(row_to_gira)
                .transpose()
                .map_err(GiraRepositoryError::persistence)
        })
        .await
    }

    async fn list_open(&self) -> GiraRepositoryResult<Vec<OpenGiraCounts>> {
        self.run_blocking(move |connection| {
            let rows = diesel::sql_query(OPEN_GIRAS_QUERY).load::<OpenGiraRow>(connection)?;
            rows.into_iter().map(row_to_open_counts).collect()
        })
        .await
    }

    async fn close(&self, gira: &Gira) -> GiraRepositoryResult<()> {
        let closed = gira.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<_, GiraRepositoryError, _>(|conn| {
                let gira_id = closed.id();
                let status = lock_gira_status(conn, gira_id)?
                    .ok_or(GiraRepositoryError::NotFound(gira_id))?;
                let current = GiraStatus::try_from(status.as_str())
                    .map_err(GiraRepositoryError::persistence)?;
                if current != GiraStatus::Open {
                    return Err(GiraRepositoryError::AlreadyClosed(gira_id));
                }

                let pending: i64 = queue_entries::table
                    .filter(queue_entries::gira_id.eq(gira_id.into_inner()))
                    .filter(queue_entries::status.eq_any(vec![
                        QueueStatus::Waiting.as_str(),
                        QueueStatus::InService.as_str(),
                    ]))
                    .count()
                    .get_result(conn)?;
                if pending > 0 {
                    return Err(GiraRepositoryError::PendingEntries {
                        gira_id,
                        pending: u64::try_from(pending)
                            .map_err(GiraRepositoryError::persistence)?,
                    });
                }

                diesel::update(giras::table.find(gira_id.into_inner()))
                    .set((
                        giras::status.eq(closed.status().as_str()),
                        giras::closed_at.eq(closed.closed_at()),
                    ))
                    .execute(conn)?;
                Ok(())
            })
        })
        .await
    }

    async fn replace_presence(
        &self,
        gira_id: GiraId,
        presence: &PresenceSet,
    ) -> GiraRepositoryResult<()> {
        let rows: Vec<PresenceRow> = presence
            .iter()
            .map(|practitioner_id| PresenceRow {
                gira_id: gira_id.into_inner(),
                practitioner_id: practitioner_id.into_inner(),
            })
            .collect();
        self.run_blocking(move |connection| {
            connection.transaction::<_, GiraRepositoryError, _>(|conn| {
                lock_gira_status(conn, gira_id)?.ok_or(GiraRepositoryError::NotFound(gira_id))?;
                diesel::delete(
                    gira_presence::table.filter(gira_presence::gira_id.eq(gira_id.into_inner())),
                )
                .execute(conn)?;
                if !rows.is_empty() {
                    diesel::insert_into(gira_presence::table)
                        .values(&rows)
                        .execute(conn)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn presence(&self, gira_id: GiraId) -> GiraRepositoryResult<PresenceSet> {
        self.run_blocking(move |connection| {
            if !gira_exists(connection, gira_id)? {
                return Err(GiraRepositoryError::NotFound(gira_id));
            }
            let ids = gira_presence::table
                .filter(gira_presence::gira_id.eq(gira_id.into_inner()))
                .select(gira_presence::practitioner_id)
                .load::<Uuid>(connection)?;
            Ok(ids.into_iter().map(PractitionerId::from_uuid).collect())
        })
        .await
    }
}

#[async_trait]
impl QueueRepository for PostgresGiraStore {
    async fn append(
        &self,
        pending: &PendingQueueEntry,
        guard: EnqueueGuard,
    ) -> QueueRepositoryResult<QueueEntry> {
        let pending_entry = pending.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<_, QueueRepositoryError, _>(|conn| {
                let gira_id = pending_entry.gira_id();
                let status = lock_gira_status(conn, gira_id)?
                    .ok_or(QueueRepositoryError::GiraNotFound(gira_id))?;
                let current = GiraStatus::try_from(status.as_str())
                    .map_err(QueueRepositoryError::persistence)?;
                if guard.requires_open() && current != GiraStatus::Open {
                    return Err(QueueRepositoryError::GiraClosed(gira_id));
                }

                let highest: Option<i64> = queue_entries::table
                    .filter(queue_entries::gira_id.eq(gira_id.into_inner()))
                    .select(diesel::dsl::max(queue_entries::sequence_number))
                    .first(conn)?;
                let highest_sequence = highest
                    .map(SequenceNumber::new)
                    .transpose()
                    .map_err(QueueRepositoryError::persistence)?;

                let entry = pending_entry.into_entry(SequenceNumber::after(highest_sequence));
                diesel::insert_into(queue_entries::table)
                    .values(&to_entry_row(&entry))
                    .execute(conn)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                            if violates(info.as_ref(), SEQUENCE_CONSTRAINT) =>
                        {
                            QueueRepositoryError::SequenceConflict(gira_id)
                        }
                        _ => QueueRepositoryError::persistence(err),
                    })?;
                Ok(entry)
            })
        })
        .await
    }

    async fn commit(&self, changes: &[EntryChange]) -> QueueRepositoryResult<()> {
        let pending_changes = changes.to_vec();
        self.run_blocking(move |connection| {
            connection.transaction::<_, QueueRepositoryError, _>(|conn| {
                let mut lock_order: Vec<Uuid> = pending_changes
                    .iter()
                    .map(|change| change.entry.id().into_inner())
                    .collect();
                lock_order.sort_unstable();
                lock_order.dedup();

                let stored: HashMap<Uuid, String> = queue_entries::table
                    .filter(queue_entries::id.eq_any(lock_order))
                    .order(queue_entries::id.asc())
                    .select((queue_entries::id, queue_entries::status))
                    .for_update()
                    .load::<(Uuid, String)>(conn)?
                    .into_iter()
                    .collect();

                for change in &pending_changes {
                    let entry_id = change.entry.id();
                    let raw = stored
                        .get(&entry_id.into_inner())
                        .ok_or(QueueRepositoryError::EntryNotFound(entry_id))?;
                    let actual = QueueStatus::try_from(raw.as_str())
                        .map_err(QueueRepositoryError::persistence)?;
                    if actual != change.expected {
                        return Err(QueueRepositoryError::StaleEntry {
                            entry_id,
                            expected: change.expected,
                            actual,
                        });
                    }
                }

                for change in &pending_changes {
                    let entry = &change.entry;
                    diesel::update(queue_entries::table.find(entry.id().into_inner()))
                        .set(&to_changeset(entry))
                        .execute(conn)
                        .map_err(|err| map_update_error(err, entry))?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: QueueEntryId) -> QueueRepositoryResult<Option<QueueEntry>> {
        self.run_blocking(move |connection| {
            let row = queue_entries::table
                .find(id.into_inner())
                .select(QueueEntryRow::as_select())
                .first::<QueueEntryRow>(connection)
                .optional()?;
            row.map(row_to_entry).transpose()
        })
        .await
    }

    async fn list_by_gira(&self, gira_id: GiraId) -> QueueRepositoryResult<Vec<QueueEntry>> {
        self.run_blocking(move |connection| {
            if !gira_exists(connection, gira_id)? {
                return Err(QueueRepositoryError::GiraNotFound(gira_id));
            }
            queue_entries::table
                .filter(queue_entries::gira_id.eq(gira_id.into_inner()))
                .order(queue_entries::sequence_number.asc())
                .select(QueueEntryRow::as_select())
                .load::<QueueEntryRow>(connection)?
                .into_iter()
                .map(row_to_entry)
                .collect()
        })
        .await
    }

    async fn find_in_service(
        &self,
        gira_id: GiraId,
        practitioner_id: PractitionerId,
    ) -> QueueRepositoryResult<Option<QueueEntry>> {
        self.run_blocking(move |connection| {
            let row = queue_entries::table
                .filter(queue_entries::gira_id.eq(gira_id.into_inner()))
                .filter(queue_entries::assigned_practitioner_id.eq(practitioner_id.into_inner()))
                .filter(queue_entries::status.eq(QueueStatus::InService.as_str()))
                .select(QueueEntryRow::as_select())
                .first::<QueueEntryRow>(connection)
                .optional()?;
            row.map(row_to_entry).transpose()
        })
        .await
    }
}

fn lock_gira_status(
    connection: &mut PgConnection,
    gira_id: GiraId,
) -> Result<Option<String>, DieselError> {
    giras::table
        .find(gira_id.into_inner())
        .select(giras::status)
        .for_update()
        .first::<String>(connection)
        .optional()
}

fn gira_exists(connection: &mut PgConnection, gira_id: GiraId) -> Result<bool, DieselError> {
    diesel::select(diesel::dsl::exists(giras::table.find(gira_id.into_inner())))
        .get_result(connection)
}

fn violates(info: &dyn DatabaseErrorInformation, constraint: &str) -> bool {
    info.constraint_name().is_some_and(|name| name == constraint)
}

fn map_update_error(err: DieselError, entry: &QueueEntry) -> QueueRepositoryError {
    let busy = matches!(
        &err,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if violates(info.as_ref(), IN_SERVICE_INDEX)
    );
    match entry.assigned_practitioner_id() {
        Some(practitioner_id) if busy => QueueRepositoryError::PractitionerBusy {
            gira_id: entry.gira_id(),
            practitioner_id,
        },
        _ => QueueRepositoryError::persistence(err),
    }
}

fn to_gira_row(gira: &Gira) -> GiraRow {
    GiraRow {
        id: gira.id().into_inner(),
        gira_type_id: gira.gira_type_id().into_inner(),
        status: gira.status().as_str().to_owned(),
        opened_at: gira.opened_at(),
        closed_at: gira.closed_at(),
    }
}

fn row_to_gira(row: GiraRow) -> Result<Gira, ParseGiraStatusError> {
    Ok(Gira::from_persisted(PersistedGiraData {
        id: GiraId::from_uuid(row.id),
        gira_type_id: GiraTypeId::from_uuid(row.gira_type_id),
        status: GiraStatus::try_from(row.status.as_str())?,
        opened_at: row.opened_at,
        closed_at: row.closed_at,
    }))
}

fn row_to_open_counts(row: OpenGiraRow) -> GiraRepositoryResult<OpenGiraCounts> {
    let OpenGiraRow {
        id,
        gira_type_id,
        status,
        opened_at,
        closed_at,
        queue_length,
        present_count,
    } = row;
    let gira = row_to_gira(GiraRow {
        id,
        gira_type_id,
        status,
        opened_at,
        closed_at,
    })
    .map_err(GiraRepositoryError::persistence)?;

    Ok(OpenGiraCounts {
        gira,
        queue_length: u64::try_from(queue_length).map_err(GiraRepositoryError::persistence)?,
        present_count: u64::try_from(present_count).map_err(GiraRepositoryError::persistence)?,
    })
}

fn to_entry_row(entry: &QueueEntry) -> QueueEntryRow {
    QueueEntryRow {
        id: entry.id().into_inner(),
        gira_id: entry.gira_id().into_inner(),
        consultant_name: entry.consultant().name().to_owned(),
        consultant_phone: entry.consultant().phone().map(str::to_owned),
        sequence_number: entry.sequence().value(),
        status: entry.status().as_str().to_owned(),
        assigned_practitioner_id: entry
            .assigned_practitioner_id()
            .map(PractitionerId::into_inner),
        created_at: entry.created_at(),
        started_at: entry.started_at(),
        finished_at: entry.finished_at(),
    }
}

fn to_changeset(entry: &QueueEntry) -> QueueEntryChangeset {
    QueueEntryChangeset {
        status: entry.status().as_str().to_owned(),
        assigned_practitioner_id: entry
            .assigned_practitioner_id()
            .map(PractitionerId::into_inner),
        started_at: entry.started_at(),
        finished_at: entry.finished_at(),
    }
}

fn row_to_entry(row: QueueEntryRow) -> QueueRepositoryResult<QueueEntry> {
    let QueueEntryRow {
        id,
        gira_id,
        consultant_name,
        consultant_phone,
        sequence_number,
        status,
        assigned_practitioner_id,
        created_at,
        started_at,
        finished_at,
    } = row;

    let consultant = Consultant::new(consultant_name, consultant_phone)
        .map_err(QueueRepositoryError::persistence)?;
    let sequence =
        SequenceNumber::new(sequence_number).map_err(QueueRepositoryError::persistence)?;
    let parsed_status =
        QueueStatus::try_from(status.as_str()).map_err(QueueRepositoryError::persistence)?;

    Ok(QueueEntry::from_persisted(PersistedQueueEntryData {
        id: QueueEntryId::from_uuid(id),
        gira_id: GiraId::from_uuid(gira_id),
        consultant,
        sequence,
        status: parsed_status,
        assigned_practitioner_id: assigned_practitioner_id.map(PractitionerId::from_uuid),
        created_at,
        started_at,
        finished_at,
    }))
}
