//! `PostgreSQL` repository implementation for catalog reference data.

use super::{
    models::{GiraTypeRow, PractitionerRoleRow, PractitionerRow},
    schema::{gira_types, practitioner_roles, practitioners},
};
use crate::catalog::{
    domain::{
        CatalogName, GiraType, GiraTypeId, PersistedPractitionerData, Practitioner,
        PractitionerId, PractitionerRole, PractitionerRoleId, PractitionerSummary,
    },
    ports::{CatalogRepository, CatalogRepositoryError, CatalogRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by catalog adapters.
pub type CatalogPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed catalog repository.
#[derive(Debug, Clone)]
pub struct PostgresCatalogRepository {
    pool: CatalogPgPool,
}

impl PostgresCatalogRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: CatalogPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> CatalogRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> CatalogRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(CatalogRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(CatalogRepositoryError::persistence)?
    }
}

type SummaryRow = (PractitionerRow, Option<String>);

#[async_trait]
impl CatalogRepository for PostgresCatalogRepository {
    async fn store_role(&self, role: &PractitionerRole) -> CatalogRepositoryResult<()> {
        let name = role.name().clone();
        let row = PractitionerRoleRow {
            id: role.id().into_inner(),
            name: name.as_str().to_owned(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(practitioner_roles::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_name_conflict(err, &name))?;
            Ok(())
        })
        .await
    }

    async fn store_gira_type(&self, gira_type: &GiraType) -> CatalogRepositoryResult<()> {
        let name = gira_type.name().clone();
        let row = GiraTypeRow {
            id: gira_type.id().into_inner(),
            name: name.as_str().to_owned(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(gira_types::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_name_conflict(err, &name))?;
            Ok(())
        })
        .await
    }

    async fn store_practitioner(&self, practitioner: &Practitioner) -> CatalogRepositoryResult<()> {
        let row = to_practitioner_row(practitioner);
        self.run_blocking(move |connection| {
            diesel::insert_into(practitioners::table)
                .values(&row)
                .execute(connection)
                .map_err(CatalogRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn update_practitioner(
        &self,
        practitioner: &Practitioner,
    ) -> CatalogRepositoryResult<()> {
        let practitioner_id = practitioner.id();
        let row = to_practitioner_row(practitioner);
        self.run_blocking(move |connection| {
            let updated = diesel::update(practitioners::table.find(row.id))
                .set((
                    practitioners::name.eq(&row.name),
                    practitioners::role_id.eq(row.role_id),
                    practitioners::active.eq(row.active),
                ))
                .execute(connection)
                .map_err(CatalogRepositoryError::persistence)?;
            if updated == 0 {
                return Err(CatalogRepositoryError::PractitionerNotFound(
                    practitioner_id,
                ));
            }
            Ok(())
        })
        .await
    }

    async fn find_role(
        &self,
        id: PractitionerRoleId,
    ) -> CatalogRepositoryResult<Option<PractitionerRole>> {
        self.run_blocking(move |connection| {
            let row = practitioner_roles::table
                .find(id.into_inner())
                .select(PractitionerRoleRow::as_select())
                .first(connection)
                .optional()
                .map_err(CatalogRepositoryError::persistence)?;
            row.map(row_to_role).transpose()
        })
        .await
    }

    async fn find_role_by_name(
        &self,
        name: &CatalogName,
    ) -> CatalogRepositoryResult<Option<PractitionerRole>> {
        let lookup = name.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = practitioner_roles::table
                .filter(practitioner_roles::name.eq(&lookup))
                .select(PractitionerRoleRow::as_select())
                .first(connection)
                .optional()
                .map_err(CatalogRepositoryError::persistence)?;
            row.map(row_to_role).transpose()
        })
        .await
    }

    async fn find_gira_type(&self, id: GiraTypeId) -> CatalogRepositoryResult<Option<GiraType>> {
        self.run_blocking(move |connection| {
            let row = gira_types::table
                .find(id.into_inner())
                .select(GiraTypeRow::as_select())
                .first(connection)
                .optional()
                .map_err(CatalogRepositoryError::persistence)?;
            row.map(row_to_gira_type).transpose()
        })
        .await
    }

    async fn find_gira_type_by_name(
        &self,
        name: &CatalogName,
    ) -> CatalogRepositoryResult<Option<GiraType>> {
        let lookup = name.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = gira_types::table
                .filter(gira_types::name.eq(&lookup))
                .select(GiraTypeRow::as_select())
                .first(connection)
                .optional()
                .map_err(CatalogRepositoryError::persistence)?;
            row.map(row_to_gira_type).transpose()
        })
        .await
    }

    async fn find_practitioner(
        &self,
        id: PractitionerId,
    ) -> CatalogRepositoryResult<Option<Practitioner>> {
        self.run_blocking(move |connection| {
            let row = practitioners::table
                .find(id.into_inner())
                .select(PractitionerRow::as_select())
                .first(connection)
                .optional()
                .map_err(CatalogRepositoryError::persistence)?;
            row.map(row_to_practitioner).transpose()
        })
        .await
    }

    async fn list_roles(&self) -> CatalogRepositoryResult<Vec<PractitionerRole>> {
        self.run_blocking(move |connection| {
            practitioner_roles::table
                .order(practitioner_roles::name.asc())
                .select(PractitionerRoleRow::as_select())
                .load(connection)
                .map_err(CatalogRepositoryError::persistence)?
                .into_iter()
                .map(row_to_role)
                .collect()
        })
        .await
    }

    async fn list_gira_types(&self) -> CatalogRepositoryResult<Vec<GiraType>> {
        self.run_blocking(move |connection| {
            gira_types::table
                .order(gira_types::name.asc())
                .select(GiraTypeRow::as_select())
                .load(connection)
                .map_err(CatalogRepositoryError::persistence)?
                .into_iter()
                .map(row_to_gira_type)
                .collect()
        })
        .await
    }

    async fn list_practitioners(&self) -> CatalogRepositoryResult<Vec<PractitionerSummary>> {
        self.run_blocking(move |connection| {
            practitioners::table
                .left_join(practitioner_roles::table)
                .filter(practitioners::active.eq(true))
                .order((practitioners::name.asc(), practitioners::id.asc()))
                .select((
                    PractitionerRow::as_select(),
                    practitioner_roles::name.nullable(),
                ))
                .load::<SummaryRow>(connection)
                .map_err(CatalogRepositoryError::persistence)?
                .into_iter()
                .map(row_to_summary)
                .collect()
        })
        .await
    }

    async fn find_practitioners(
        &self,
        ids: &[PractitionerId],
    ) -> CatalogRepositoryResult<Vec<PractitionerSummary>> {
        let uuids: Vec<uuid::Uuid> = ids
            .iter()
            .copied()
            .map(PractitionerId::into_inner)
            .collect();
        self.run_blocking(move |connection| {
            practitioners::table
                .left_join(practitioner_roles::table)
                .filter(practitioners::id.eq_any(uuids))
                .order((practitioners::name.asc(), practitioners::id.asc()))
                .select((
                    PractitionerRow::as_select(),
                    practitioner_roles::name.nullable(),
                ))
                .load::<SummaryRow>(connection)
                .map_err(CatalogRepositoryError::persistence)?
                .into_iter()
                .map(row_to_summary)
                .collect()
        })
        .await
    }
}

fn map_name_conflict(err: DieselError, name: &CatalogName) -> CatalogRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if info
                .constraint_name()
                .is_some_and(|constraint| constraint.ends_with("_name")) =>
        {
            CatalogRepositoryError::DuplicateName(name.clone())
        }
        _ => CatalogRepositoryError::persistence(err),
    }
}

fn to_practitioner_row(practitioner: &Practitioner) -> PractitionerRow {
    PractitionerRow {
        id: practitioner.id().into_inner(),
        name: practitioner.name().as_str().to_owned(),
        role_id: practitioner.role_id().map(PractitionerRoleId::into_inner),
        active: practitioner.is_active(),
        created_at: practitioner.created_at(),
    }
}

fn parse_name(value: String) -> CatalogRepositoryResult<CatalogName> {
    CatalogName::new(value).map_err(CatalogRepositoryError::persistence)
}

fn row_to_role(row: PractitionerRoleRow) -> CatalogRepositoryResult<PractitionerRole> {
    Ok(PractitionerRole::from_persisted(
        PractitionerRoleId::from_uuid(row.id),
        parse_name(row.name)?,
    ))
}

fn row_to_gira_type(row: GiraTypeRow) -> CatalogRepositoryResult<GiraType> {
    Ok(GiraType::from_persisted(
        GiraTypeId::from_uuid(row.id),
        parse_name(row.name)?,
    ))
}

fn row_to_practitioner(row: PractitionerRow) -> CatalogRepositoryResult<Practitioner> {
    let PractitionerRow {
        id,
        name,
        role_id,
        active,
        created_at,
    } = row;

    Ok(Practitioner::from_persisted(PersistedPractitionerData {
        id: PractitionerId::from_uuid(id),
        name: parse_name(name)?,
        role_id: role_id.map(PractitionerRoleId::from_uuid),
        active,
        created_at,
    }))
}

fn row_to_summary((row, role_name): SummaryRow) -> CatalogRepositoryResult<PractitionerSummary> {
    Ok(PractitionerSummary {
        id: PractitionerId::from_uuid(row.id),
        name: parse_name(row.name)?,
        role_name: role_name.map(parse_name).transpose()?,
        active: row.active,
    })
}
