//! `PostgreSQL` repository implementation for user accounts.

use super::{
    models::{NewUserAccountRow, UserAccountRow},
    schema::user_accounts,
};
use crate::identity::{
    domain::{
        AccessRole, EmailAddress, PasswordHash, PersistedUserAccountData, UserAccount, UserId,
    },
    ports::{UserAccountRepository, UserAccountRepositoryError, UserAccountRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by identity adapters.
pub type IdentityPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed user account repository.
#[derive(Debug, Clone)]
pub struct PostgresUserAccountRepository {
    pool: IdentityPgPool,
}

impl PostgresUserAccountRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: IdentityPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserAccountRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserAccountRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(UserAccountRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserAccountRepositoryError::persistence)?
    }
}

#[async_trait]
impl UserAccountRepository for PostgresUserAccountRepository {
    async fn store(&self, account: &UserAccount) -> UserAccountRepositoryResult<()> {
        let account_id = account.id();
        let email = account.email().clone();
        let new_row = to_new_row(account);

        self.run_blocking(move |connection| {
            diesel::insert_into(user_accounts::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_email_unique_violation(info.as_ref()) =>
                    {
                        UserAccountRepositoryError::DuplicateEmail(email.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        UserAccountRepositoryError::DuplicateAccount(account_id)
                    }
                    _ => UserAccountRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserAccountRepositoryResult<Option<UserAccount>> {
        self.run_blocking(move |connection| {
            let row = user_accounts::table
                .filter(user_accounts::id.eq(id.into_inner()))
                .select(UserAccountRow::as_select())
                .first::<UserAccountRow>(connection)
                .optional()
                .map_err(UserAccountRepositoryError::persistence)?;
            row.map(row_to_account).transpose()
        })
        .await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> UserAccountRepositoryResult<Option<UserAccount>> {
        let email_str = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = user_accounts::table
                .filter(user_accounts::email.eq(&email_str))
                .select(UserAccountRow::as_select())
                .first::<UserAccountRow>(connection)
                .optional()
                .map_err(UserAccountRepositoryError::persistence)?;
            row.map(row_to_account).transpose()
        })
        .await
    }

    async fn count(&self) -> UserAccountRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let total: i64 = user_accounts::table
                .count()
                .get_result(connection)
                .map_err(UserAccountRepositoryError::persistence)?;
            u64::try_from(total).map_err(UserAccountRepositoryError::persistence)
        })
        .await
    }
}

fn to_new_row(account: &UserAccount) -> NewUserAccountRow {
    NewUserAccountRow {
        id: account.id().into_inner(),
        name: account.name().to_owned(),
        email: account.email().as_str().to_owned(),
        password_hash: account.password_hash().as_str().to_owned(),
        role: account.role().as_str().to_owned(),
        active: account.is_active(),
        created_at: account.created_at(),
    }
}

fn row_to_account(row: UserAccountRow) -> UserAccountRepositoryResult<UserAccount> {
    let UserAccountRow {
        id,
        name,
        email,
        password_hash,
        role,
        active,
        created_at,
    } = row;

    let parsed_email = EmailAddress::new(email).map_err(UserAccountRepositoryError::persistence)?;
    let parsed_role =
        AccessRole::try_from(role.as_str()).map_err(UserAccountRepositoryError::persistence)?;

    Ok(UserAccount::from_persisted(PersistedUserAccountData {
        id: UserId::from_uuid(id),
        name,
        email: parsed_email,
        password_hash: PasswordHash::from_phc(password_hash),
        role: parsed_role,
        active,
        created_at,
    }))
}

fn is_email_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "uq_user_accounts_email")
}
