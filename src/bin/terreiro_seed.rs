//! Prepares a `PostgreSQL` database for Terreiro.
//!
//! Usage:
//!
//! ```text
//! terreiro-seed [settings.toml]
//! ```
//!
//! Applies the schema, creates the default practitioner roles and gira
//! types, and creates the first administrator when `[admin]` (or the
//! `TERREIRO_ADMIN_*` variables) is configured. Every step is safe to
//! repeat.

use mockable::DefaultClock;
use std::path::PathBuf;
use std::sync::Arc;
use terreiro::catalog::{
    adapters::postgres::PostgresCatalogRepository,
    services::{CatalogService, CatalogServiceError},
};
use terreiro::config::{ConfigError, Settings};
use terreiro::identity::{
    adapters::postgres::PostgresUserAccountRepository,
    services::{AuthService, AuthServiceError, CreateUserRequest, TokenError},
};
use terreiro::storage::{self, StorageError};
use terreiro::telemetry::{self, TelemetryError};
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::{error, info};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
enum SeedError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Catalog(#[from] CatalogServiceError),
    #[error(transparent)]
    Auth(#[from] AuthServiceError),
    #[error("failed to build runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

fn main() -> Result<(), BoxError> {
    let path = settings_path(std::env::args_os().skip(1))?;
    let settings = Settings::load(path.as_deref())?;
    telemetry::init(&settings.logging)?;

    run(&settings).map_err(|err| {
        error!(error = %err, "seeding failed");
        err.into()
    })
}

fn settings_path(
    mut args: impl Iterator<Item = std::ffi::OsString>,
) -> Result<Option<PathBuf>, SeedError> {
    let path = args.next().map(PathBuf::from);
    if args.next().is_some() {
        return Err(SeedError::InvalidArgs(
            "expected at most one settings path".to_owned(),
        ));
    }
    Ok(path)
}

fn run(settings: &Settings) -> Result<(), SeedError> {
    let pool = storage::connect(&settings.database)?;
    storage::apply_schema(&pool)?;

    let clock = Arc::new(DefaultClock);
    let catalog = CatalogService::new(
        Arc::new(PostgresCatalogRepository::new(pool.clone())),
        Arc::clone(&clock),
    );
    let auth = AuthService::new(
        Arc::new(PostgresUserAccountRepository::new(pool)),
        clock,
        settings.auth.token_codec()?,
    );

    let runtime = Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(async {
        let report = catalog.seed_defaults().await?;
        info!(
            roles_created = report.roles_created,
            gira_types_created = report.gira_types_created,
            "catalog ready"
        );

        let Some(admin) = &settings.admin else {
            info!("no admin configured; skipping bootstrap");
            return Ok(());
        };
        let request = CreateUserRequest::new(&admin.name, &admin.email, &admin.password);
        match auth.bootstrap_admin(request).await {
            Ok(account) => info!(user_id = %account.id(), "created first administrator"),
            Err(AuthServiceError::AlreadyBootstrapped) => {
                info!("accounts already exist; admin bootstrap skipped");
            }
            Err(err) => return Err(err.into()),
        }
        Ok(())
    })
}
