//! Runtime settings loaded from TOML with `TERREIRO_*` overrides.
//!
//! Every field has a default, so an empty file (or no file) yields a
//! working configuration once a token secret is supplied. Values are
//! validated after overrides are applied.

use crate::gira::{
    domain::{AssignmentPolicy, EnqueueGuard},
    services::{DEFAULT_POLL_INTERVAL, QueuePolicy},
};
use crate::identity::services::{
    DEFAULT_TOKEN_TTL_HOURS, MAX_TOKEN_TTL_HOURS, TokenCodec, TokenError,
};
use chrono::TimeDelta;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "TERREIRO_";

const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_LOG_FILTER: &str = "info";

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Read {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for [`Settings`].
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidOverride {
        /// Environment variable name.
        key: String,
        /// Raw value found.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No token secret was configured.
    #[error("auth.token_secret must be set (or TERREIRO_TOKEN_SECRET)")]
    MissingTokenSecret,

    /// The token lifetime is zero or negative.
    #[error("auth.token_ttl_hours must be positive, got {0}")]
    NonPositiveTokenTtl(i64),

    /// The token lifetime is longer than the codec accepts.
    #[error(
        "auth.token_ttl_hours must be at most {max}, got {0}",
        max = MAX_TOKEN_TTL_HOURS
    )]
    TokenTtlTooLong(i64),

    /// The queue poll interval is zero.
    #[error("queue.poll_interval_seconds must be positive")]
    ZeroPollInterval,

    /// The connection pool would be empty.
    #[error("database.pool_size must be positive")]
    ZeroPoolSize,
}

/// Token signing settings.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthSettings {
    /// HMAC secret for session tokens.
    pub token_secret: String,
    /// Session token lifetime in hours.
    pub token_ttl_hours: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token_secret: String::new(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        }
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("token_secret", &"<redacted>")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .finish()
    }
}

impl AuthSettings {
    /// Builds the token codec these settings describe.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError`] for an empty secret or a lifetime outside
    /// `1..=MAX_TOKEN_TTL_HOURS`.
    pub fn token_codec(&self) -> Result<TokenCodec, TokenError> {
        let hours = self.token_ttl_hours;
        let ttl = TimeDelta::try_hours(hours).ok_or(if hours <= 0 {
            TokenError::NonPositiveTtl
        } else {
            TokenError::TtlTooLong
        })?;
        TokenCodec::new(self.token_secret.as_bytes(), ttl)
    }
}

/// Queue behaviour settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueSettings {
    /// Which entries may be (re)assigned.
    pub assignment_policy: AssignmentPolicy,
    /// Whether closed giras accept new entries.
    pub enqueue_guard: EnqueueGuard,
    /// Seconds between dashboard queue reads.
    pub poll_interval_seconds: u64,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            assignment_policy: AssignmentPolicy::default(),
            enqueue_guard: EnqueueGuard::default(),
            poll_interval_seconds: DEFAULT_POLL_INTERVAL.as_secs(),
        }
    }
}

impl QueueSettings {
    /// Returns the queue policy these settings describe.
    #[must_use]
    pub const fn policy(&self) -> QueuePolicy {
        QueuePolicy {
            assignment: self.assignment_policy,
            enqueue_guard: self.enqueue_guard,
        }
    }

    /// Returns the poll interval.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }
}

/// `PostgreSQL` connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseSettings {
    /// Connection URL. `None` selects the in-memory stores.
    pub url: Option<String>,
    /// Maximum pooled connections.
    pub pool_size: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `terreiro=debug`.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

/// First administrator created by `terreiro-seed`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminSettings {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Initial password.
    pub password: String,
}

impl fmt::Debug for AdminSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSettings")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// All runtime settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Token signing.
    pub auth: AuthSettings,
    /// Queue behaviour.
    pub queue: QueueSettings,
    /// Persistence.
    pub database: DatabaseSettings,
    /// Log output.
    pub logging: LoggingSettings,
    /// Optional first administrator.
    pub admin: Option<AdminSettings>,
}

impl Settings {
    /// Loads settings from an optional TOML file and the process
    /// environment, then validates them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, an
    /// override is malformed, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = path.map_or_else(|| Ok(Self::default()), Self::from_file)?;
        let settings = base.with_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a TOML file without applying overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML or unknown keys.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Applies `TERREIRO_*` overrides read through `lookup`.
    ///
    /// The admin account is only overridden when name, email, and password
    /// are all present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] for values that do not
    /// parse.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let env = |suffix: &str| {
            let key = format!("{ENV_PREFIX}{suffix}");
            lookup(&key).map(|value| (key, value))
        };

        if let Some((_, value)) = env("TOKEN_SECRET") {
            self.auth.token_secret = value;
        }
        if let Some((key, value)) = env("TOKEN_TTL_HOURS") {
            self.auth.token_ttl_hours = parse_override(key, value, str::parse::<i64>)?;
        }
        if let Some((key, value)) = env("ASSIGNMENT_POLICY") {
            self.queue.assignment_policy =
                parse_override(key, value, |raw| AssignmentPolicy::try_from(raw))?;
        }
        if let Some((key, value)) = env("ENQUEUE_GUARD") {
            self.queue.enqueue_guard =
                parse_override(key, value, |raw| EnqueueGuard::try_from(raw))?;
        }
        if let Some((key, value)) = env("POLL_INTERVAL_SECONDS") {
            self.queue.poll_interval_seconds = parse_override(key, value, str::parse::<u64>)?;
        }
        if let Some((_, value)) = env("DATABASE_URL") {
            self.database.url = Some(value);
        }
        if let Some((key, value)) = env("DATABASE_POOL_SIZE") {
            self.database.pool_size = parse_override(key, value, str::parse::<u32>)?;
        }
        if let Some((_, value)) = env("LOG") {
            self.logging.filter = value;
        }
        if let (Some((_, name)), Some((_, email)), Some((_, password))) =
            (env("ADMIN_NAME"), env("ADMIN_EMAIL"), env("ADMIN_PASSWORD"))
        {
            self.admin = Some(AdminSettings {
                name,
                email,
                password,
            });
        }
        Ok(self)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.token_secret.trim().is_empty() {
            return Err(ConfigError::MissingTokenSecret);
        }
        if self.auth.token_ttl_hours <= 0 {
            return Err(ConfigError::NonPositiveTokenTtl(self.auth.token_ttl_hours));
        }
        if self.auth.token_ttl_hours > MAX_TOKEN_TTL_HOURS {
            return Err(ConfigError::TokenTtlTooLong(self.auth.token_ttl_hours));
        }
        if self.queue.poll_interval_seconds == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.database.pool_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        Ok(())
    }
}

fn parse_override<T, E: fmt::Display>(
    key: String,
    value: String,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Result<T, ConfigError> {
    parse(value.trim()).map_err(|err| ConfigError::InvalidOverride {
        key,
        reason: err.to_string(),
        value,
    })
}
