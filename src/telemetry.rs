//! Structured logging setup.

use crate::config::LoggingSettings;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the log subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive does not parse.
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// Directive that was rejected.
        filter: String,
        /// Parser message.
        reason: String,
    },

    /// Another global subscriber is already installed.
    #[error("log subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

/// Builds the filter described by `settings`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] for a malformed directive.
pub fn filter(settings: &LoggingSettings) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&settings.filter).map_err(|err| TelemetryError::InvalidFilter {
        filter: settings.filter.clone(),
        reason: err.to_string(),
    })
}

/// Installs the global `tracing` subscriber, writing to stderr.
///
/// # Errors
///
/// Returns [`TelemetryError`] for a malformed filter or when a subscriber
/// is already installed.
pub fn init(settings: &LoggingSettings) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(settings)?)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|err| TelemetryError::AlreadyInstalled(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("info")]
    #[case("terreiro=debug,diesel=warn")]
    fn valid_directives_build_a_filter(#[case] directive: &str) {
        let settings = LoggingSettings {
            filter: directive.to_owned(),
        };
        assert!(filter(&settings).is_ok());
    }

    #[rstest]
    fn malformed_directive_is_rejected() {
        let settings = LoggingSettings {
            filter: "terreiro=loudest".to_owned(),
        };
        assert!(matches!(
            filter(&settings),
            Err(TelemetryError::InvalidFilter { .. })
        ));
    }
}
