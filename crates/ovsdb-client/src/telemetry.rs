//! Structured logging set-up for processes embedding the client.
//!
//! The client's own records use the `ovsdb_client::*` and `ovsdb_model::*`
//! targets, so a filter such as `ovsdb_client::rpc=debug` traces message
//! routing without raising the level of the host process.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use ovsdb_config::{Config, LogFormat};
use tracing::level_filters::LevelFilter;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Level applied to targets the configured filter does not mention.
const FALLBACK_LEVEL: LevelFilter = LevelFilter::WARN;

/// Proof that the global subscriber is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured filter expression does not parse.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Another global subscriber is already installed.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global tracing subscriber described by `config`.
///
/// Only the first call installs anything; later calls return a handle
/// without touching global state, even if their configuration differs.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for an invalid filter expression and
/// [`TelemetryError::Subscriber`] when a subscriber was installed by other
/// means.
///
/// # Examples
///
/// ```rust
/// use ovsdb_client::telemetry;
/// use ovsdb_config::Config;
///
/// # fn main() -> Result<(), ovsdb_client::telemetry::TelemetryError> {
/// let config = Config::default();
/// let _handle = telemetry::initialise(&config)?;
/// let _again = telemetry::initialise(&config)?;
/// # Ok(())
/// # }
/// ```
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(config))
        .map(|_| TelemetryHandle)
}

/// Parses the configured filter. An empty expression falls back to
/// [`FALLBACK_LEVEL`] for every target.
fn client_filter(config: &Config) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::builder()
        .with_default_directive(FALLBACK_LEVEL.into())
        .parse(config.log_filter())
        .map_err(|error| TelemetryError::Filter(error.to_string()))
}

fn install_subscriber(config: &Config) -> Result<(), TelemetryError> {
    let filter = client_filter(config)?;
    let ansi = io::stderr().is_terminal();

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.log_format() {
        LogFormat::Json => Box::new(
            fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_target(true)
                .json()
                .flatten_event(true)
                .with_span_list(false)
                .finish(),
        ),
        LogFormat::Compact => Box::new(
            fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_target(true)
                .with_ansi(ansi)
                .compact()
                .finish(),
        ),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn config_with(log_filter: &str) -> Config {
        Config {
            log_filter: log_filter.to_owned(),
            ..Config::default()
        }
    }

    #[test]
    fn default_filter_logs_client_records_at_info() {
        let filter = client_filter(&Config::default()).expect("default filter parses");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[rstest]
    #[case("", LevelFilter::WARN)]
    #[case("ovsdb_client::rpc=debug", LevelFilter::DEBUG)]
    #[case("error,ovsdb_model=trace", LevelFilter::TRACE)]
    fn filter_levels_follow_configuration(#[case] log_filter: &str, #[case] expected: LevelFilter) {
        let filter = client_filter(&config_with(log_filter)).expect("filter parses");
        assert_eq!(filter.max_level_hint(), Some(expected));
    }

    #[test]
    fn rejects_unparseable_filters() {
        let error = install_subscriber(&config_with("ovsdb_client=loud"))
            .expect_err("filter should not parse");
        assert!(matches!(error, TelemetryError::Filter(_)), "got {error}");
    }
}
