//! Shared configuration for OVSDB client processes.
//!
//! Configuration is layered by `ortho_config`: compiled defaults, then an
//! optional configuration file, then `OVSDB_*` environment variables, then
//! command-line flags. The resulting [`Config`] carries the logging settings
//! consumed by telemetry and the singleton-set encoding policy used when rows
//! are written back to the wire.

mod defaults;
mod encoding;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use self::defaults::{
    DEFAULT_LOG_FILTER, default_log_filter, default_log_filter_string, default_log_format,
    default_set_encoding,
};
pub use self::encoding::{SetEncoding, SetEncodingParseError};

/// Output format for the client's log records.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per record, with event fields flattened.
    #[default]
    Json,
    /// One terse text line per record.
    Compact,
}

/// Error returned when text names no [`LogFormat`].
pub type LogFormatParseError = strum::ParseError;

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "OVSDB")]
pub struct Config {
    /// `tracing` filter expression applied to the client's log output.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for log records.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Policy for writing one-element sets.
    #[ortho_config(default = default_set_encoding())]
    pub set_encoding: SetEncoding,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            set_encoding: default_set_encoding(),
        }
    }
}

impl Config {
    /// Filter expression handed to the tracing subscriber.
    #[must_use]
    pub const fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Output format for log records.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Policy for writing one-element sets.
    #[must_use]
    pub const fn set_encoding(&self) -> SetEncoding {
        self.set_encoding
    }
}
