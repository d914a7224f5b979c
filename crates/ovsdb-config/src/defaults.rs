use crate::LogFormat;
use crate::encoding::SetEncoding;

/// Default log filter: the client crates log at `info`, everything else
/// embedded in the same process at `warn`.
pub const DEFAULT_LOG_FILTER: &str = "warn,ovsdb_model=info,ovsdb_client=info";

/// Borrowed form of [`DEFAULT_LOG_FILTER`].
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned form of [`DEFAULT_LOG_FILTER`] for the configuration layer.
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default singleton-set encoding.
#[must_use]
pub const fn default_set_encoding() -> SetEncoding {
    SetEncoding::Collapse
}
