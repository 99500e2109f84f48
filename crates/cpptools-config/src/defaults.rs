//! Default values shared by the configuration layers.

/// Identity the host extension is registered under.
pub const DEFAULT_HOST_EXTENSION_ID: &str = "ms-vscode.cpptools";

/// Message prefix of the range fault raised by host releases 0.17.6 to 0.18.1.
pub const DEFAULT_RANGE_FAULT_PREFIX: &str = "Invalid version";

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Owned host identity used where allocation is required (e.g. serde).
#[must_use]
pub fn default_host_extension_id() -> String {
    DEFAULT_HOST_EXTENSION_ID.to_owned()
}

/// Owned range fault prefix used where allocation is required.
#[must_use]
pub fn default_range_fault_prefix() -> String {
    DEFAULT_RANGE_FAULT_PREFIX.to_owned()
}

/// Default log filter expression.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required.
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Json
}
