//! Layered configuration for the cpptools API negotiator.
//!
//! Values are merged by `ortho_config` from defaults, an optional TOML file,
//! `CPPTOOLS_API_*` environment variables and command-line flags, in that
//! order of precedence. The negotiator only reads the host identity and the
//! range-fault prefix; the logging fields feed the opt-in telemetry
//! initialiser.

mod defaults;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_HOST_EXTENSION_ID, DEFAULT_LOG_FILTER, DEFAULT_RANGE_FAULT_PREFIX,
    default_host_extension_id, default_log_filter, default_log_filter_string, default_log_format,
    default_range_fault_prefix,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Settings shared by embedders of the negotiator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "CPPTOOLS_API")]
pub struct Config {
    /// Identity of the host extension in the platform registry.
    #[ortho_config(default = defaults::default_host_extension_id())]
    pub host_extension_id: String,
    /// Message prefix identifying the host's version range fault.
    #[ortho_config(default = defaults::default_range_fault_prefix())]
    pub range_fault_prefix: String,
    /// Filter expression applied to emitted log events.
    #[ortho_config(default = defaults::default_log_filter_string())]
    pub log_filter: String,
    /// Output format for emitted log events.
    #[ortho_config(default = defaults::default_log_format())]
    pub log_format: LogFormat,
}

impl Config {
    /// Identity of the host extension in the platform registry.
    #[must_use]
    pub fn host_extension_id(&self) -> &str {
        self.host_extension_id.as_str()
    }

    /// Message prefix identifying the host's version range fault.
    #[must_use]
    pub fn range_fault_prefix(&self) -> &str {
        self.range_fault_prefix.as_str()
    }

    /// Filter expression applied to emitted log events.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Output format for emitted log events.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host_extension_id: default_host_extension_id(),
            range_fault_prefix: default_range_fault_prefix(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}
