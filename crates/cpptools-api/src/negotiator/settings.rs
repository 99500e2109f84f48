//! Tunables read by the negotiator.

use cpptools_config::{Config, DEFAULT_HOST_EXTENSION_ID, DEFAULT_RANGE_FAULT_PREFIX};
use cpptools_contract::{HostFault, HostFaultKind, ProtocolVersion};

/// Version the single retry is pinned to after a version range fault.
pub const RANGE_FAULT_FALLBACK: ProtocolVersion = ProtocolVersion::V1;

/// Settings controlling host lookup and range fault detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiatorSettings {
    host_extension_id: String,
    range_fault_prefix: String,
}

impl NegotiatorSettings {
    /// Builds settings from explicit values.
    #[must_use]
    pub fn new(
        host_extension_id: impl Into<String>,
        range_fault_prefix: impl Into<String>,
    ) -> Self {
        Self {
            host_extension_id: host_extension_id.into(),
            range_fault_prefix: range_fault_prefix.into(),
        }
    }

    /// Reads the negotiator fields from layered configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.host_extension_id(), config.range_fault_prefix())
    }

    /// Identity of the host extension in the registry.
    #[must_use]
    pub fn host_extension_id(&self) -> &str {
        self.host_extension_id.as_str()
    }

    /// Message prefix that marks an unstructured range fault.
    #[must_use]
    pub fn range_fault_prefix(&self) -> &str {
        self.range_fault_prefix.as_str()
    }

    /// Reports whether `fault` is the host's version range fault.
    ///
    /// The structured kind wins. Faults from hosts that only carry a message
    /// are matched on the configured prefix; an empty prefix matches nothing.
    #[must_use]
    pub fn is_range_fault(&self, fault: &HostFault) -> bool {
        match fault.kind() {
            HostFaultKind::InvalidVersion => true,
            HostFaultKind::Unclassified => {
                !self.range_fault_prefix.is_empty()
                    && fault.message().starts_with(self.range_fault_prefix.as_str())
            }
        }
    }
}

impl Default for NegotiatorSettings {
    fn default() -> Self {
        Self::new(DEFAULT_HOST_EXTENSION_ID, DEFAULT_RANGE_FAULT_PREFIX)
    }
}

impl From<&Config> for NegotiatorSettings {
    fn from(config: &Config) -> Self {
        Self::from_config(config)
    }
}
