//! Human-readable warnings raised while negotiating.
//!
//! Diagnostics are observational. Emitting one never changes the outcome of
//! a negotiation.

use std::fmt;

use cpptools_contract::ProtocolVersion;
use tracing::warn;

/// Category of a [`NegotiationDiagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// See [`NegotiationDiagnostic::HostNotInstalled`].
    HostNotInstalled,
    /// See [`NegotiationDiagnostic::UnrecognizedHost`].
    UnrecognizedHost,
    /// See [`NegotiationDiagnostic::HostFaulted`].
    HostFaulted,
    /// See [`NegotiationDiagnostic::VersionDowngrade`].
    VersionDowngrade,
    /// See [`NegotiationDiagnostic::VersionUnreported`].
    VersionUnreported,
    /// See [`NegotiationDiagnostic::LegacyDowngrade`].
    LegacyDowngrade,
}

/// Warning surfaced to the user during negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiationDiagnostic {
    /// No extension is registered under the host identity.
    HostNotInstalled {
        /// Identity that was looked up.
        extension_id: String,
    },
    /// The host's exports match no known shape.
    UnrecognizedHost {
        /// Identity of the host.
        extension_id: String,
        /// API family that was requested.
        family: &'static str,
    },
    /// The host faulted on a request that was not a version range fault.
    HostFaulted {
        /// Version that was requested.
        requested: ProtocolVersion,
        /// Message carried by the fault.
        message: String,
    },
    /// The host served a different version from the one requested.
    VersionDowngrade {
        /// Version that was requested.
        requested: ProtocolVersion,
        /// Version actually served.
        effective: ProtocolVersion,
    },
    /// The served object has no version query, so its version is assumed.
    ///
    /// Raised when the assumption is not already reported as a downgrade.
    VersionUnreported {
        /// Version that was requested.
        requested: ProtocolVersion,
        /// Version assumed for the served object.
        effective: ProtocolVersion,
    },
    /// The host only exports the flat v0 shape.
    LegacyDowngrade {
        /// Version that was requested.
        requested: ProtocolVersion,
    },
}

impl NegotiationDiagnostic {
    /// Returns the category of the diagnostic.
    #[must_use]
    pub const fn kind(&self) -> DiagnosticKind {
        match self {
            Self::HostNotInstalled { .. } => DiagnosticKind::HostNotInstalled,
            Self::UnrecognizedHost { .. } => DiagnosticKind::UnrecognizedHost,
            Self::HostFaulted { .. } => DiagnosticKind::HostFaulted,
            Self::VersionDowngrade { .. } => DiagnosticKind::VersionDowngrade,
            Self::VersionUnreported { .. } => DiagnosticKind::VersionUnreported,
            Self::LegacyDowngrade { .. } => DiagnosticKind::LegacyDowngrade,
        }
    }
}

impl fmt::Display for NegotiationDiagnostic {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostNotInstalled { extension_id } => write!(
                formatter,
                "C/C++ extension is not installed (looked for '{extension_id}')"
            ),
            Self::UnrecognizedHost {
                extension_id,
                family,
            } => write!(
                formatter,
                "C/C++ extension '{extension_id}' does not export a recognised {family}"
            ),
            Self::HostFaulted { requested, message } => write!(
                formatter,
                "C/C++ extension failed to provide API {requested}: {message}"
            ),
            Self::VersionDowngrade {
                requested,
                effective,
            } => write!(
                formatter,
                "requested API {requested} but the C/C++ extension provided {effective}; \
                 an update may be required"
            ),
            Self::VersionUnreported {
                requested,
                effective,
            } => write!(
                formatter,
                "requested API {requested} but the C/C++ extension does not report its \
                 version; using {effective}"
            ),
            Self::LegacyDowngrade { requested } => write!(
                formatter,
                "requested API {requested} but the C/C++ extension only provides {}; \
                 an update may be required",
                ProtocolVersion::V0
            ),
        }
    }
}

/// Destination for negotiation diagnostics.
#[cfg_attr(test, mockall::automock)]
pub trait DiagnosticSink: Send + Sync {
    /// Records one diagnostic.
    fn emit(&self, diagnostic: &NegotiationDiagnostic);
}

/// Sink that forwards diagnostics to `tracing` at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &NegotiationDiagnostic) {
        warn!(
            target: "cpptools_api",
            kind = ?diagnostic.kind(),
            "{diagnostic}"
        );
    }
}
