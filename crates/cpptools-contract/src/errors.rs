//! Error types shared by the contract surface.

use std::error::Error;
use std::fmt;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::configuration::PayloadField;
use crate::version::ProtocolVersion;
use crate::vocabulary::{IntelliSenseMode, LanguageStandard};

/// Errors raised while parsing or validating contract values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// An integer did not name a defined protocol version.
    #[error("protocol version {value} is not defined")]
    UnknownVersion {
        /// Rejected wire value.
        value: u8,
    },

    /// A textual version label could not be parsed.
    #[error("'{input}' is not a protocol version label")]
    InvalidVersion {
        /// Input that failed to parse.
        input: String,
    },

    /// An IntelliSense mode outside the closed vocabulary.
    #[error("unsupported IntelliSense mode '{input}'")]
    UnknownMode {
        /// Input that failed to parse.
        input: String,
    },

    /// A language standard outside the closed vocabulary.
    #[error("unsupported language standard '{input}'")]
    UnknownStandard {
        /// Input that failed to parse.
        input: String,
    },

    /// A status code outside the test-hook vocabulary.
    #[error("status code {value} is not defined")]
    UnknownStatus {
        /// Rejected wire value.
        value: u8,
    },

    /// Neither `compilerPath` nor the system defaults were supplied.
    #[error("{field} must carry the compiler defaults when compilerPath is absent")]
    MissingSystemDefaults {
        /// Field that should have held the defaults.
        field: PayloadField,
    },

    /// A populated field does not exist at the target version.
    #[error("{field} requires protocol {introduced}, but the target is {version}")]
    FieldUnavailable {
        /// Offending field.
        field: PayloadField,
        /// Version the payload is validated against.
        version: ProtocolVersion,
        /// Version that introduced the field.
        introduced: ProtocolVersion,
    },

    /// The IntelliSense mode is newer than the target version.
    #[error("IntelliSense mode '{mode}' is not available in protocol {version}")]
    ModeUnavailable {
        /// Offending mode.
        mode: IntelliSenseMode,
        /// Version the payload is validated against.
        version: ProtocolVersion,
    },

    /// The language standard is newer than the target version.
    #[error("language standard '{standard}' is not available in protocol {version}")]
    StandardUnavailable {
        /// Offending standard.
        standard: LanguageStandard,
        /// Version the payload is validated against.
        version: ProtocolVersion,
    },

    /// Browse configurations do not exist at the target version.
    #[error("browse configurations require protocol v2, but the target is {version}")]
    BrowseUnavailable {
        /// Version the payload is validated against.
        version: ProtocolVersion,
    },
}

/// Classification of a fault raised by a host factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostFaultKind {
    /// The host rejected the requested protocol version as out of range.
    InvalidVersion,
    /// The host did not classify the fault.
    Unclassified,
}

impl fmt::Display for HostFaultKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidVersion => "invalid version",
            Self::Unclassified => "unclassified",
        };
        formatter.write_str(label)
    }
}

/// Fault raised by a host while serving an API request.
///
/// Hosts built against this crate report version rejections with
/// [`HostFaultKind::InvalidVersion`]. Older hosts only produce a message, so
/// negotiators also recognise them by message prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HostFault {
    kind: HostFaultKind,
    message: String,
}

impl HostFault {
    /// Builds a fault with an explicit classification.
    #[must_use]
    pub fn new(kind: HostFaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Builds the range fault a host raises for a version it cannot serve.
    #[must_use]
    pub fn invalid_version(requested: ProtocolVersion) -> Self {
        Self::new(
            HostFaultKind::InvalidVersion,
            format!("Invalid version: {}", requested.as_u8()),
        )
    }

    /// Builds a fault carrying only a message.
    #[must_use]
    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::new(HostFaultKind::Unclassified, message)
    }

    /// Returns the fault classification.
    #[must_use]
    pub const fn kind(&self) -> HostFaultKind {
        self.kind
    }

    /// Human-readable description of the fault.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Errors returned by configuration provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The caller cancelled the request.
    #[error("request was cancelled")]
    Cancelled,

    /// The provider failed to service the request.
    #[error("{message}")]
    Failed {
        /// Human-readable description.
        message: String,
        /// Optional underlying error.
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },
}

impl ProviderError {
    /// Builds a failure without an underlying source.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            source: None,
        }
    }

    /// Builds a failure that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self::Failed {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns [`ProviderError::Cancelled`] when the token has fired.
    ///
    /// Providers call this between units of work to honour cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Cancelled`] if `token` is present and cancelled.
    pub fn check(token: Option<&CancellationToken>) -> Result<(), Self> {
        match token {
            Some(token) if token.is_cancelled() => Err(Self::Cancelled),
            _ => Ok(()),
        }
    }

    /// Whether the error reports a cancelled request.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
