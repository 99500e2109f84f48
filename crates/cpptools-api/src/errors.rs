//! Error types surfaced by host discovery and negotiation.

use std::error::Error;

use cpptools_contract::{HostFault, ProtocolVersion};
use thiserror::Error;

/// Fault raised by a host while activating.
///
/// Hosts may refuse activation while the platform shuts down. The negotiator
/// swallows these faults; they never reach the caller of `resolve`.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ActivationError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl ActivationError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-friendly description without the optional source.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Errors returned by negotiation.
///
/// Every other failure path resolves to absence plus a diagnostic.
#[derive(Debug, Error)]
pub enum NegotiationError {
    /// The host rejected the pinned fallback request issued after a version
    /// range fault.
    #[error("host rejected {requested} and the {fallback} fallback: {source}")]
    FallbackRejected {
        /// Version originally requested by the caller.
        requested: ProtocolVersion,
        /// Version the retry was pinned to.
        fallback: ProtocolVersion,
        /// Fault raised by the retry.
        #[source]
        source: HostFault,
    },
}

/// Errors raised by [`crate::StaticRegistry`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// An extension with the same identity is already registered.
    #[error("extension '{extension_id}' is already registered")]
    Duplicate {
        /// Identity that was registered twice.
        extension_id: String,
    },
}
