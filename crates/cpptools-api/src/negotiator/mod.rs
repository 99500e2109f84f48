//! Version negotiation against whichever shape the host exports.
//!
//! The negotiator locates the host, activates it when needed, classifies its
//! exports and resolves a handle for the requested [`ProtocolVersion`]. Host
//! absence, activation faults, unknown shapes and downgrades all end in a
//! diagnostic plus either absence or a lower-version handle. Only a fault on
//! the pinned fallback retry propagates as an error.

mod family;
mod handle;
mod settings;

use std::fmt;
use std::sync::Arc;

use cpptools_contract::{CppToolsApi, EmptyExports, ExtensionExports, ProtocolVersion};
use tracing::debug;

use crate::diagnostics::{DiagnosticSink, NegotiationDiagnostic, TracingSink};
use crate::errors::NegotiationError;
use crate::registry::ExtensionRegistry;

pub use family::{ApiFamily, HostShape, PrimaryApi, ShapeKind, TestApi, classify};
pub use handle::{ApiHandle, ResolvedApi, TestApiHandle};
pub use settings::{NegotiatorSettings, RANGE_FAULT_FALLBACK};

/// Runs a fallible step whose failure is not the caller's concern.
///
/// On error, `recover` observes the error and the step yields `None`.
#[must_use]
pub fn attempt<T, E>(result: Result<T, E>, recover: impl FnOnce(E)) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            recover(error);
            None
        }
    }
}

/// Resolves host API handles from an [`ExtensionRegistry`].
///
/// # Example
///
/// ```
/// use cpptools_api::{Negotiator, StaticRegistry};
/// use cpptools_contract::ProtocolVersion;
///
/// # async fn demo() -> Result<(), cpptools_api::NegotiationError> {
/// let negotiator = Negotiator::new(StaticRegistry::new());
/// let handle = negotiator.resolve(ProtocolVersion::LATEST).await?;
/// assert!(handle.is_none());
/// # Ok(())
/// # }
/// ```
pub struct Negotiator<R> {
    registry: R,
    settings: NegotiatorSettings,
    sink: Arc<dyn DiagnosticSink>,
}

impl<R: ExtensionRegistry> Negotiator<R> {
    /// Builds a negotiator with default settings that logs diagnostics
    /// through `tracing`.
    #[must_use]
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            settings: NegotiatorSettings::default(),
            sink: Arc::new(TracingSink),
        }
    }

    /// Replaces the settings.
    #[must_use]
    pub fn with_settings(mut self, settings: NegotiatorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replaces the diagnostic sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Settings in effect.
    #[must_use]
    pub const fn settings(&self) -> &NegotiatorSettings {
        &self.settings
    }

    /// Resolves the provider-facing API at `requested`.
    ///
    /// Returns `Ok(None)` when no usable handle exists; the reason has been
    /// emitted as a diagnostic.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::FallbackRejected`] when the host raises a
    /// version range fault and then rejects the pinned v1 retry.
    pub async fn resolve(
        &self,
        requested: ProtocolVersion,
    ) -> Result<Option<ApiHandle>, NegotiationError> {
        self.negotiate::<PrimaryApi>(requested).await
    }

    /// Resolves the test API at `requested`.
    ///
    /// # Errors
    ///
    /// As for [`Negotiator::resolve`].
    pub async fn resolve_test(
        &self,
        requested: ProtocolVersion,
    ) -> Result<Option<TestApiHandle>, NegotiationError> {
        self.negotiate::<TestApi>(requested).await
    }

    async fn negotiate<F: ApiFamily>(
        &self,
        requested: ProtocolVersion,
    ) -> Result<Option<ResolvedApi<F::Api>>, NegotiationError> {
        let Some(exports) = self.obtain_exports().await else {
            return Ok(None);
        };

        match classify::<F>(exports.as_ref()) {
            HostShape::VersionedFactory(factory) => {
                self.request_versioned::<F>(factory.as_ref(), requested)
            }
            HostShape::Legacy(api) => {
                if requested != ProtocolVersion::V0 {
                    self.sink
                        .emit(&NegotiationDiagnostic::LegacyDowngrade { requested });
                }
                Ok(Some(ResolvedApi::new(
                    api,
                    requested,
                    ProtocolVersion::V0,
                    ShapeKind::Legacy,
                )))
            }
            HostShape::Unrecognized => {
                self.sink.emit(&NegotiationDiagnostic::UnrecognizedHost {
                    extension_id: self.settings.host_extension_id().to_owned(),
                    family: F::LABEL,
                });
                Ok(None)
            }
        }
    }

    async fn obtain_exports(&self) -> Option<Arc<dyn ExtensionExports>> {
        let extension_id = self.settings.host_extension_id();
        let Some(host) = self.registry.get_extension(extension_id) else {
            self.sink.emit(&NegotiationDiagnostic::HostNotInstalled {
                extension_id: extension_id.to_owned(),
            });
            return None;
        };

        let exports = if host.is_active() {
            host.exports()
        } else {
            attempt(host.activate().await, |error| {
                debug!(
                    target: "cpptools_api",
                    extension_id,
                    error = %error,
                    "host activation failed"
                );
            })
        };
        Some(exports.unwrap_or_else(|| Arc::new(EmptyExports)))
    }

    fn request_versioned<F: ApiFamily>(
        &self,
        factory: &F::Factory,
        requested: ProtocolVersion,
    ) -> Result<Option<ResolvedApi<F::Api>>, NegotiationError> {
        let api = match F::request(factory, requested) {
            Ok(api) => api,
            Err(fault) if self.settings.is_range_fault(&fault) => {
                debug!(
                    target: "cpptools_api",
                    %requested,
                    fallback = %RANGE_FAULT_FALLBACK,
                    fault = %fault,
                    "host rejected the version range, retrying"
                );
                F::request(factory, RANGE_FAULT_FALLBACK).map_err(|source| {
                    NegotiationError::FallbackRejected {
                        requested,
                        fallback: RANGE_FAULT_FALLBACK,
                        source,
                    }
                })?
            }
            Err(fault) => {
                self.sink.emit(&NegotiationDiagnostic::HostFaulted {
                    requested,
                    message: fault.message().to_owned(),
                });
                return Ok(None);
            }
        };

        let effective = self.effective_version(api.version(), requested);
        Ok(Some(ResolvedApi::new(
            api,
            requested,
            effective,
            ShapeKind::VersionedFactory,
        )))
    }

    /// Settles the version a served object speaks and reports any caveat.
    ///
    /// Objects without a version query predate v2 and are taken to speak the
    /// requested version capped at v1. Every request other than v1 against
    /// such an object is reported, as a downgrade when the cap applies.
    fn effective_version(
        &self,
        reported: Option<ProtocolVersion>,
        requested: ProtocolVersion,
    ) -> ProtocolVersion {
        let effective = reported.unwrap_or_else(|| requested.min(RANGE_FAULT_FALLBACK));
        if effective < requested {
            self.sink.emit(&NegotiationDiagnostic::VersionDowngrade {
                requested,
                effective,
            });
        } else if reported.is_none() && requested != RANGE_FAULT_FALLBACK {
            self.sink.emit(&NegotiationDiagnostic::VersionUnreported {
                requested,
                effective,
            });
        }
        effective
    }
}

impl<R> fmt::Debug for Negotiator<R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Negotiator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Resolves the provider-facing API from `registry` with default settings.
///
/// # Errors
///
/// As for [`Negotiator::resolve`].
pub async fn get_cpptools_api<R: ExtensionRegistry>(
    registry: R,
    requested: ProtocolVersion,
) -> Result<Option<ApiHandle>, NegotiationError> {
    Negotiator::new(registry).resolve(requested).await
}

/// Resolves the test API from `registry` with default settings.
///
/// # Errors
///
/// As for [`Negotiator::resolve`].
pub async fn get_cpptools_test_api<R: ExtensionRegistry>(
    registry: R,
    requested: ProtocolVersion,
) -> Result<Option<TestApiHandle>, NegotiationError> {
    Negotiator::new(registry).resolve_test(requested).await
}
