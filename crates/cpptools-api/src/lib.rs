//! Versioned handshake between configuration providers and the C/C++ tooling
//! host.
//!
//! A provider asks a [`Negotiator`] for the host API at the protocol version
//! it was written against. The negotiator finds the host in the platform's
//! [`ExtensionRegistry`], activates it, recognises which historical shape it
//! exports and returns an [`ApiHandle`] for the best version the host can
//! serve. Hosts that serve less than requested still yield a handle; the
//! caveat is reported through a [`DiagnosticSink`].
//!
//! ```
//! use std::sync::Arc;
//!
//! use cpptools_api::{ActiveExtension, StaticRegistry, get_cpptools_api};
//! use cpptools_contract::{EmptyExports, ProtocolVersion};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = StaticRegistry::new();
//! registry.register(Arc::new(ActiveExtension::new(
//!     "ms-vscode.cpptools",
//!     Arc::new(EmptyExports),
//! )))?;
//! // A host without a recognised shape resolves to no handle.
//! assert!(get_cpptools_api(&registry, ProtocolVersion::LATEST).await?.is_none());
//! # Ok(())
//! # }
//! ```

mod diagnostics;
mod errors;
mod negotiator;
mod registry;
pub mod telemetry;


pub use diagnostics::{DiagnosticKind, DiagnosticSink, NegotiationDiagnostic, TracingSink};
pub use errors::{ActivationError, NegotiationError, RegistryError};
pub use negotiator::{
    ApiFamily, ApiHandle, HostShape, Negotiator, NegotiatorSettings, PrimaryApi,
    RANGE_FAULT_FALLBACK, ResolvedApi, ShapeKind, TestApi, TestApiHandle, attempt, classify,
    get_cpptools_api, get_cpptools_test_api,
};
pub use registry::{ActiveExtension, ExtensionRegistry, HostExtension, StaticRegistry};
