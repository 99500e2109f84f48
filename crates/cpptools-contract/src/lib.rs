//! Capability contract between the C/C++ tooling host and configuration
//! providers.
//!
//! The crate describes, per [`ProtocolVersion`], what a third-party
//! extension promises to supply ([`CustomConfigurationProvider`] and the
//! [`SourceFileConfiguration`] / [`WorkspaceBrowseConfiguration`] payloads)
//! and what the host exposes in return ([`CppToolsApi`] and its historical
//! shapes). It carries no negotiation logic; `cpptools-api` resolves a
//! working handle against whichever shape a host actually exports.
//!
//! Every version is additive over the previous one. Payload validation
//! ([`SourceFileConfiguration::validate_for`]) rejects fields and vocabulary
//! values that a host at an older version would not understand.

mod api;
mod configuration;
mod errors;
mod provider;
mod test_hook;
mod version;
mod vocabulary;

#[cfg(test)]
mod tests;

pub use api::{
    CppToolsApi, CppToolsExtension, EmptyExports, ExtensionExports, LegacyApiAdapter,
    LegacyCppToolsApi,
};
pub use configuration::{
    PayloadField, SourceFileConfiguration, SourceFileConfigurationItem,
    WorkspaceBrowseConfiguration,
};
pub use errors::{ContractError, HostFault, HostFaultKind, ProviderError};
pub use provider::CustomConfigurationProvider;
pub use test_hook::{
    CppToolsTestApi, CppToolsTestExtension, CppToolsTestHook, DEFAULT_EVENT_CAPACITY,
    IntelliSenseStatus, Status, StatusEvents,
};
pub use tokio_util::sync::CancellationToken;
pub use url::Url;
pub use version::ProtocolVersion;
pub use vocabulary::{IntelliSenseMode, LanguageStandard};
