//! Host-facing API shapes across protocol revisions.
//!
//! A host exports one object graph, modelled by [`ExtensionExports`]. Which
//! historical shape it satisfies is discovered through capability predicates
//! rather than by probing for faults:
//!
//! - the versioned factory ([`CppToolsExtension`]), served from v1 onwards;
//! - the flat v0 object ([`LegacyCppToolsApi`]) exported by host release
//!   0.17.5, which has no factory at all.

use std::fmt;
use std::sync::Arc;

use crate::errors::HostFault;
use crate::provider::CustomConfigurationProvider;
use crate::test_hook::{CppToolsTestApi, CppToolsTestExtension};
use crate::version::ProtocolVersion;

/// The flat v0 API.
pub trait LegacyCppToolsApi: Send + Sync {
    /// Registers a provider so the host can request configurations from it.
    fn register_custom_configuration_provider(
        &self,
        provider: Arc<dyn CustomConfigurationProvider>,
    );

    /// Tells the host that the provider's configurations changed.
    fn did_change_custom_configuration(&self, provider: &dyn CustomConfigurationProvider);
}

/// Version-specific API served by the host from v1 onwards.
///
/// Operations added after v1 have no-op defaults, matching a host that does
/// not know about them.
pub trait CppToolsApi: Send + Sync {
    /// Version this object implements, or `None` for the v1 revision that
    /// predates the version query.
    fn version(&self) -> Option<ProtocolVersion> {
        None
    }

    /// Registers a provider so the host can request configurations from it.
    ///
    /// Must be called as soon as the provider is constructed.
    fn register_custom_configuration_provider(
        &self,
        provider: Arc<dyn CustomConfigurationProvider>,
    );

    /// Signals that a registered provider is ready to serve requests (v2).
    fn notify_ready(&self, _provider: &dyn CustomConfigurationProvider) {}

    /// Tells the host that the provider's file configurations changed.
    fn did_change_custom_configuration(&self, provider: &dyn CustomConfigurationProvider);

    /// Tells the host that the provider's browse configuration changed (v2).
    fn did_change_custom_browse_configuration(&self, _provider: &dyn CustomConfigurationProvider) {
    }

    /// Releases host-side state held for this API object.
    fn dispose(&self) {}
}

impl fmt::Debug for dyn CppToolsApi {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CppToolsApi")
            .field("version", &self.version())
            .finish()
    }
}

/// Versioned factory exported by hosts from v1 onwards.
pub trait CppToolsExtension: Send + Sync {
    /// Returns the API object for `version`.
    ///
    /// # Errors
    ///
    /// Hosts may reject versions they cannot serve with a [`HostFault`].
    /// Releases 0.17.6 to 0.18.1 do so for any version above v1.
    fn get_api(&self, version: ProtocolVersion) -> Result<Arc<dyn CppToolsApi>, HostFault>;
}

/// The object graph a host hands out on activation.
///
/// Each accessor is a capability predicate: it returns `None` when the
/// exported object does not have that shape.
pub trait ExtensionExports: Send + Sync {
    /// The versioned API factory.
    fn api_factory(&self) -> Option<Arc<dyn CppToolsExtension>> {
        None
    }

    /// The flat v0 API object.
    fn legacy_api(&self) -> Option<Arc<dyn LegacyCppToolsApi>> {
        None
    }

    /// The versioned test API factory.
    fn test_api_factory(&self) -> Option<Arc<dyn CppToolsTestExtension>> {
        None
    }

    /// A flat test API exposing the test-hook accessor directly.
    fn legacy_test_api(&self) -> Option<Arc<dyn CppToolsTestApi>> {
        None
    }
}

/// Exports with no recognisable shape.
///
/// Stands in for the object graph when activation yields nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyExports;

impl ExtensionExports for EmptyExports {}

/// Presents a flat v0 object through [`CppToolsApi`].
///
/// The adapter has no version query and treats the v2 notifications as
/// no-ops, exactly as a v0 host would.
#[derive(Clone)]
pub struct LegacyApiAdapter {
    inner: Arc<dyn LegacyCppToolsApi>,
}

impl LegacyApiAdapter {
    /// Wraps a flat v0 object.
    #[must_use]
    pub fn new(inner: Arc<dyn LegacyCppToolsApi>) -> Self {
        Self { inner }
    }
}

impl fmt::Debug for LegacyApiAdapter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("LegacyApiAdapter")
    }
}

impl CppToolsApi for LegacyApiAdapter {
    fn register_custom_configuration_provider(
        &self,
        provider: Arc<dyn CustomConfigurationProvider>,
    ) {
        self.inner.register_custom_configuration_provider(provider);
    }

    fn did_change_custom_configuration(&self, provider: &dyn CustomConfigurationProvider) {
        self.inner.did_change_custom_configuration(provider);
    }
}
