//! Resolved host handles.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use cpptools_contract::{
    CppToolsApi, CppToolsTestApi, CppToolsTestHook, CustomConfigurationProvider, ProtocolVersion,
};

use super::family::ShapeKind;

/// Handle to the provider-facing API.
pub type ApiHandle = ResolvedApi<dyn CppToolsApi>;

/// Handle to the test API.
pub type TestApiHandle = ResolvedApi<dyn CppToolsTestApi>;

/// Host API object together with the outcome of negotiating it.
///
/// Dereferences to the underlying API so host operations can be called
/// directly. Holders must call [`ResolvedApi::dispose`] when done.
pub struct ResolvedApi<A: ?Sized> {
    api: Arc<A>,
    requested: ProtocolVersion,
    effective: ProtocolVersion,
    shape: ShapeKind,
}

impl<A: ?Sized> ResolvedApi<A> {
    pub(crate) const fn new(
        api: Arc<A>,
        requested: ProtocolVersion,
        effective: ProtocolVersion,
        shape: ShapeKind,
    ) -> Self {
        Self {
            api,
            requested,
            effective,
            shape,
        }
    }

    /// Shared pointer to the host object.
    #[must_use]
    pub const fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Version the caller asked for.
    #[must_use]
    pub const fn requested(&self) -> ProtocolVersion {
        self.requested
    }

    /// Version the host is actually serving.
    #[must_use]
    pub const fn effective(&self) -> ProtocolVersion {
        self.effective
    }

    /// Whether the handle came from the versioned factory or the flat object.
    #[must_use]
    pub const fn shape(&self) -> ShapeKind {
        self.shape
    }

    /// Reports whether the host serves a lower version than requested.
    #[must_use]
    pub fn is_downgraded(&self) -> bool {
        self.effective < self.requested
    }
}

impl<A: ?Sized + CppToolsApi> ResolvedApi<A> {
    /// Version reported by the host object itself, if it can be queried.
    #[must_use]
    pub fn reported_version(&self) -> Option<ProtocolVersion> {
        self.api.version()
    }

    /// Registers `provider` and, on v2 or later, signals that it is ready.
    ///
    /// Registration always precedes the readiness signal.
    pub fn register_provider(&self, provider: &Arc<dyn CustomConfigurationProvider>) {
        self.api
            .register_custom_configuration_provider(Arc::clone(provider));
        if self.effective.at_least(ProtocolVersion::V2) {
            self.api.notify_ready(provider.as_ref());
        }
    }

    /// Releases host-side state held for this handle.
    pub fn dispose(&self) {
        self.api.dispose();
    }
}

impl TestApiHandle {
    /// Returns the hook test suites subscribe to.
    #[must_use]
    pub fn test_hook(&self) -> Arc<dyn CppToolsTestHook> {
        self.api.get_test_hook()
    }
}

impl<A: ?Sized> Deref for ResolvedApi<A> {
    type Target = A;

    fn deref(&self) -> &Self::Target {
        self.api.as_ref()
    }
}

impl<A: ?Sized> Clone for ResolvedApi<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            requested: self.requested,
            effective: self.effective,
            shape: self.shape,
        }
    }
}

impl<A: ?Sized> fmt::Debug for ResolvedApi<A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ResolvedApi")
            .field("requested", &self.requested)
            .field("effective", &self.effective)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}
