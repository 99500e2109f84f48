//! API families the negotiator can resolve, and how exports are classified
//! against them.

use std::fmt;
use std::sync::Arc;

use cpptools_contract::{
    CppToolsApi, CppToolsExtension, CppToolsTestApi, CppToolsTestExtension, ExtensionExports,
    HostFault, LegacyApiAdapter, ProtocolVersion,
};

/// A family of host APIs reachable through a versioned factory or a flat
/// legacy object.
///
/// The primary API and the test API share one negotiation procedure; each
/// family only says where its factory and flat object live in the exports.
pub trait ApiFamily {
    /// Handle type served by the host.
    type Api: ?Sized + CppToolsApi + 'static;
    /// Versioned factory serving [`Self::Api`].
    type Factory: ?Sized + 'static;

    /// Label used in diagnostics.
    const LABEL: &'static str;

    /// Returns the versioned factory when the exports provide one.
    fn factory(exports: &dyn ExtensionExports) -> Option<Arc<Self::Factory>>;

    /// Returns the flat legacy object when the exports provide one.
    fn legacy(exports: &dyn ExtensionExports) -> Option<Arc<Self::Api>>;

    /// Requests the handle for `version` from the factory.
    ///
    /// # Errors
    ///
    /// Propagates the host's fault unchanged.
    fn request(
        factory: &Self::Factory,
        version: ProtocolVersion,
    ) -> Result<Arc<Self::Api>, HostFault>;
}

/// The provider-facing API.
#[derive(Debug, Clone, Copy)]
pub enum PrimaryApi {}

impl ApiFamily for PrimaryApi {
    type Api = dyn CppToolsApi;
    type Factory = dyn CppToolsExtension;

    const LABEL: &'static str = "C/C++ API";

    fn factory(exports: &dyn ExtensionExports) -> Option<Arc<Self::Factory>> {
        exports.api_factory()
    }

    fn legacy(exports: &dyn ExtensionExports) -> Option<Arc<Self::Api>> {
        exports
            .legacy_api()
            .map(|flat| Arc::new(LegacyApiAdapter::new(flat)) as Arc<Self::Api>)
    }

    fn request(
        factory: &Self::Factory,
        version: ProtocolVersion,
    ) -> Result<Arc<Self::Api>, HostFault> {
        factory.get_api(version)
    }
}

/// The API variant exposing the test hook.
#[derive(Debug, Clone, Copy)]
pub enum TestApi {}

impl ApiFamily for TestApi {
    type Api = dyn CppToolsTestApi;
    type Factory = dyn CppToolsTestExtension;

    const LABEL: &'static str = "C/C++ test API";

    fn factory(exports: &dyn ExtensionExports) -> Option<Arc<Self::Factory>> {
        exports.test_api_factory()
    }

    fn legacy(exports: &dyn ExtensionExports) -> Option<Arc<Self::Api>> {
        exports.legacy_test_api()
    }

    fn request(
        factory: &Self::Factory,
        version: ProtocolVersion,
    ) -> Result<Arc<Self::Api>, HostFault> {
        factory.get_test_api(version)
    }
}

/// Shape a host's exports take for one API family.
pub enum HostShape<F: ?Sized, A: ?Sized> {
    /// The exports provide a versioned factory.
    VersionedFactory(Arc<F>),
    /// The exports provide only the flat v0 object.
    Legacy(Arc<A>),
    /// Neither shape is present.
    Unrecognized,
}

impl<F: ?Sized, A: ?Sized> HostShape<F, A> {
    /// Returns the data-free kind of this shape.
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::VersionedFactory(_) => ShapeKind::VersionedFactory,
            Self::Legacy(_) => ShapeKind::Legacy,
            Self::Unrecognized => ShapeKind::Unrecognized,
        }
    }
}

impl<F: ?Sized, A: ?Sized> fmt::Debug for HostShape<F, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.kind(), formatter)
    }
}

/// Kind of [`HostShape`], without the exported objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Resolved through the versioned factory.
    VersionedFactory,
    /// Resolved through the flat v0 object.
    Legacy,
    /// No recognised shape.
    Unrecognized,
}

/// Classifies `exports` for the family `F`.
///
/// Predicates run in priority order and the first match wins: a host that
/// exports both a factory and a flat object is treated as versioned.
#[must_use]
pub fn classify<F: ApiFamily>(exports: &dyn ExtensionExports) -> HostShape<F::Factory, F::Api> {
    F::factory(exports)
        .map(HostShape::VersionedFactory)
        .or_else(|| F::legacy(exports).map(HostShape::Legacy))
        .unwrap_or(HostShape::Unrecognized)
}
