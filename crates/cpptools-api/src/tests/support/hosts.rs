//! Simulated hosts covering every historical export shape.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cpptools_contract::{
    CancellationToken, CppToolsApi, CppToolsExtension, CppToolsTestApi, CppToolsTestExtension,
    CppToolsTestHook, CustomConfigurationProvider, ExtensionExports, HostFault,
    LegacyCppToolsApi, ProtocolVersion, ProviderError, SourceFileConfigurationItem, StatusEvents,
    Url,
};

use crate::errors::ActivationError;
use crate::registry::HostExtension;

/// Host operation observed by a simulated API object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// A provider was registered.
    Register(String),
    /// A provider signalled readiness.
    NotifyReady(String),
    /// A provider reported changed configurations.
    DidChange(String),
    /// The API object was disposed.
    Dispose,
}

/// Shared, ordered record of host calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<HostCall>>>,
}

impl CallLog {
    fn record(&self, call: HostCall) {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
    }

    /// Returns the calls recorded so far.
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// API object served by the simulated factory.
pub struct RecordingApi {
    version: Option<ProtocolVersion>,
    log: CallLog,
    hook: Arc<StatusEvents>,
}

impl RecordingApi {
    /// Flat test API without a version query, exported directly by the host.
    pub fn unversioned() -> Self {
        Self {
            version: None,
            log: CallLog::default(),
            hook: Arc::new(StatusEvents::default()),
        }
    }

    /// Calls recorded by this object.
    pub fn log(&self) -> &CallLog {
        &self.log
    }

    /// Events fired through this object's test hook.
    pub fn events(&self) -> &StatusEvents {
        self.hook.as_ref()
    }
}

impl CppToolsApi for RecordingApi {
    fn version(&self) -> Option<ProtocolVersion> {
        self.version
    }

    fn register_custom_configuration_provider(
        &self,
        provider: Arc<dyn CustomConfigurationProvider>,
    ) {
        self.log.record(HostCall::Register(provider.name().to_owned()));
    }

    fn notify_ready(&self, provider: &dyn CustomConfigurationProvider) {
        self.log
            .record(HostCall::NotifyReady(provider.name().to_owned()));
    }

    fn did_change_custom_configuration(&self, provider: &dyn CustomConfigurationProvider) {
        self.log.record(HostCall::DidChange(provider.name().to_owned()));
    }

    fn dispose(&self) {
        self.log.record(HostCall::Dispose);
    }
}

impl CppToolsTestApi for RecordingApi {
    fn get_test_hook(&self) -> Arc<dyn CppToolsTestHook> {
        Arc::clone(&self.hook) as Arc<dyn CppToolsTestHook>
    }
}

/// How the simulated factory answers version requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryBehaviour {
    /// Serves every version up to `max` and silently serves `max` above it.
    /// Served objects answer the version query.
    Serve {
        /// Newest version the host knows.
        max: ProtocolVersion,
    },
    /// Serves v0 and v1 objects without a version query and raises the
    /// version range fault for anything newer.
    RangeFault {
        /// Whether the fault carries the structured kind or only a message.
        structured: bool,
    },
    /// Faults on every request with the given message.
    Reject {
        /// Message carried by every fault.
        message: String,
    },
}

/// Versioned factory serving both the primary and the test API.
pub struct SimulatedFactory {
    behaviour: FactoryBehaviour,
    log: CallLog,
    hook: Arc<StatusEvents>,
    requests: Mutex<Vec<ProtocolVersion>>,
}

impl SimulatedFactory {
    /// Creates a factory with the given behaviour.
    pub fn new(behaviour: FactoryBehaviour) -> Self {
        Self {
            behaviour,
            log: CallLog::default(),
            hook: Arc::new(StatusEvents::default()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Calls recorded by every API object this factory served.
    pub fn log(&self) -> &CallLog {
        &self.log
    }

    /// Events fired through the test hook of served objects.
    pub fn events(&self) -> &StatusEvents {
        self.hook.as_ref()
    }

    /// Versions requested so far, in order.
    pub fn requests(&self) -> Vec<ProtocolVersion> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn serve(&self, version: ProtocolVersion) -> Result<Arc<RecordingApi>, HostFault> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(version);
        let reported = match &self.behaviour {
            FactoryBehaviour::Serve { max } => Some(version.min(*max)),
            FactoryBehaviour::RangeFault { structured } => {
                if version > ProtocolVersion::V1 {
                    return Err(if *structured {
                        HostFault::invalid_version(version)
                    } else {
                        HostFault::unclassified(format!("Invalid version: {}", version.as_u8()))
                    });
                }
                None
            }
            FactoryBehaviour::Reject { message } => {
                return Err(HostFault::unclassified(message.clone()));
            }
        };
        Ok(Arc::new(RecordingApi {
            version: reported,
            log: self.log.clone(),
            hook: Arc::clone(&self.hook),
        }))
    }
}

impl CppToolsExtension for SimulatedFactory {
    fn get_api(&self, version: ProtocolVersion) -> Result<Arc<dyn CppToolsApi>, HostFault> {
        self.serve(version).map(|api| api as Arc<dyn CppToolsApi>)
    }
}

impl CppToolsTestExtension for SimulatedFactory {
    fn get_test_api(
        &self,
        version: ProtocolVersion,
    ) -> Result<Arc<dyn CppToolsTestApi>, HostFault> {
        self.serve(version).map(|api| api as Arc<dyn CppToolsTestApi>)
    }
}

/// Flat v0 object exported by host release 0.17.5.
#[derive(Debug, Default)]
pub struct RecordingLegacyApi {
    log: CallLog,
}

impl RecordingLegacyApi {
    /// Calls recorded by the flat object.
    pub fn log(&self) -> &CallLog {
        &self.log
    }
}

impl LegacyCppToolsApi for RecordingLegacyApi {
    fn register_custom_configuration_provider(
        &self,
        provider: Arc<dyn CustomConfigurationProvider>,
    ) {
        self.log.record(HostCall::Register(provider.name().to_owned()));
    }

    fn did_change_custom_configuration(&self, provider: &dyn CustomConfigurationProvider) {
        self.log.record(HostCall::DidChange(provider.name().to_owned()));
    }
}

/// Exports assembled from optional factory and flat shapes.
#[derive(Default)]
pub struct SimulatedExports {
    factory: Option<Arc<SimulatedFactory>>,
    legacy: Option<Arc<RecordingLegacyApi>>,
    legacy_test: Option<Arc<RecordingApi>>,
}

impl SimulatedExports {
    /// Exports that only provide the versioned factory.
    pub fn versioned(factory: Arc<SimulatedFactory>) -> Self {
        Self {
            factory: Some(factory),
            ..Self::default()
        }
    }

    /// Exports that only provide the flat v0 object.
    pub fn legacy(legacy: Arc<RecordingLegacyApi>) -> Self {
        Self {
            legacy: Some(legacy),
            ..Self::default()
        }
    }

    /// Exports that only provide a flat test API with its hook accessor.
    pub fn legacy_test(api: Arc<RecordingApi>) -> Self {
        Self {
            legacy_test: Some(api),
            ..Self::default()
        }
    }

    /// Exports that provide both shapes.
    pub fn both(factory: Arc<SimulatedFactory>, legacy: Arc<RecordingLegacyApi>) -> Self {
        Self {
            factory: Some(factory),
            legacy: Some(legacy),
            legacy_test: None,
        }
    }
}

impl ExtensionExports for SimulatedExports {
    fn api_factory(&self) -> Option<Arc<dyn CppToolsExtension>> {
        self.factory
            .clone()
            .map(|factory| factory as Arc<dyn CppToolsExtension>)
    }

    fn legacy_api(&self) -> Option<Arc<dyn LegacyCppToolsApi>> {
        self.legacy
            .clone()
            .map(|legacy| legacy as Arc<dyn LegacyCppToolsApi>)
    }

    fn test_api_factory(&self) -> Option<Arc<dyn CppToolsTestExtension>> {
        self.factory
            .clone()
            .map(|factory| factory as Arc<dyn CppToolsTestExtension>)
    }

    fn legacy_test_api(&self) -> Option<Arc<dyn CppToolsTestApi>> {
        self.legacy_test
            .clone()
            .map(|api| api as Arc<dyn CppToolsTestApi>)
    }
}

/// Extension descriptor whose activation can be observed and made to fail.
pub struct SimulatedHost {
    id: String,
    exports: Arc<dyn ExtensionExports>,
    active: AtomicBool,
    activations: AtomicUsize,
    activation_error: Option<String>,
}

impl SimulatedHost {
    /// Creates an inactive host that activates successfully.
    pub fn new(id: impl Into<String>, exports: Arc<dyn ExtensionExports>) -> Self {
        Self {
            id: id.into(),
            exports,
            active: AtomicBool::new(false),
            activations: AtomicUsize::new(0),
            activation_error: None,
        }
    }

    /// Creates an inactive host whose activation fails with `message`.
    pub fn failing(
        id: impl Into<String>,
        exports: Arc<dyn ExtensionExports>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            activation_error: Some(message.into()),
            ..Self::new(id, exports)
        }
    }

    /// Number of times activation was requested.
    pub fn activations(&self) -> usize {
        self.activations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostExtension for SimulatedHost {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn exports(&self) -> Option<Arc<dyn ExtensionExports>> {
        self.is_active().then(|| Arc::clone(&self.exports))
    }

    async fn activate(&self) -> Result<Arc<dyn ExtensionExports>, ActivationError> {
        self.activations.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.activation_error {
            return Err(ActivationError::new(message.clone()));
        }
        self.active.store(true, Ordering::SeqCst);
        Ok(Arc::clone(&self.exports))
    }
}

/// Provider that only carries a name.
#[derive(Debug)]
pub struct NamedProvider {
    name: String,
}

impl NamedProvider {
    /// Creates a provider reporting `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl CustomConfigurationProvider for NamedProvider {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn extension_id(&self) -> &str {
        "example.named-provider"
    }

    async fn can_provide_configuration(
        &self,
        _uri: &Url,
        token: Option<&CancellationToken>,
    ) -> Result<bool, ProviderError> {
        ProviderError::check(token)?;
        Ok(false)
    }

    async fn provide_configurations(
        &self,
        _uris: &[Url],
        token: Option<&CancellationToken>,
    ) -> Result<Vec<SourceFileConfigurationItem>, ProviderError> {
        ProviderError::check(token)?;
        Ok(Vec::new())
    }
}
