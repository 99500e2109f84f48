//! Crate-level tests for payloads, providers and the test hook.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use rstest::{fixture, rstest};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::api::{CppToolsApi, LegacyApiAdapter, LegacyCppToolsApi};
use crate::configuration::{
    PayloadField, SourceFileConfiguration, SourceFileConfigurationItem,
    WorkspaceBrowseConfiguration,
};
use crate::errors::{ContractError, ProviderError};
use crate::provider::CustomConfigurationProvider;
use crate::test_hook::{CppToolsTestHook, IntelliSenseStatus, Status, StatusEvents};
use crate::version::ProtocolVersion;
use crate::vocabulary::{IntelliSenseMode, LanguageStandard};


fn file_uri(path: &str) -> Url {
    Url::parse(&format!("file://{path}")).unwrap_or_else(|error| panic!("invalid URI: {error}"))
}

#[fixture]
fn explicit_configuration() -> SourceFileConfiguration {
    SourceFileConfiguration::new(IntelliSenseMode::ClangX64, LanguageStandard::Cpp17)
        .with_include_path(["/usr/include", "/workspace/include"])
        .with_defines(["__cplusplus=201703L", "NDEBUG"])
}

// ---------------------------------------------------------------------------
// Payload validation
// ---------------------------------------------------------------------------

#[rstest]
fn compiler_path_alone_is_a_valid_configuration() {
    let configuration =
        SourceFileConfiguration::new(IntelliSenseMode::GccX64, LanguageStandard::C11)
            .with_compiler_path("/usr/bin/gcc");
    assert!(configuration.include_path.is_empty());
    assert!(configuration.defines.is_empty());
    assert_eq!(configuration.validate_for(ProtocolVersion::V2), Ok(()));
}

#[rstest]
fn explicit_defaults_are_valid_at_v0(explicit_configuration: SourceFileConfiguration) {
    assert_eq!(explicit_configuration.validate_for(ProtocolVersion::V0), Ok(()));
}

#[rstest]
#[case(PayloadField::IncludePath)]
#[case(PayloadField::Defines)]
fn missing_defaults_without_compiler_path_are_rejected(
    explicit_configuration: SourceFileConfiguration,
    #[case] field: PayloadField,
) {
    let mut configuration = explicit_configuration;
    match field {
        PayloadField::IncludePath => configuration.include_path.clear(),
        _ => configuration.defines.clear(),
    }
    assert_eq!(
        configuration.validate_for(ProtocolVersion::LATEST),
        Err(ContractError::MissingSystemDefaults { field })
    );
}

#[rstest]
#[case(ProtocolVersion::V3, false)]
#[case(ProtocolVersion::V4, true)]
#[case(ProtocolVersion::V6, true)]
fn compiler_args_require_v4(
    explicit_configuration: SourceFileConfiguration,
    #[case] version: ProtocolVersion,
    #[case] valid: bool,
) {
    let configuration = explicit_configuration.with_compiler_args(["-O2"]);
    assert_eq!(configuration.validate_for(version).is_ok(), valid);
}

#[rstest]
fn reports_the_version_that_introduced_a_field(explicit_configuration: SourceFileConfiguration) {
    let configuration = explicit_configuration.with_compiler_fragments(["-I", "include"]);
    assert_eq!(
        configuration.validate_for(ProtocolVersion::V4),
        Err(ContractError::FieldUnavailable {
            field: PayloadField::CompilerFragments,
            version: ProtocolVersion::V4,
            introduced: ProtocolVersion::V5,
        })
    );
}

#[rstest]
fn rejects_vocabulary_newer_than_the_target(explicit_configuration: SourceFileConfiguration) {
    let mut configuration = explicit_configuration;
    configuration.intelli_sense_mode = IntelliSenseMode::LinuxGccX64;
    assert!(matches!(
        configuration.validate_for(ProtocolVersion::V5),
        Err(ContractError::ModeUnavailable { .. })
    ));

    configuration.intelli_sense_mode = IntelliSenseMode::GccX64;
    configuration.standard = LanguageStandard::GnuCpp14;
    assert!(matches!(
        configuration.validate_for(ProtocolVersion::V3),
        Err(ContractError::StandardUnavailable { .. })
    ));
}

#[test]
fn browse_configurations_do_not_exist_before_v2() {
    let browse = WorkspaceBrowseConfiguration::new(["/usr/include"]);
    assert_eq!(
        browse.validate_for(ProtocolVersion::V1),
        Err(ContractError::BrowseUnavailable {
            version: ProtocolVersion::V1
        })
    );
    assert_eq!(browse.validate_for(ProtocolVersion::V2), Ok(()));
}

#[test]
fn browse_configuration_needs_paths_or_compiler() {
    let empty = WorkspaceBrowseConfiguration::default();
    assert_eq!(
        empty.validate_for(ProtocolVersion::V3),
        Err(ContractError::MissingSystemDefaults {
            field: PayloadField::BrowsePath
        })
    );
    let compiler_only = empty.with_compiler_path("/usr/bin/clang");
    assert_eq!(compiler_only.validate_for(ProtocolVersion::V3), Ok(()));
}

// ---------------------------------------------------------------------------
// Wire schema
// ---------------------------------------------------------------------------

#[rstest]
fn serialises_camel_case_and_omits_absent_fields(
    explicit_configuration: SourceFileConfiguration,
) {
    let configuration = explicit_configuration.with_windows_sdk_version("10.0.19041.0");
    let json = serde_json::to_value(&configuration).expect("serialise configuration");

    assert_eq!(json["intelliSenseMode"], "clang-x64");
    assert_eq!(json["standard"], "c++17");
    assert_eq!(json["windowsSdkVersion"], "10.0.19041.0");
    assert!(json.get("compilerPath").is_none(), "{json}");
    assert!(json.get("compilerArgs").is_none(), "{json}");
}

#[test]
fn parses_a_v0_item_from_the_wire() {
    let payload = r#"{
        "uri": "file:///workspace/main.cpp",
        "configuration": {
            "includePath": [],
            "defines": [],
            "intelliSenseMode": "msvc-x64",
            "standard": "c++14",
            "compilerPath": "C:/msvc/cl.exe"
        }
    }"#;
    let item: SourceFileConfigurationItem =
        serde_json::from_str(payload).expect("parse configuration item");

    assert_eq!(item.uri, file_uri("/workspace/main.cpp"));
    assert_eq!(item.configuration.standard, LanguageStandard::Cpp14);
    assert_eq!(item.configuration.validate_for(ProtocolVersion::V0), Ok(()));
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

struct FixedProvider {
    configurations: HashMap<Url, SourceFileConfiguration>,
}

#[async_trait]
impl CustomConfigurationProvider for FixedProvider {
    fn name(&self) -> &str {
        "Fixed"
    }

    fn extension_id(&self) -> &str {
        "example.fixed-provider"
    }

    async fn can_provide_configuration(
        &self,
        uri: &Url,
        token: Option<&CancellationToken>,
    ) -> Result<bool, ProviderError> {
        ProviderError::check(token)?;
        Ok(self.configurations.contains_key(uri))
    }

    async fn provide_configurations(
        &self,
        uris: &[Url],
        token: Option<&CancellationToken>,
    ) -> Result<Vec<SourceFileConfigurationItem>, ProviderError> {
        ProviderError::check(token)?;
        Ok(uris
            .iter()
            .filter_map(|uri| {
                self.configurations
                    .get(uri)
                    .map(|configuration| {
                        SourceFileConfigurationItem::new(uri.clone(), configuration.clone())
                    })
            })
            .collect())
    }
}

#[fixture]
fn provider(explicit_configuration: SourceFileConfiguration) -> FixedProvider {
    let mut configurations = HashMap::new();
    configurations.insert(file_uri("/workspace/main.cpp"), explicit_configuration);
    FixedProvider { configurations }
}

#[rstest]
#[tokio::test]
async fn provider_omits_files_it_cannot_configure(provider: FixedProvider) {
    let known = file_uri("/workspace/main.cpp");
    let unknown = file_uri("/workspace/other.cpp");

    let items = provider
        .provide_configurations(&[known.clone(), unknown.clone()], None)
        .await
        .expect("provide configurations");

    assert_eq!(items.len(), 1);
    assert_eq!(items.first().map(|item| &item.uri), Some(&known));
    assert!(!provider
        .can_provide_configuration(&unknown, None)
        .await
        .expect("query provider"));
}

#[rstest]
#[tokio::test]
async fn provider_honours_cancellation(provider: FixedProvider) {
    let token = CancellationToken::new();
    token.cancel();

    let error = provider
        .provide_configurations(&[file_uri("/workspace/main.cpp")], Some(&token))
        .await
        .expect_err("cancelled request should fail");
    assert!(error.is_cancelled());
}

#[rstest]
#[tokio::test]
async fn browse_methods_default_to_unsupported(provider: FixedProvider) {
    assert!(!provider
        .can_provide_browse_configuration(None)
        .await
        .expect("query browse support"));
    assert_eq!(
        provider
            .provide_folder_browse_configuration(&file_uri("/workspace"), None)
            .await
            .expect("query folder browse"),
        None
    );
}

// ---------------------------------------------------------------------------
// Legacy adapter
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingLegacyApi {
    calls: Mutex<Vec<String>>,
}

impl LegacyCppToolsApi for RecordingLegacyApi {
    fn register_custom_configuration_provider(
        &self,
        provider: Arc<dyn CustomConfigurationProvider>,
    ) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("register:{}", provider.extension_id()));
        }
    }

    fn did_change_custom_configuration(&self, provider: &dyn CustomConfigurationProvider) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("changed:{}", provider.extension_id()));
        }
    }
}

#[rstest]
fn legacy_adapter_forwards_v0_operations(provider: FixedProvider) {
    let legacy = Arc::new(RecordingLegacyApi::default());
    let adapter = LegacyApiAdapter::new(legacy.clone());
    let shared: Arc<dyn CustomConfigurationProvider> = Arc::new(provider);

    adapter.register_custom_configuration_provider(Arc::clone(&shared));
    adapter.notify_ready(shared.as_ref());
    adapter.did_change_custom_configuration(shared.as_ref());

    assert_eq!(adapter.version(), None);
    let calls = legacy.calls.lock().map(|calls| calls.clone()).unwrap_or_default();
    assert_eq!(
        calls,
        vec![
            String::from("register:example.fixed-provider"),
            String::from("changed:example.fixed-provider"),
        ]
    );
}

// ---------------------------------------------------------------------------
// Test hook
// ---------------------------------------------------------------------------

#[test]
fn status_events_reach_every_subscriber() {
    let events = StatusEvents::default();
    let mut first = events.status_changed();
    let mut second = events.status_changed();

    assert_eq!(events.fire_status(Status::IntelliSenseReady), 2);
    assert_eq!(first.try_recv().ok(), Some(Status::IntelliSenseReady));
    assert_eq!(second.try_recv().ok(), Some(Status::IntelliSenseReady));
}

#[test]
fn firing_without_subscribers_reaches_nobody() {
    let events = StatusEvents::with_capacity(0);
    assert_eq!(events.fire_status(Status::Idle), 0);
}

#[test]
fn per_document_status_carries_the_filename() {
    let events = StatusEvents::default();
    let Some(mut receiver) = events.intellisense_status_changed() else {
        panic!("status events should expose per-document updates");
    };

    let delivered = events.fire_intellisense_status(IntelliSenseStatus::for_file(
        Status::IntelliSenseCompiling,
        "main.cpp",
    ));
    assert_eq!(delivered, 1);

    let event = receiver.try_recv().expect("receive per-document status");
    assert_eq!(event.status, Status::IntelliSenseCompiling);
    assert_eq!(event.filename.as_deref(), Some("main.cpp"));
}

#[rstest]
#[case(1, Status::TagParsingBegun)]
#[case(5, Status::Idle)]
fn status_codes_are_stable(#[case] code: u8, #[case] status: Status) {
    assert_eq!(Status::try_from(code), Ok(status));
    assert_eq!(status.code(), code);
}

#[test]
fn idle_status_arrived_in_v2() {
    assert_eq!(Status::Idle.introduced_in(), ProtocolVersion::V2);
    assert_eq!(
        Status::try_from(0),
        Err(ContractError::UnknownStatus { value: 0 })
    );
}
