//! Configuration payloads exchanged between providers and the host.
//!
//! The payloads are passive value objects. Field names follow the camelCase
//! wire schema and absent optional fields are omitted when serialised, so a
//! host at an older version never sees a key it does not know about.
//!
//! Responsibility for discovering compiler defaults belongs to whichever side
//! omits `compilerPath`: a provider that leaves it unset must already have
//! folded the system include path and built-in defines into the payload.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ContractError;
use crate::version::ProtocolVersion;
use crate::vocabulary::{IntelliSenseMode, LanguageStandard};

/// Payload fields whose availability depends on the protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadField {
    /// `includePath`.
    IncludePath,
    /// `defines`.
    Defines,
    /// `forcedInclude`.
    ForcedInclude,
    /// `compilerPath`.
    CompilerPath,
    /// `browsePath`.
    BrowsePath,
    /// `windowsSdkVersion`.
    WindowsSdkVersion,
    /// `compilerArgs`.
    CompilerArgs,
    /// `compilerFragments`.
    CompilerFragments,
}

impl PayloadField {
    /// Returns the camelCase key used on the wire.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::IncludePath => "includePath",
            Self::Defines => "defines",
            Self::ForcedInclude => "forcedInclude",
            Self::CompilerPath => "compilerPath",
            Self::BrowsePath => "browsePath",
            Self::WindowsSdkVersion => "windowsSdkVersion",
            Self::CompilerArgs => "compilerArgs",
            Self::CompilerFragments => "compilerFragments",
        }
    }

    /// Protocol version that introduced the field.
    #[must_use]
    pub const fn introduced_in(self) -> ProtocolVersion {
        match self {
            Self::IncludePath | Self::Defines | Self::ForcedInclude | Self::CompilerPath => {
                ProtocolVersion::V0
            }
            Self::BrowsePath => ProtocolVersion::V2,
            Self::WindowsSdkVersion => ProtocolVersion::V3,
            Self::CompilerArgs => ProtocolVersion::V4,
            Self::CompilerFragments => ProtocolVersion::V5,
        }
    }
}

impl fmt::Display for PayloadField {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.wire_name())
    }
}

/// Custom IntelliSense configuration for a single source file.
///
/// # Example
///
/// ```
/// use cpptools_contract::{
///     IntelliSenseMode, LanguageStandard, ProtocolVersion, SourceFileConfiguration,
/// };
///
/// let configuration =
///     SourceFileConfiguration::new(IntelliSenseMode::GccX64, LanguageStandard::Cpp17)
///         .with_compiler_path("/usr/bin/g++")
///         .with_compiler_args(["-std=c++17", "-Wall"]);
///
/// assert!(configuration.validate_for(ProtocolVersion::V4).is_ok());
/// assert!(configuration.validate_for(ProtocolVersion::V3).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFileConfiguration {
    /// Include directories, including system defaults unless `compiler_path`
    /// is set.
    #[serde(default)]
    pub include_path: Vec<String>,
    /// Preprocessor defines, including compiler built-ins unless
    /// `compiler_path` is set.
    #[serde(default)]
    pub defines: Vec<String>,
    /// Platform, compiler and architecture to emulate.
    pub intelli_sense_mode: IntelliSenseMode,
    /// Language standard of the file.
    pub standard: LanguageStandard,
    /// Files included before the source file is parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forced_include: Option<Vec<String>>,
    /// Full path of the compiler the host queries for defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_path: Option<String>,
    /// Arguments passed to the compiler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_args: Option<Vec<String>>,
    /// Shell-parsed fragments of the compiler command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_fragments: Option<Vec<String>>,
    /// Windows SDK version to use for system headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows_sdk_version: Option<String>,
}

impl SourceFileConfiguration {
    /// Builds a configuration with empty include and define lists.
    #[must_use]
    pub const fn new(intelli_sense_mode: IntelliSenseMode, standard: LanguageStandard) -> Self {
        Self {
            include_path: Vec::new(),
            defines: Vec::new(),
            intelli_sense_mode,
            standard,
            forced_include: None,
            compiler_path: None,
            compiler_args: None,
            compiler_fragments: None,
            windows_sdk_version: None,
        }
    }

    /// Replaces the include path.
    #[must_use]
    pub fn with_include_path<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_path = collect(paths);
        self
    }

    /// Replaces the preprocessor defines.
    #[must_use]
    pub fn with_defines<I, S>(mut self, defines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defines = collect(defines);
        self
    }

    /// Sets the forced-include list.
    #[must_use]
    pub fn with_forced_include<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.forced_include = Some(collect(files));
        self
    }

    /// Sets the compiler path.
    #[must_use]
    pub fn with_compiler_path(mut self, path: impl Into<String>) -> Self {
        self.compiler_path = Some(path.into());
        self
    }

    /// Sets the compiler arguments.
    #[must_use]
    pub fn with_compiler_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compiler_args = Some(collect(args));
        self
    }

    /// Sets the compiler command-line fragments.
    #[must_use]
    pub fn with_compiler_fragments<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compiler_fragments = Some(collect(fragments));
        self
    }

    /// Sets the Windows SDK version.
    #[must_use]
    pub fn with_windows_sdk_version(mut self, version: impl Into<String>) -> Self {
        self.windows_sdk_version = Some(version.into());
        self
    }

    /// Checks the payload against the contract of `version`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::MissingSystemDefaults`] when `compilerPath`
    /// is absent and either list is empty, [`ContractError::FieldUnavailable`]
    /// when a populated field postdates `version`, and
    /// [`ContractError::ModeUnavailable`] or
    /// [`ContractError::StandardUnavailable`] for vocabulary values the host
    /// would not recognise.
    pub fn validate_for(&self, version: ProtocolVersion) -> Result<(), ContractError> {
        if self.compiler_path.is_none() {
            require_defaults(PayloadField::IncludePath, &self.include_path)?;
            require_defaults(PayloadField::Defines, &self.defines)?;
        }

        require_field(version, PayloadField::ForcedInclude, self.forced_include.is_some())?;
        require_field(version, PayloadField::CompilerPath, self.compiler_path.is_some())?;
        require_field(
            version,
            PayloadField::WindowsSdkVersion,
            self.windows_sdk_version.is_some(),
        )?;
        require_field(version, PayloadField::CompilerArgs, self.compiler_args.is_some())?;
        require_field(
            version,
            PayloadField::CompilerFragments,
            self.compiler_fragments.is_some(),
        )?;

        if !self.intelli_sense_mode.is_available_in(version) {
            return Err(ContractError::ModeUnavailable {
                mode: self.intelli_sense_mode,
                version,
            });
        }
        require_standard(self.standard, version)
    }
}

/// A source file paired with its configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFileConfigurationItem {
    /// URI of the source file.
    pub uri: Url,
    /// Configuration for [`Self::uri`].
    pub configuration: SourceFileConfiguration,
}

impl SourceFileConfigurationItem {
    /// Pairs a URI with a configuration.
    #[must_use]
    pub const fn new(uri: Url, configuration: SourceFileConfiguration) -> Self {
        Self { uri, configuration }
    }
}

/// Browse-path configuration for a workspace or a single folder.
///
/// Used by the host to build the code-browsing index. Introduced in v2.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceBrowseConfiguration {
    /// Directories to index, including system defaults unless
    /// `compiler_path` is set.
    #[serde(default)]
    pub browse_path: Vec<String>,
    /// Full path of the compiler the host queries for defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_path: Option<String>,
    /// Language standard used while indexing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<LanguageStandard>,
    /// Arguments passed to the compiler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_args: Option<Vec<String>>,
    /// Shell-parsed fragments of the compiler command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_fragments: Option<Vec<String>>,
    /// Windows SDK version to use for system headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows_sdk_version: Option<String>,
}

impl WorkspaceBrowseConfiguration {
    /// Builds a browse configuration from a list of browse paths.
    #[must_use]
    pub fn new<I, S>(browse_path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            browse_path: collect(browse_path),
            ..Self::default()
        }
    }

    /// Sets the compiler path.
    #[must_use]
    pub fn with_compiler_path(mut self, path: impl Into<String>) -> Self {
        self.compiler_path = Some(path.into());
        self
    }

    /// Sets the language standard.
    #[must_use]
    pub const fn with_standard(mut self, standard: LanguageStandard) -> Self {
        self.standard = Some(standard);
        self
    }

    /// Sets the compiler arguments.
    #[must_use]
    pub fn with_compiler_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compiler_args = Some(collect(args));
        self
    }

    /// Sets the compiler command-line fragments.
    #[must_use]
    pub fn with_compiler_fragments<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compiler_fragments = Some(collect(fragments));
        self
    }

    /// Sets the Windows SDK version.
    #[must_use]
    pub fn with_windows_sdk_version(mut self, version: impl Into<String>) -> Self {
        self.windows_sdk_version = Some(version.into());
        self
    }

    /// Checks the payload against the contract of `version`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::BrowseUnavailable`] below v2,
    /// [`ContractError::MissingSystemDefaults`] when neither `compilerPath`
    /// nor a browse path is supplied, and the field or vocabulary errors
    /// described on [`SourceFileConfiguration::validate_for`].
    pub fn validate_for(&self, version: ProtocolVersion) -> Result<(), ContractError> {
        if !version.at_least(PayloadField::BrowsePath.introduced_in()) {
            return Err(ContractError::BrowseUnavailable { version });
        }
        if self.compiler_path.is_none() {
            require_defaults(PayloadField::BrowsePath, &self.browse_path)?;
        }

        require_field(
            version,
            PayloadField::WindowsSdkVersion,
            self.windows_sdk_version.is_some(),
        )?;
        require_field(version, PayloadField::CompilerArgs, self.compiler_args.is_some())?;
        require_field(
            version,
            PayloadField::CompilerFragments,
            self.compiler_fragments.is_some(),
        )?;

        match self.standard {
            Some(standard) => require_standard(standard, version),
            None => Ok(()),
        }
    }
}

fn collect<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

fn require_defaults(field: PayloadField, values: &[String]) -> Result<(), ContractError> {
    if values.is_empty() {
        return Err(ContractError::MissingSystemDefaults { field });
    }
    Ok(())
}

fn require_field(
    version: ProtocolVersion,
    field: PayloadField,
    populated: bool,
) -> Result<(), ContractError> {
    let introduced = field.introduced_in();
    if populated && !version.at_least(introduced) {
        return Err(ContractError::FieldUnavailable {
            field,
            version,
            introduced,
        });
    }
    Ok(())
}

fn require_standard(
    standard: LanguageStandard,
    version: ProtocolVersion,
) -> Result<(), ContractError> {
    if standard.is_available_in(version) {
        Ok(())
    } else {
        Err(ContractError::StandardUnavailable { standard, version })
    }
}
