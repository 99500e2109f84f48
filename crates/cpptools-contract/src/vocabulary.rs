//! Closed vocabularies shared by providers and the host.
//!
//! Both enumerations only grow. Every member records the protocol version
//! that introduced it so payload validation can reject values a host at an
//! older version would not understand.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::errors::ContractError;
use crate::version::ProtocolVersion;

/// Platform, compiler and architecture triple used by the IntelliSense engine.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    IntoStaticStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(try_from = "String", into = "&'static str")]
pub enum IntelliSenseMode {
    /// `msvc-x64`.
    #[strum(serialize = "msvc-x64")]
    MsvcX64,
    /// `clang-x64`.
    #[strum(serialize = "clang-x64")]
    ClangX64,
    /// `msvc-x86`.
    #[strum(serialize = "msvc-x86")]
    MsvcX86,
    /// `gcc-x86`.
    #[strum(serialize = "gcc-x86")]
    GccX86,
    /// `gcc-x64`.
    #[strum(serialize = "gcc-x64")]
    GccX64,
    /// `clang-x86`.
    #[strum(serialize = "clang-x86")]
    ClangX86,
    /// `msvc-arm`.
    #[strum(serialize = "msvc-arm")]
    MsvcArm,
    /// `msvc-arm64`.
    #[strum(serialize = "msvc-arm64")]
    MsvcArm64,
    /// `gcc-arm`.
    #[strum(serialize = "gcc-arm")]
    GccArm,
    /// `gcc-arm64`.
    #[strum(serialize = "gcc-arm64")]
    GccArm64,
    /// `clang-arm`.
    #[strum(serialize = "clang-arm")]
    ClangArm,
    /// `clang-arm64`.
    #[strum(serialize = "clang-arm64")]
    ClangArm64,
    /// `windows-msvc-x86`.
    #[strum(serialize = "windows-msvc-x86")]
    WindowsMsvcX86,
    /// `windows-msvc-x64`.
    #[strum(serialize = "windows-msvc-x64")]
    WindowsMsvcX64,
    /// `windows-msvc-arm64`.
    #[strum(serialize = "windows-msvc-arm64")]
    WindowsMsvcArm64,
    /// `windows-clang-x64`.
    #[strum(serialize = "windows-clang-x64")]
    WindowsClangX64,
    /// `linux-gcc-x64`.
    #[strum(serialize = "linux-gcc-x64")]
    LinuxGccX64,
    /// `linux-gcc-arm64`.
    #[strum(serialize = "linux-gcc-arm64")]
    LinuxGccArm64,
    /// `linux-clang-x64`.
    #[strum(serialize = "linux-clang-x64")]
    LinuxClangX64,
    /// `macos-clang-x64`.
    #[strum(serialize = "macos-clang-x64")]
    MacosClangX64,
    /// `macos-clang-arm64`.
    #[strum(serialize = "macos-clang-arm64")]
    MacosClangArm64,
}

impl IntelliSenseMode {
    /// Returns the wire spelling, e.g. `msvc-x64`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Protocol version that first accepted this mode.
    #[must_use]
    pub const fn introduced_in(self) -> ProtocolVersion {
        match self {
            Self::MsvcX64 | Self::ClangX64 => ProtocolVersion::V0,
            Self::MsvcX86 | Self::GccX86 | Self::GccX64 | Self::ClangX86 => ProtocolVersion::V2,
            Self::MsvcArm
            | Self::MsvcArm64
            | Self::GccArm
            | Self::GccArm64
            | Self::ClangArm
            | Self::ClangArm64 => ProtocolVersion::V3,
            Self::WindowsMsvcX86
            | Self::WindowsMsvcX64
            | Self::WindowsMsvcArm64
            | Self::WindowsClangX64
            | Self::LinuxGccX64
            | Self::LinuxGccArm64
            | Self::LinuxClangX64
            | Self::MacosClangX64
            | Self::MacosClangArm64 => ProtocolVersion::V6,
        }
    }

    /// Whether a host speaking `version` understands this mode.
    #[must_use]
    pub const fn is_available_in(self, version: ProtocolVersion) -> bool {
        version.at_least(self.introduced_in())
    }
}

impl std::fmt::Display for IntelliSenseMode {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<String> for IntelliSenseMode {
    type Error = ContractError;

    fn try_from(input: String) -> Result<Self, Self::Error> {
        Self::from_str(input.trim()).map_err(|_| ContractError::UnknownMode { input })
    }
}

/// C or C++ language standard applied to a translation unit.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    IntoStaticStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(try_from = "String", into = "&'static str")]
pub enum LanguageStandard {
    /// `c89`.
    #[strum(serialize = "c89")]
    C89,
    /// `c99`.
    #[strum(serialize = "c99")]
    C99,
    /// `c11`.
    #[strum(serialize = "c11")]
    C11,
    /// `c17`.
    #[strum(serialize = "c17")]
    C17,
    /// `c23`.
    #[strum(serialize = "c23")]
    C23,
    /// `c++98`.
    #[strum(serialize = "c++98")]
    Cpp98,
    /// `c++03`.
    #[strum(serialize = "c++03")]
    Cpp03,
    /// `c++11`.
    #[strum(serialize = "c++11")]
    Cpp11,
    /// `c++14`.
    #[strum(serialize = "c++14")]
    Cpp14,
    /// `c++17`.
    #[strum(serialize = "c++17")]
    Cpp17,
    /// `c++20`.
    #[strum(serialize = "c++20")]
    Cpp20,
    /// `c++23`.
    #[strum(serialize = "c++23")]
    Cpp23,
    /// `gnu89`.
    #[strum(serialize = "gnu89")]
    Gnu89,
    /// `gnu99`.
    #[strum(serialize = "gnu99")]
    Gnu99,
    /// `gnu11`.
    #[strum(serialize = "gnu11")]
    Gnu11,
    /// `gnu17`.
    #[strum(serialize = "gnu17")]
    Gnu17,
    /// `gnu++98`.
    #[strum(serialize = "gnu++98")]
    GnuCpp98,
    /// `gnu++03`.
    #[strum(serialize = "gnu++03")]
    GnuCpp03,
    /// `gnu++11`.
    #[strum(serialize = "gnu++11")]
    GnuCpp11,
    /// `gnu++14`.
    #[strum(serialize = "gnu++14")]
    GnuCpp14,
    /// `gnu++17`.
    #[strum(serialize = "gnu++17")]
    GnuCpp17,
    /// `gnu++20`.
    #[strum(serialize = "gnu++20")]
    GnuCpp20,
    /// `gnu++23`.
    #[strum(serialize = "gnu++23")]
    GnuCpp23,
}

impl LanguageStandard {
    /// Returns the wire spelling, e.g. `c++17`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Protocol version that first accepted this standard.
    #[must_use]
    pub const fn introduced_in(self) -> ProtocolVersion {
        match self {
            Self::C89
            | Self::C99
            | Self::C11
            | Self::Cpp98
            | Self::Cpp03
            | Self::Cpp11
            | Self::Cpp14
            | Self::Cpp17 => ProtocolVersion::V0,
            Self::C17 | Self::Cpp20 => ProtocolVersion::V3,
            Self::Gnu89
            | Self::Gnu99
            | Self::Gnu11
            | Self::Gnu17
            | Self::GnuCpp98
            | Self::GnuCpp03
            | Self::GnuCpp11
            | Self::GnuCpp14
            | Self::GnuCpp17
            | Self::GnuCpp20 => ProtocolVersion::V4,
            Self::C23 | Self::Cpp23 | Self::GnuCpp23 => ProtocolVersion::V6,
        }
    }

    /// Whether a host speaking `version` understands this standard.
    #[must_use]
    pub const fn is_available_in(self, version: ProtocolVersion) -> bool {
        version.at_least(self.introduced_in())
    }
}

impl std::fmt::Display for LanguageStandard {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<String> for LanguageStandard {
    type Error = ContractError;

    fn try_from(input: String) -> Result<Self, Self::Error> {
        Self::from_str(input.trim()).map_err(|_| ContractError::UnknownStandard { input })
    }
}
