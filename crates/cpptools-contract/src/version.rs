//! Protocol versions negotiated between providers and the host.
//!
//! Each version is a strict superset of the previous one: later revisions add
//! optional payload fields, optional provider methods and vocabulary values,
//! and never remove anything a lower version defines.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ContractError;

/// Revision of the provider/host contract.
///
/// # Example
///
/// ```
/// use cpptools_contract::ProtocolVersion;
///
/// assert_eq!(ProtocolVersion::LATEST, ProtocolVersion::V6);
/// assert!(ProtocolVersion::V2.at_least(ProtocolVersion::V1));
/// assert_eq!("v3".parse::<ProtocolVersion>().ok(), Some(ProtocolVersion::V3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum ProtocolVersion {
    /// Flat API exported directly by host release 0.17.5.
    V0 = 0,
    /// First revision served through the versioned `getApi` factory.
    V1 = 1,
    /// Adds version queries, readiness and browse configurations.
    V2 = 2,
    /// Adds per-folder browse configurations and the Windows SDK version.
    V3 = 3,
    /// Adds compiler arguments.
    V4 = 4,
    /// Adds compiler fragments and per-document IntelliSense status.
    V5 = 5,
    /// Adds platform-qualified IntelliSense modes and 2023 standards.
    V6 = 6,
}

impl ProtocolVersion {
    /// Every defined version in ascending order.
    pub const ALL: [Self; 7] = [
        Self::V0,
        Self::V1,
        Self::V2,
        Self::V3,
        Self::V4,
        Self::V5,
        Self::V6,
    ];

    /// The newest defined version.
    pub const LATEST: Self = match Self::ALL.last() {
        Some(version) => *version,
        None => Self::V0,
    };

    /// Returns the integer wire value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether this version includes everything `other` defines.
    #[must_use]
    pub const fn at_least(self, other: Self) -> bool {
        self.as_u8() >= other.as_u8()
    }

    /// Looks up a version by its wire value.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::V0),
            1 => Some(Self::V1),
            2 => Some(Self::V2),
            3 => Some(Self::V3),
            4 => Some(Self::V4),
            5 => Some(Self::V5),
            6 => Some(Self::V6),
            _ => None,
        }
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::LATEST
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "v{}", self.as_u8())
    }
}

impl From<ProtocolVersion> for u8 {
    fn from(version: ProtocolVersion) -> Self {
        version.as_u8()
    }
}

impl TryFrom<u8> for ProtocolVersion {
    type Error = ContractError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(ContractError::UnknownVersion { value })
    }
}

impl FromStr for ProtocolVersion {
    type Err = ContractError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalised = input.trim().to_ascii_lowercase();
        if normalised == "latest" {
            return Ok(Self::LATEST);
        }
        let digits = normalised.strip_prefix('v').unwrap_or(&normalised);
        let value = digits.parse::<u8>().map_err(|_| ContractError::InvalidVersion {
            input: input.to_owned(),
        })?;
        Self::try_from(value)
    }
}
