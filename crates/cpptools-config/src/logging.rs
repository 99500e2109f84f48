//! Output formats for the opt-in telemetry subscriber.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// How negotiation events are rendered on stderr.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    EnumString,
    Display,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON record per event with the event fields flattened in.
    #[default]
    Json,
    /// Single-line text for interactive terminals.
    Compact,
}

impl LogFormat {
    /// Spelling accepted in files, environment variables and flags.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Whether events are rendered as machine-readable records.
    #[must_use]
    pub const fn is_structured(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Error returned for an unrecognised format label.
pub type LogFormatParseError = strum::ParseError;
