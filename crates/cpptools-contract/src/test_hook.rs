//! Test hook that lets provider test suites synchronise with the host.
//!
//! The hook is subscribe-only: tests observe the tag parser and IntelliSense
//! engine moving through their lifecycle phases and wait for the phase they
//! need before asserting.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::api::CppToolsApi;
use crate::errors::{ContractError, HostFault};
use crate::version::ProtocolVersion;

/// Number of undelivered events a subscriber may lag behind.
pub const DEFAULT_EVENT_CAPACITY: usize = 16;

/// Lifecycle phase reported by the host. Codes are never repurposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Status {
    /// The tag parser started indexing.
    TagParsingBegun = 1,
    /// The tag parser finished indexing.
    TagParsingDone = 2,
    /// The IntelliSense engine is compiling a translation unit.
    IntelliSenseCompiling = 3,
    /// IntelliSense results are up to date.
    IntelliSenseReady = 4,
    /// The host has no pending work.
    Idle = 5,
}

impl Status {
    /// Returns the integer wire value.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Protocol version that introduced the status.
    #[must_use]
    pub const fn introduced_in(self) -> ProtocolVersion {
        match self {
            Self::TagParsingBegun
            | Self::TagParsingDone
            | Self::IntelliSenseCompiling
            | Self::IntelliSenseReady => ProtocolVersion::V0,
            Self::Idle => ProtocolVersion::V2,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TagParsingBegun => "tag parsing begun",
            Self::TagParsingDone => "tag parsing done",
            Self::IntelliSenseCompiling => "IntelliSense compiling",
            Self::IntelliSenseReady => "IntelliSense ready",
            Self::Idle => "idle",
        };
        formatter.write_str(label)
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for Status {
    type Error = ContractError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::TagParsingBegun),
            2 => Ok(Self::TagParsingDone),
            3 => Ok(Self::IntelliSenseCompiling),
            4 => Ok(Self::IntelliSenseReady),
            5 => Ok(Self::Idle),
            _ => Err(ContractError::UnknownStatus { value }),
        }
    }
}

/// Per-document status event (v5).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelliSenseStatus {
    /// Phase the engine moved to.
    pub status: Status,
    /// Document the phase applies to, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl IntelliSenseStatus {
    /// Builds an event for the given document.
    #[must_use]
    pub fn for_file(status: Status, filename: impl Into<String>) -> Self {
        Self {
            status,
            filename: Some(filename.into()),
        }
    }
}

/// Subscription surface of the test hook.
pub trait CppToolsTestHook: Send + Sync {
    /// Subscribes to tag parser and IntelliSense status changes.
    fn status_changed(&self) -> broadcast::Receiver<Status>;

    /// Subscribes to per-document status changes, available from v5.
    fn intellisense_status_changed(&self) -> Option<broadcast::Receiver<IntelliSenseStatus>> {
        None
    }

    /// Releases the hook's subscriptions.
    fn dispose(&self) {}
}

/// API variant granting access to the test hook.
pub trait CppToolsTestApi: CppToolsApi {
    /// Returns the hook tests subscribe to.
    fn get_test_hook(&self) -> Arc<dyn CppToolsTestHook>;
}

impl fmt::Debug for dyn CppToolsTestApi {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CppToolsTestApi")
            .field("version", &self.version())
            .finish()
    }
}

/// Versioned factory for the test API.
pub trait CppToolsTestExtension: Send + Sync {
    /// Returns the test API object for `version`.
    ///
    /// # Errors
    ///
    /// Hosts may reject versions they cannot serve with a [`HostFault`].
    fn get_test_api(&self, version: ProtocolVersion)
    -> Result<Arc<dyn CppToolsTestApi>, HostFault>;
}

/// Broadcast channels a host uses to implement [`CppToolsTestHook`].
///
/// # Example
///
/// ```
/// use cpptools_contract::{CppToolsTestHook, Status, StatusEvents};
///
/// let events = StatusEvents::default();
/// let mut receiver = events.status_changed();
/// assert_eq!(events.fire_status(Status::TagParsingBegun), 1);
/// assert_eq!(receiver.try_recv().ok(), Some(Status::TagParsingBegun));
/// ```
#[derive(Debug, Clone)]
pub struct StatusEvents {
    status: broadcast::Sender<Status>,
    intellisense: broadcast::Sender<IntelliSenseStatus>,
}

impl StatusEvents {
    /// Builds channels that buffer up to `capacity` events per subscriber.
    ///
    /// A `capacity` of zero is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let bounded = capacity.max(1);
        let (status, _) = broadcast::channel(bounded);
        let (intellisense, _) = broadcast::channel(bounded);
        Self {
            status,
            intellisense,
        }
    }

    /// Publishes a status change and returns the number of subscribers
    /// reached.
    #[must_use = "a count of zero means no test is listening"]
    pub fn fire_status(&self, status: Status) -> usize {
        self.status.send(status).unwrap_or(0)
    }

    /// Publishes a per-document status change and returns the number of
    /// subscribers reached.
    #[must_use = "a count of zero means no test is listening"]
    pub fn fire_intellisense_status(&self, event: IntelliSenseStatus) -> usize {
        self.intellisense.send(event).unwrap_or(0)
    }
}

impl Default for StatusEvents {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

impl CppToolsTestHook for StatusEvents {
    fn status_changed(&self) -> broadcast::Receiver<Status> {
        self.status.subscribe()
    }

    fn intellisense_status_changed(&self) -> Option<broadcast::Receiver<IntelliSenseStatus>> {
        Some(self.intellisense.subscribe())
    }
}
