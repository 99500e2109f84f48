//! Opt-in structured logging for embedders of the negotiator.
//!
//! The library only emits `tracing` events. Embedders without their own
//! subscriber can call [`initialise`] to route those events to stderr through
//! a registry carrying the configured filter and one output layer.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use cpptools_config::{Config, LogFormat};

static INSTALLED_FORMAT: OnceCell<LogFormat> = OnceCell::new();

/// Proof that the global subscriber is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryHandle {
    format: LogFormat,
}

impl TelemetryHandle {
    /// Format of the subscriber that won installation.
    #[must_use]
    pub const fn format(self) -> LogFormat {
        self.format
    }
}

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured log filter expression did not parse.
    #[error("invalid log filter '{filter}': {reason}")]
    Filter {
        /// Expression that was rejected.
        filter: String,
        /// Parser complaint.
        reason: String,
    },
    /// Another global subscriber was installed first.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(#[from] SetGlobalDefaultError),
}

/// Installs the global tracing subscriber on first use.
///
/// Later calls report the format installed by the first call and ignore
/// their own configuration.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for an unparsable filter and
/// [`TelemetryError::Subscriber`] when a subscriber is already installed by
/// someone else.
///
/// # Examples
///
/// ```rust
/// use cpptools_api::telemetry;
/// use cpptools_config::{Config, LogFormat};
///
/// # fn main() -> Result<(), cpptools_api::telemetry::TelemetryError> {
/// let first = telemetry::initialise(&Config::default())?;
/// let compact = Config {
///     log_format: LogFormat::Compact,
///     ..Config::default()
/// };
/// let second = telemetry::initialise(&compact)?;
/// assert_eq!(second.format(), first.format());
/// # Ok(())
/// # }
/// ```
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    INSTALLED_FORMAT
        .get_or_try_init(|| install(config))
        .map(|format| TelemetryHandle { format: *format })
}

fn install(config: &Config) -> Result<LogFormat, TelemetryError> {
    let format = config.log_format();
    let subscriber = tracing_subscriber::registry()
        .with(event_filter(config)?)
        .with(output_layer(format));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(format)
}

fn event_filter(config: &Config) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(config.log_filter()).map_err(|error| TelemetryError::Filter {
        filter: config.log_filter().to_owned(),
        reason: error.to_string(),
    })
}

fn output_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let layer = fmt::layer()
        .with_target(true)
        .with_writer(io::stderr)
        .with_timer(fmt::time::UtcTime::rfc_3339());
    if format.is_structured() {
        layer.json().flatten_event(true).boxed()
    } else {
        layer
            .with_ansi(io::stderr().is_terminal())
            .compact()
            .boxed()
    }
}
