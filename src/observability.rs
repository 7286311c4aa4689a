//! Logging initialization.

use std::sync::OnceLock;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::{Error, Result};

static LOGGING_INIT: OnceLock<()> = OnceLock::new();

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// Newline-delimited JSON, for log shippers.
    Json,
}

/// Initializes the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set; `verbose` bumps the
/// default from `info` to `debug`. Safe to call once per process.
///
/// # Errors
///
/// Returns [`Error::Configuration`] when a subscriber is already
/// installed.
pub fn init(format: LogFormat, verbose: bool) -> Result<()> {
    if LOGGING_INIT.get().is_some() {
        return Err(Error::Configuration(
            "logging already initialized".to_string(),
        ));
    }

    let default_directive = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
    };

    result.map_err(|e| Error::Configuration(format!("logging init failed: {e}")))?;
    let _ = LOGGING_INIT.set(());
    Ok(())
}
