//! Tracing subscriber setup.

use super::error::DiagnosticsError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "statetree=debug,warn";

/// Initialize logging with tracing
///
/// Reads the filter from the `RUST_LOG` environment variable if available
/// and falls back to [`DEFAULT_FILTER`]. Only one global subscriber can be
/// installed per process; later calls return [`DiagnosticsError::Logging`].
///
/// # Example
///
/// ```no_run
/// use statetree::diagnostics::init_logging;
///
/// init_logging().expect("no other subscriber installed");
/// ```
pub fn init_logging() -> Result<(), DiagnosticsError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .map_err(|e| DiagnosticsError::Logging(e.to_string()))?;

    tracing::info!("statetree logging initialized");
    Ok(())
}
