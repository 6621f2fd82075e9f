//! Diagnostics error types.

use thiserror::Error;

/// Errors that can occur in the diagnostics layer
#[derive(Debug, Error)]
pub enum DiagnosticsError {
    /// Exporting recorded leaf changes failed
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A global tracing subscriber was already installed
    #[error("Logging initialization failed: {0}")]
    Logging(String),
}
