//! Error types for uiflow.

use thiserror::Error;

/// Errors surfaced by the uiflow library.
///
/// The construction core itself never fails a build: missing-node lookups
/// are skipped and hook-processor failures are downgraded to the fallback
/// path. These variants cover the outer surfaces (JSON I/O) and the
/// hook-processing boundary, where a failure is caught and logged rather
/// than propagated out of `build()`.
#[derive(Debug, Error)]
pub enum UiflowError {
    /// A component analysis could not be deserialized.
    #[error("failed to parse component analysis: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing an analysis/diagram file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A hook processor rejected or failed on a hook record.
    #[error("hook '{hook}' could not be processed: {reason}")]
    HookProcessing { hook: String, reason: String },
}

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, UiflowError>;
