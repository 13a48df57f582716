//! Error types for the core faction model.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building the faction model.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A die tag like `d6` could not be parsed.
    #[error("unknown die: {0}")]
    UnknownDie(String),
}
