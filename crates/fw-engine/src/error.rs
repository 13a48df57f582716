//! Error types for the faction engine.
//!
//! Errors only surface at load and query boundaries. Nothing inside a cycle
//! returns one; cycle failures are reported in the result structures.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised while loading, restoring, or querying the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A file could not be read or written.
    #[error("cannot access {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A scenario or snapshot was not valid JSON for its type.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A faction id is not defined.
    #[error("unknown faction: {0}")]
    UnknownFaction(String),

    /// An operation needs party state and none is attached.
    #[error("no party state attached")]
    NoPartyState,

    /// A core model error.
    #[error(transparent)]
    Core(#[from] fw_core::CoreError),

    /// An oracle error.
    #[error(transparent)]
    Oracle(#[from] fw_oracle::OracleError),
}
