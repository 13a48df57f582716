//! Error types for the oracle.

use thiserror::Error;

/// Result type for oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;

/// Errors raised while configuring or querying the oracle.
#[derive(Debug, Error)]
pub enum OracleError {
    /// A likelihood string did not match any rung.
    #[error("invalid likelihood: {0}")]
    InvalidLikelihood(String),

    /// A chaos factor outside 1-9 was supplied where clamping is not allowed.
    #[error("chaos factor {0} is outside 1-9")]
    InvalidChaos(u32),
}
