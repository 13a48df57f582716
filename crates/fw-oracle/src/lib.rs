//! Oracle for the Factionweave faction simulation.
//!
//! A fate chart for yes/no questions with a chaos factor, random event
//! generation, and meaning tables, plus [`FactionOracle`], which frames those
//! primitives for faction play: complications, contested territory, and
//! party work twists.

pub mod adapter;
pub mod chaos;
pub mod error;
pub mod oracle;

pub use adapter::{
    FactionOracle, FactionOracleConfig, FactionOracleState, OracleEvent, OracleEventKind,
};
pub use chaos::ChaosFactor;
pub use error::{OracleError, OracleResult};
pub use oracle::{FateAnswer, Likelihood};
