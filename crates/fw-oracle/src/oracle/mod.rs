//! The generic oracle primitive.
//!
//! A fate chart for yes/no questions, random event generation, and meaning
//! tables. Every roll is drawn from a borrowed [`fw_core::DiceSource`].

pub mod event;
pub mod fate_chart;
pub mod tables;

pub use event::{EventFocus, RandomEvent, generate_random_event, roll_event_focus};
pub use fate_chart::{FateAnswer, FateCheck, Likelihood, consult, fate_threshold};
pub use tables::{MeaningRoll, MeaningTables};
