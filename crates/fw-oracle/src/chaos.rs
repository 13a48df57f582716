//! Chaos factor tracking.
//!
//! The chaos factor (1-9) is how unpredictable the world currently is.
//! Higher chaos raises fate chart thresholds and makes random events more
//! likely.

use serde::{Deserialize, Serialize};

use crate::error::{OracleError, OracleResult};

/// The chaos factor, from 1 (orderly) to 9 (chaotic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct ChaosFactor {
    value: u32,
}

impl ChaosFactor {
    /// Lowest chaos.
    pub const MIN: u32 = 1;
    /// Highest chaos.
    pub const MAX: u32 = 9;

    /// Create a chaos factor, clamped to 1-9.
    pub fn new(value: u32) -> Self {
        Self {
            value: value.clamp(Self::MIN, Self::MAX),
        }
    }

    /// Create a chaos factor, rejecting values outside 1-9.
    pub fn try_new(value: u32) -> OracleResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self { value })
        } else {
            Err(OracleError::InvalidChaos(value))
        }
    }

    /// Current value.
    pub fn value(self) -> u32 {
        self.value
    }

    /// Set a new value, clamped. Returns the stored value.
    pub fn set(&mut self, value: u32) -> u32 {
        *self = Self::new(value);
        self.value
    }

    /// Raise by one, capped at 9. Returns the new value.
    pub fn increase(&mut self) -> u32 {
        self.set(self.value + 1)
    }

    /// Lower by one, floored at 1. Returns the new value.
    pub fn decrease(&mut self) -> u32 {
        self.set(self.value.saturating_sub(1))
    }
}

impl From<u32> for ChaosFactor {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<ChaosFactor> for u32 {
    fn from(chaos: ChaosFactor) -> Self {
        chaos.value
    }
}

impl Default for ChaosFactor {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_five() {
        assert_eq!(ChaosFactor::default().value(), 5);
    }

    #[test]
    fn clamped_on_creation() {
        assert_eq!(ChaosFactor::new(0).value(), 1);
        assert_eq!(ChaosFactor::new(100).value(), 9);
        assert!(ChaosFactor::try_new(0).is_err());
        assert_eq!(ChaosFactor::try_new(4).unwrap().value(), 4);
    }

    #[test]
    fn increase_and_decrease_saturate() {
        let mut c = ChaosFactor::new(8);
        assert_eq!(c.increase(), 9);
        assert_eq!(c.increase(), 9);
        let mut c = ChaosFactor::new(2);
        assert_eq!(c.decrease(), 1);
        assert_eq!(c.decrease(), 1);
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&ChaosFactor::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: ChaosFactor = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value(), 7);
        let clamped: ChaosFactor = serde_json::from_str("12").unwrap();
        assert_eq!(clamped.value(), 9);
    }
}
