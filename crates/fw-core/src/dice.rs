//! Dice types and the deterministic dice source.
//!
//! Every random decision in a faction cycle (progress rolls, replacement
//! picks, oracle rolls) is drawn from a single [`DiceSource`] that the engine
//! owns and lends out explicitly. [`SeededDice`] derives each draw from the
//! seed and the draw counter alone, so `{seed, draws}` is a complete snapshot
//! of the stream.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
    /// Percentile die (1-100).
    D100,
    /// A die with a custom number of sides.
    Custom(u32),
}

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::D100 => 100,
            Self::Custom(n) => n,
        }
    }

    /// Parse a die from a tag like `"d6"` or `"D20"`.
    pub fn parse(tag: &str) -> CoreResult<Self> {
        let s = tag.trim().to_lowercase();
        match s.as_str() {
            "d4" => Ok(Self::D4),
            "d6" => Ok(Self::D6),
            "d8" => Ok(Self::D8),
            "d10" => Ok(Self::D10),
            "d12" => Ok(Self::D12),
            "d20" => Ok(Self::D20),
            "d100" => Ok(Self::D100),
            other => other
                .strip_prefix('d')
                .and_then(|n| n.parse::<u32>().ok())
                .filter(|n| *n >= 2)
                .map(Self::Custom)
                .ok_or_else(|| CoreError::UnknownDie(tag.to_string())),
        }
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// Serializable position of a dice stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiceState {
    /// Seed the stream was created from.
    pub seed: u64,
    /// Number of draws consumed so far.
    pub draws: u64,
}

/// An injected source of dice rolls.
///
/// Components never hold an RNG of their own; they borrow the engine's
/// source for the duration of a call.
pub trait DiceSource: std::fmt::Debug {
    /// Roll a value in `low..=high`. Consumes exactly one draw.
    fn roll_range(&mut self, low: u32, high: u32) -> u32;

    /// Current position of the stream.
    fn state(&self) -> DiceState;

    /// Move the stream to a previously captured position.
    fn restore(&mut self, state: DiceState);

    /// Roll a single die.
    fn roll(&mut self, die: Die) -> u32 {
        self.roll_range(1, die.sides())
    }

    /// Roll percentile dice (1-100).
    fn d100(&mut self) -> u32 {
        self.roll_range(1, 100)
    }

    /// Pick a uniform index into a collection of `len` items, or `None` if empty.
    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let max = u32::try_from(len).unwrap_or(u32::MAX);
        Some((self.roll_range(1, max) - 1) as usize)
    }
}

/// Seeded dice whose n-th draw depends only on `(seed, n)`.
#[derive(Debug, Clone)]
pub struct SeededDice {
    seed: u64,
    draws: u64,
}

impl SeededDice {
    /// Create a fresh stream at draw 0.
    pub fn new(seed: u64) -> Self {
        Self { seed, draws: 0 }
    }

    /// Resume a stream at a captured position.
    pub fn from_state(state: DiceState) -> Self {
        Self {
            seed: state.seed,
            draws: state.draws,
        }
    }

    fn draw_rng(&mut self) -> StdRng {
        let key = splitmix64(self.seed ^ splitmix64(self.draws));
        self.draws += 1;
        StdRng::seed_from_u64(key)
    }
}

impl Default for SeededDice {
    fn default() -> Self {
        Self::new(42)
    }
}

impl DiceSource for SeededDice {
    fn roll_range(&mut self, low: u32, high: u32) -> u32 {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        self.draw_rng().random_range(low..=high)
    }

    fn state(&self) -> DiceState {
        DiceState {
            seed: self.seed,
            draws: self.draws,
        }
    }

    fn restore(&mut self, state: DiceState) {
        self.seed = state.seed;
        self.draws = state.draws;
    }
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Dice that replay a fixed script of values.
///
/// Each value is clamped into the requested range. Once the script is
/// exhausted the last value repeats. Useful for replaying a known sequence
/// of table rolls.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    script: Vec<u32>,
    draws: u64,
}

impl ScriptedDice {
    /// Create dice that return `script` in order.
    pub fn new(script: impl Into<Vec<u32>>) -> Self {
        Self {
            script: script.into(),
            draws: 0,
        }
    }

    /// Number of draws consumed so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl DiceSource for ScriptedDice {
    fn roll_range(&mut self, low: u32, high: u32) -> u32 {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let idx = usize::try_from(self.draws).unwrap_or(usize::MAX);
        self.draws += 1;
        let value = self
            .script
            .get(idx)
            .or_else(|| self.script.last())
            .copied()
            .unwrap_or(low);
        value.clamp(low, high)
    }

    fn state(&self) -> DiceState {
        DiceState {
            seed: 0,
            draws: self.draws,
        }
    }

    fn restore(&mut self, state: DiceState) {
        self.draws = state.draws;
    }
}
