//! Engine configuration.
//!
//! The defaults reproduce the classic game: a 4x4 grid, two opening tiles,
//! and spawns that are a 4 one time in ten.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Smallest playable grid dimension.
pub const MIN_SIZE: usize = 2;

/// Largest grid dimension. Keeps the cell count and its allocation bounded.
pub const MAX_SIZE: usize = 1024;

/// Default grid dimension.
pub const DEFAULT_SIZE: usize = 4;

/// Default probability that a spawned tile is a 4 instead of a 2.
pub const DEFAULT_FOUR_PROBABILITY: f64 = 0.1;

/// Default number of tiles dealt when a game starts.
pub const DEFAULT_STARTING_TILES: usize = 2;

/// Configuration for a `GameEngine`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Grid dimension N (the grid is N x N).
    pub size: usize,

    /// Probability that a spawned tile is a 4.
    pub four_probability: f64,

    /// Tiles dealt by `new_game`.
    pub starting_tiles: usize,

    /// Seed for the default RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            four_probability: DEFAULT_FOUR_PROBABILITY,
            starting_tiles: DEFAULT_STARTING_TILES,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Create a configuration for an N x N grid with default rules.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Set the grid dimension.
    #[must_use]
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Set the probability of spawning a 4.
    #[must_use]
    pub fn with_four_probability(mut self, p: f64) -> Self {
        self.four_probability = p;
        self
    }

    /// Set the number of opening tiles.
    #[must_use]
    pub fn with_starting_tiles(mut self, count: usize) -> Self {
        self.starting_tiles = count;
        self
    }

    /// Seed the default RNG.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of cells on the grid, `None` if it does not fit in a `usize`.
    #[must_use]
    pub fn cell_count(&self) -> Option<usize> {
        self.size.checked_mul(self.size)
    }

    /// Check that a game can be played with this configuration.
    pub fn validate(&self) -> Result<()> {
        if self.size < MIN_SIZE {
            return Err(EngineError::config(format!(
                "size must be at least {}, got {}",
                MIN_SIZE, self.size
            )));
        }
        if self.size > MAX_SIZE {
            return Err(EngineError::config(format!(
                "size must be at most {}, got {}",
                MAX_SIZE, self.size
            )));
        }
        let cells = self
            .cell_count()
            .ok_or_else(|| EngineError::config(format!("size {} overflows the cell count", self.size)))?;
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(EngineError::config(format!(
                "four_probability must be within [0, 1], got {}",
                self.four_probability
            )));
        }
        if self.starting_tiles > cells {
            return Err(EngineError::config(format!(
                "cannot deal {} starting tiles on a {}x{} grid",
                self.starting_tiles, self.size, self.size
            )));
        }
        Ok(())
    }
}
