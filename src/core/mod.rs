//! Core types: grid, directions, configuration, randomness, score tracking.
//!
//! Everything here is plain data. The move rules live in `rules`.

pub mod config;
pub mod direction;
pub mod grid;
pub mod rng;
pub mod score;

pub use config::{EngineConfig, DEFAULT_FOUR_PROBABILITY, DEFAULT_SIZE, DEFAULT_STARTING_TILES, MAX_SIZE, MIN_SIZE};
pub use direction::Direction;
pub use grid::{Grid, GridSnapshot, MAX_TILE};
pub use rng::{GameRng, GameRngState, RandomSource, RngSource, ScriptedRng};
pub use score::HighScore;
