//! # slide-merge
//!
//! Rule engine for a sliding-tile merge puzzle (the 2048 family) on an
//! N x N grid.
//!
//! ## Design Principles
//!
//! 1. **Rules Only**: No rendering, input devices, or persistence. Callers
//!    drive the engine and read back structured results.
//!
//! 2. **Owned State**: Grid and score belong to a `GameEngine` instance.
//!    Independent games are independent values.
//!
//! 3. **Injectable Randomness**: Tile spawning draws from a `RandomSource`
//!    the engine owns, so every game can be replayed from a seed or a script.
//!
//! ## Modules
//!
//! - `core`: Grid, directions, configuration, RNG, high score
//! - `rules`: Line transform and `GameEngine`
//! - `error`: `EngineError`
//!
//! ## Example
//!
//! ```
//! use slide_merge::{Direction, EngineConfig, GameEngine, HighScore};
//!
//! let mut engine = GameEngine::new(EngineConfig::new(4).with_seed(42)).unwrap();
//! let mut best = HighScore::default();
//!
//! while !engine.is_game_over() {
//!     let Some(&dir) = engine.legal_moves().first() else { break };
//!     engine.apply_move(dir);
//! }
//! best.record(engine.score());
//! assert!(engine.is_game_over());
//! assert_eq!(best.best(), engine.score());
//! ```

pub mod core;
pub mod error;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    Direction, EngineConfig, GameRng, GameRngState, Grid, GridSnapshot, HighScore, RandomSource, RngSource,
    ScriptedRng,
};

pub use crate::error::{EngineError, Result};

pub use crate::rules::{transform_line, GameEngine, LineMerge, LineOutcome, MergeEvent, MoveResult, SpawnedTile};
