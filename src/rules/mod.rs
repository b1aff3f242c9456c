//! Move rules and the game engine.
//!
//! - `line`: slide and merge a single row or column
//! - `engine`: `GameEngine`, which applies moves to the whole grid,
//!   spawns tiles, keeps score, and detects game over

pub mod engine;
pub mod line;

pub use engine::{GameEngine, MergeEvent, MoveResult, SpawnedTile};
pub use line::{transform_line, LineMerge, LineOutcome};
