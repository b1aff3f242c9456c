//! The game engine: grid, score, and the move rules.
//!
//! A `GameEngine` exclusively owns one game session. It is single-writer and
//! synchronous; callers that share an engine across threads must serialize
//! access themselves (one engine per session, behind a lock or an actor).
//!
//! ## Move cycle
//!
//! 1. Every line (rows for Left/Right, columns for Up/Down) is slid and
//!    merged toward the target edge.
//! 2. If any cell changed, exactly one tile spawns in a random empty cell.
//! 3. Game over is re-evaluated from the grid contents.
//!
//! A move that changes nothing spawns nothing and cannot end the game.
//!
//! ```
//! use slide_merge::{Direction, EngineConfig, GameEngine};
//!
//! let mut engine = GameEngine::new(EngineConfig::default().with_seed(7)).unwrap();
//! assert_eq!(engine.grid().occupied_count(), 2);
//!
//! let result = engine.apply_move(Direction::Left);
//! if result.changed {
//!     assert!(result.spawned.is_some());
//! }
//! assert_eq!(engine.score(), result.score_delta);
//! ```

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::line::transform_line;
use crate::core::{Direction, EngineConfig, GameRng, Grid, GridSnapshot, RandomSource};
use crate::error::{EngineError, Result};

/// A tile placed by the spawn rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnedTile {
    pub row: usize,
    pub col: usize,
    /// 2 or 4.
    pub value: u64,
}

/// A merge that happened during a move, at its final grid position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeEvent {
    pub row: usize,
    pub col: usize,
    /// Value of the merged tile (also the points it scored).
    pub value: u64,
}

/// What a call to `apply_move` did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    /// True if any cell changed before the spawn.
    pub changed: bool,
    /// Points gained by this move.
    pub score_delta: u64,
    /// The tile spawned after a changing move.
    pub spawned: Option<SpawnedTile>,
    /// Merges, line by line, leading edge first.
    pub merges: Vec<MergeEvent>,
    /// True if no move can change the grid any more.
    pub game_over: bool,
}

/// Owns the grid and score of a single game.
#[derive(Clone, Debug)]
pub struct GameEngine<R = GameRng> {
    config: EngineConfig,
    grid: Grid,
    score: u64,
    moves_made: u64,
    rng: R,
}

impl GameEngine<GameRng> {
    /// Create an engine and deal the opening tiles.
    ///
    /// Uses `config.seed` for the RNG, or entropy if unset.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        Self::with_rng(config, rng)
    }
}

impl<R: RandomSource> GameEngine<R> {
    /// Create an engine with an injected random source and deal the opening tiles.
    pub fn with_rng(config: EngineConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let mut engine = Self {
            grid: Grid::new(config.size),
            config,
            score: 0,
            moves_made: 0,
            rng,
        };
        engine.deal();
        Ok(engine)
    }

    /// Start a new game on an N x N grid.
    ///
    /// Fails with `InvalidConfiguration` for N < 2, leaving the current game untouched.
    pub fn new_game(&mut self, size: usize) -> Result<GridSnapshot> {
        let config = self.config.clone().with_size(size);
        config.validate()?;
        self.config = config;
        Ok(self.deal())
    }

    /// Start over at the current size.
    pub fn restart(&mut self) -> GridSnapshot {
        self.deal()
    }

    fn deal(&mut self) -> GridSnapshot {
        self.grid = Grid::new(self.config.size);
        self.score = 0;
        self.moves_made = 0;
        for _ in 0..self.config.starting_tiles {
            self.spawn_random_tile();
        }
        debug!(
            "new game: {}x{} grid, {} starting tiles",
            self.config.size,
            self.config.size,
            self.grid.occupied_count()
        );
        self.grid.snapshot()
    }

    /// Resume from a saved position.
    ///
    /// The rows must form a square of size >= 2 holding 0 or powers of two >= 2.
    /// Tiles of `MAX_TILE` are accepted but never merge. The move counter
    /// restarts at 0.
    pub fn load_position(&mut self, snapshot: &GridSnapshot, score: u64) -> Result<()> {
        let grid = Grid::from_rows(snapshot.rows())
            .ok_or_else(|| EngineError::config("grid rows must form a square"))?;
        let config = self.config.clone().with_size(grid.size());
        config.validate()?;

        if let Some(bad) = snapshot
            .rows()
            .iter()
            .flatten()
            .find(|&&v| v != 0 && (v < 2 || !v.is_power_of_two()))
        {
            return Err(EngineError::config(format!("{bad} is not a valid tile value")));
        }

        self.config = config;
        self.grid = grid;
        self.score = score;
        self.moves_made = 0;
        debug!("loaded {}x{} position with score {}", self.grid.size(), self.grid.size(), score);
        Ok(())
    }

    /// Place one tile in a uniformly chosen empty cell: a 2, or a 4 with
    /// probability `four_probability`. Does nothing on a full grid.
    pub fn spawn_random_tile(&mut self) -> Option<SpawnedTile> {
        let empty = self.grid.empty_cells();
        if empty.is_empty() {
            return None;
        }

        let (row, col) = empty[self.rng.next_index(empty.len())];
        let value = if self.rng.next_unit() < 1.0 - self.config.four_probability {
            2
        } else {
            4
        };
        self.grid.set(row, col, value);
        trace!("spawned {value} at ({row}, {col})");

        Some(SpawnedTile { row, col, value })
    }

    /// Slide and merge every line toward `direction`.
    pub fn apply_move(&mut self, direction: Direction) -> MoveResult {
        let mut result = MoveResult::default();

        for index in 0..self.grid.size() {
            let before = self.grid.line(index, direction);
            let outcome = transform_line(&before, direction.toward_start());
            if !outcome.changed_from(&before) {
                continue;
            }

            result.changed = true;
            result.score_delta = result.score_delta.saturating_add(outcome.score_delta);
            result.merges.extend(outcome.merges.iter().map(|m| {
                let (row, col) = Grid::line_cell(direction, index, m.index);
                MergeEvent { row, col, value: m.value }
            }));
            self.grid.set_line(index, direction, &outcome.cells);
        }

        if result.changed {
            self.score = self.score.saturating_add(result.score_delta);
            self.moves_made += 1;
            result.spawned = self.spawn_random_tile();
        }
        result.game_over = self.is_game_over();

        trace!(
            "move {direction}: changed={} +{} score={}",
            result.changed,
            result.score_delta,
            self.score
        );
        if result.changed && result.game_over {
            debug!(
                "game over after {} moves: score {}, highest tile {}",
                self.moves_made,
                self.score,
                self.grid.highest_tile()
            );
        }

        result
    }

    /// Apply a move given as a numeric code (0=Up, 1=Down, 2=Left, 3=Right).
    pub fn apply_move_code(&mut self, code: u8) -> Result<MoveResult> {
        let direction = Direction::try_from(code)?;
        Ok(self.apply_move(direction))
    }

    /// Apply a move given as text (`"left"`, `"ArrowLeft"`, ...).
    pub fn apply_raw_move(&mut self, raw: &str) -> Result<MoveResult> {
        let direction: Direction = raw.parse()?;
        Ok(self.apply_move(direction))
    }

    /// True if the grid is full and no two adjacent cells are equal.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.grid.is_full() && !self.grid.has_adjacent_pair()
    }

    /// True if moving in `direction` would change the grid.
    #[must_use]
    pub fn can_move(&self, direction: Direction) -> bool {
        (0..self.grid.size()).any(|index| {
            let line = self.grid.line(index, direction);
            transform_line(&line, direction.toward_start()).changed_from(&line)
        })
    }

    /// Directions that would change the grid.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Direction> {
        Direction::ALL.into_iter().filter(|&d| self.can_move(d)).collect()
    }

    /// Read-only copy of the grid.
    #[must_use]
    pub fn grid(&self) -> GridSnapshot {
        self.grid.snapshot()
    }

    /// Value at `(row, col)`, `None` if out of bounds.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<u64> {
        self.grid.get(row, col)
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    #[must_use]
    pub fn highest_tile(&self) -> u64 {
        self.grid.highest_tile()
    }

    /// Changing moves since the game started.
    #[must_use]
    pub fn moves_made(&self) -> u64 {
        self.moves_made
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn rng(&self) -> &R {
        &self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::MAX_TILE;
    use crate::core::ScriptedRng;

    fn engine_at(rows: &[&[u64]], rng: ScriptedRng) -> GameEngine<ScriptedRng> {
        let rows: Vec<Vec<u64>> = rows.iter().map(|r| r.to_vec()).collect();
        let config = EngineConfig::new(rows.len()).with_starting_tiles(0);
        let mut engine = GameEngine::with_rng(config, rng).unwrap();
        let snapshot = Grid::from_rows(&rows).unwrap().snapshot();
        engine.load_position(&snapshot, 0).unwrap();
        engine
    }

    #[test]
    fn test_new_game_deals_two_tiles() {
        let engine = GameEngine::new(EngineConfig::default().with_seed(1)).unwrap();
        let grid = engine.grid();
        assert_eq!(grid.size(), 4);
        assert_eq!(grid.occupied_count(), 2);
        assert_eq!(engine.score(), 0);
        for &v in grid.rows().iter().flatten() {
            assert!(v == 0 || v == 2 || v == 4);
        }
    }

    #[test]
    fn test_new_game_rejects_small_size() {
        let mut engine = GameEngine::new(EngineConfig::default().with_seed(1)).unwrap();
        let before = engine.grid();

        let err = engine.new_game(1).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration { .. }));
        assert_eq!(engine.grid(), before);
        assert_eq!(engine.size(), 4);

        assert!(GameEngine::new(EngineConfig::new(0)).is_err());
    }

    #[test]
    fn test_new_game_rejects_huge_size() {
        let mut engine = GameEngine::new(EngineConfig::default().with_seed(1)).unwrap();
        let before = engine.grid();

        for size in [1usize << 33, usize::MAX] {
            let err = engine.new_game(size).unwrap_err();
            assert!(matches!(err, EngineError::InvalidConfiguration { .. }));
        }
        assert_eq!(engine.grid(), before);
        assert_eq!(engine.size(), 4);
    }

    #[test]
    fn test_new_game_resizes() {
        let mut engine = GameEngine::new(EngineConfig::default().with_seed(1)).unwrap();
        let grid = engine.new_game(6).unwrap();
        assert_eq!(grid.size(), 6);
        assert_eq!(grid.occupied_count(), 2);
        assert_eq!(engine.config().size, 6);

        // Restart keeps the new size
        assert_eq!(engine.restart().size(), 6);
    }

    #[test]
    fn test_scripted_spawns() {
        let rng = ScriptedRng::new().with_spawn(0, 2).with_spawn(14, 4);
        let engine = GameEngine::with_rng(EngineConfig::default(), rng).unwrap();
        // Second spawn indexes the 15 remaining empty cells
        assert_eq!(engine.cell(0, 0), Some(2));
        assert_eq!(engine.cell(3, 3), Some(4));
    }

    #[test]
    fn test_move_left_merges_and_spawns() {
        let rng = ScriptedRng::new().with_spawn(0, 2);
        let mut engine = engine_at(
            &[&[2, 2, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            rng,
        );

        let result = engine.apply_move(Direction::Left);
        assert!(result.changed);
        assert_eq!(result.score_delta, 4);
        assert_eq!(result.merges, vec![MergeEvent { row: 0, col: 0, value: 4 }]);
        // First empty cell after the slide is (0, 1)
        assert_eq!(result.spawned, Some(SpawnedTile { row: 0, col: 1, value: 2 }));
        assert!(!result.game_over);
        assert_eq!(engine.grid().rows()[0], vec![4, 2, 0, 0]);
        assert_eq!(engine.score(), 4);
        assert_eq!(engine.moves_made(), 1);
    }

    #[test]
    fn test_move_down_merge_position() {
        let mut engine = engine_at(&[&[2, 0, 0], &[0, 0, 0], &[2, 0, 0]], ScriptedRng::new());

        let result = engine.apply_move(Direction::Down);
        assert_eq!(result.merges, vec![MergeEvent { row: 2, col: 0, value: 4 }]);
        assert_eq!(engine.cell(2, 0), Some(4));
    }

    #[test]
    fn test_noop_move_spawns_nothing() {
        let mut engine = engine_at(&[&[2, 4], &[0, 0]], ScriptedRng::new());

        let result = engine.apply_move(Direction::Up);
        assert!(!result.changed);
        assert_eq!(result.spawned, None);
        assert_eq!(result.score_delta, 0);
        assert!(result.merges.is_empty());
        assert_eq!(engine.grid().occupied_count(), 2);
        assert_eq!(engine.moves_made(), 0);
    }

    #[test]
    fn test_game_over_detection() {
        let engine = engine_at(
            &[&[2, 4, 2, 4], &[4, 2, 4, 2], &[2, 4, 2, 4], &[4, 2, 4, 2]],
            ScriptedRng::new(),
        );
        assert!(engine.is_game_over());
        assert!(engine.legal_moves().is_empty());

        let engine = engine_at(
            &[&[2, 4, 2, 4], &[4, 2, 4, 2], &[2, 4, 2, 4], &[4, 8, 8, 2]],
            ScriptedRng::new(),
        );
        assert!(!engine.is_game_over());
        assert_eq!(engine.legal_moves(), vec![Direction::Left, Direction::Right]);
    }

    #[test]
    fn test_move_that_fills_grid_ends_game() {
        // After Left: [4, 8, 0] -> spawn fills (0, 2)
        let rng = ScriptedRng::new().with_spawn(0, 2);
        let mut engine = engine_at(&[&[2, 2, 8], &[8, 16, 32], &[64, 128, 256]], rng);

        let result = engine.apply_move(Direction::Left);
        assert!(result.changed);
        assert_eq!(engine.grid().rows()[0], vec![4, 8, 2]);
        assert!(result.game_over);
        assert!(engine.is_game_over());

        // Nothing changes any more
        for dir in Direction::ALL {
            let r = engine.apply_move(dir);
            assert!(!r.changed);
            assert!(r.game_over);
        }
        assert_eq!(engine.score(), 4);
    }

    #[test]
    fn test_spawn_on_full_grid_is_noop() {
        let mut engine = engine_at(&[&[2, 4], &[8, 16]], ScriptedRng::new());
        assert_eq!(engine.spawn_random_tile(), None);
    }

    #[test]
    fn test_four_probability_extremes() {
        let config = EngineConfig::default().with_seed(3).with_four_probability(1.0);
        let engine = GameEngine::new(config).unwrap();
        assert!(engine.grid().rows().iter().flatten().all(|&v| v == 0 || v == 4));

        let config = EngineConfig::default().with_seed(3).with_four_probability(0.0);
        let engine = GameEngine::new(config).unwrap();
        assert!(engine.grid().rows().iter().flatten().all(|&v| v == 0 || v == 2));
    }

    #[test]
    fn test_default_spawn_distribution() {
        let config = EngineConfig::default().with_starting_tiles(0).with_seed(2024);
        let mut engine = GameEngine::new(config).unwrap();

        const SPAWNS: usize = 10_000;
        let mut fours = 0;
        let mut hits = [[0usize; 4]; 4];
        for _ in 0..SPAWNS {
            engine.restart();
            let tile = engine.spawn_random_tile().unwrap();
            assert!(tile.value == 2 || tile.value == 4);
            if tile.value == 4 {
                fours += 1;
            }
            hits[tile.row][tile.col] += 1;
        }

        let share = fours as f64 / SPAWNS as f64;
        assert!((0.08..=0.12).contains(&share), "share of 4s was {share}");

        // Uniform over 16 cells: expect 625 each
        for &count in hits.iter().flatten() {
            assert!((450..=800).contains(&count), "cell chosen {count} times");
        }
    }

    #[test]
    fn test_scripted_four_with_low_probability() {
        let rng = ScriptedRng::new().with_spawn(0, 4).with_spawn(0, 2);
        let config = EngineConfig::default().with_four_probability(0.01);
        let engine = GameEngine::with_rng(config, rng).unwrap();
        assert_eq!(engine.cell(0, 0), Some(4));
        assert_eq!(engine.cell(0, 1), Some(2));
    }

    #[test]
    fn test_largest_tiles_never_overflow() {
        let top = MAX_TILE;
        let mut engine = engine_at(&[&[top, top], &[0, 0]], ScriptedRng::new());

        let r = engine.apply_move(Direction::Left);
        assert!(!r.changed);
        assert_eq!(engine.cell(0, 0), Some(top));
        assert_eq!(engine.cell(0, 1), Some(top));

        // Full grid of unmergeable pairs is over
        let engine = engine_at(&[&[top, top], &[2, 4]], ScriptedRng::new());
        assert!(engine.is_game_over());
    }

    #[test]
    fn test_score_saturates() {
        let mut engine = engine_at(&[&[2, 2], &[0, 0]], ScriptedRng::new());
        let snapshot = engine.grid();
        engine.load_position(&snapshot, u64::MAX - 1).unwrap();

        let r = engine.apply_move(Direction::Left);
        assert_eq!(r.score_delta, 4);
        assert_eq!(engine.score(), u64::MAX);
    }

    #[test]
    fn test_invalid_direction_input() {
        let mut engine = GameEngine::new(EngineConfig::default().with_seed(5)).unwrap();
        let before = engine.grid();

        assert!(matches!(
            engine.apply_move_code(9),
            Err(EngineError::InvalidDirection { .. })
        ));
        assert!(matches!(
            engine.apply_raw_move("Escape"),
            Err(EngineError::InvalidDirection { .. })
        ));
        assert_eq!(engine.grid(), before);
        assert_eq!(engine.score(), 0);

        assert!(engine.apply_raw_move("ArrowDown").is_ok());
        assert!(engine.apply_move_code(0).is_ok());
    }

    #[test]
    fn test_load_position_validation() {
        let mut engine = GameEngine::new(EngineConfig::default().with_seed(5)).unwrap();

        let empty = GridSnapshot::from(&Grid::new(3));
        assert!(engine.load_position(&empty, 0).is_ok());
        assert_eq!(engine.size(), 3);

        let bad_value = Grid::from_rows(&[vec![3, 0], vec![0, 0]]).unwrap().snapshot();
        assert!(engine.load_position(&bad_value, 0).is_err());

        let one = Grid::from_rows(&[vec![1, 0], vec![0, 0]]).unwrap().snapshot();
        assert!(engine.load_position(&one, 0).is_err());

        let tiny = Grid::from_rows(&[vec![2]]).unwrap().snapshot();
        assert!(engine.load_position(&tiny, 0).is_err());
        assert_eq!(engine.size(), 3);
    }

    #[test]
    fn test_restart_resets_score() {
        let rng = ScriptedRng::new().with_spawn(0, 2);
        let mut engine = engine_at(&[&[2, 2], &[0, 0]], rng);
        engine.apply_move(Direction::Right);
        assert_eq!(engine.score(), 4);

        let grid = engine.restart();
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.moves_made(), 0);
        assert_eq!(grid.size(), 2);
        assert_eq!(grid.occupied_count(), 0);
    }
}
