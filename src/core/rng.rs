//! Injectable randomness for tile spawning.
//!
//! Spawning is the only non-deterministic step of the game. The engine never
//! reaches for a global generator; it draws from a `RandomSource` it owns.
//!
//! ## Sources
//!
//! - `GameRng`: seeded ChaCha8, the default. Same seed, same game.
//! - `ScriptedRng`: replays fixed values, for pinning exact spawns in tests.
//! - `RngSource`: adapts any `rand::RngCore`.
//!
//! ```
//! use slide_merge::core::{GameRng, RandomSource};
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.next_index(16), b.next_index(16));
//!
//! // Forks are independent but still reproducible
//! let mut fork = a.fork();
//! let x = fork.next_unit();
//! assert!((0.0..1.0).contains(&x));
//! ```

use std::collections::VecDeque;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A source of uniform random values.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform integer in `[0, n)`. Callers guarantee `n >= 1`.
    fn next_index(&mut self, n: usize) -> usize;
}

impl<S: RandomSource + ?Sized> RandomSource for Box<S> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }

    fn next_index(&mut self, n: usize) -> usize {
        (**self).next_index(n)
    }
}

/// Deterministic seeded RNG.
///
/// Uses ChaCha8 for speed; the word position makes checkpointing O(1).
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Create an RNG seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork this RNG into an independent, deterministic branch.
    ///
    /// Each successive fork gets a different seed derived from the parent.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self::new(fork_seed)
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

impl RandomSource for GameRng {
    fn next_unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    fn next_index(&mut self, n: usize) -> usize {
        self.inner.gen_range(0..n)
    }
}

/// Serializable RNG state for checkpointing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
    /// Fork counter for deterministic branching
    pub fork_counter: u64,
}

/// Adapter for any `rand` generator.
#[derive(Clone, Debug)]
pub struct RngSource<R>(pub R);

impl<R: RngCore> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn next_index(&mut self, n: usize) -> usize {
        self.0.gen_range(0..n)
    }
}

/// Replays pre-recorded values.
///
/// Exhausted queues yield `0.0` and `0`: the first empty cell, and a 2.
/// Indices are clamped into `[0, n)`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    units: VecDeque<f64>,
    indices: VecDeque<usize>,
}

impl ScriptedRng {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue unit floats.
    #[must_use]
    pub fn with_units(mut self, units: impl IntoIterator<Item = f64>) -> Self {
        self.units.extend(units);
        self
    }

    /// Queue indices.
    #[must_use]
    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(indices);
        self
    }

    /// Queue one spawn: pick the `index`-th empty cell and place `value` (2 or 4).
    ///
    /// The queued unit is an extreme of `[0, 1)`: a 2 is placed unless the
    /// four probability is 1, a 4 whenever it is at least `f64::EPSILON`.
    #[must_use]
    pub fn with_spawn(self, index: usize, value: u64) -> Self {
        let unit = if value == 4 { 1.0 - f64::EPSILON / 2.0 } else { 0.0 };
        self.with_indices([index]).with_units([unit])
    }

    /// Values left to replay, as `(units, indices)`.
    #[must_use]
    pub fn remaining(&self) -> (usize, usize) {
        (self.units.len(), self.indices.len())
    }
}

impl RandomSource for ScriptedRng {
    fn next_unit(&mut self) -> f64 {
        self.units.pop_front().unwrap_or(0.0)
    }

    fn next_index(&mut self, n: usize) -> usize {
        self.indices.pop_front().unwrap_or(0).min(n.saturating_sub(1))
    }
}
