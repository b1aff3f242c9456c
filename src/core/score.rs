//! Best-score tracking.
//!
//! The engine only reports the running score. Comparing it against a
//! historical best belongs to the caller; `HighScore` is the in-memory half
//! of that. Where the best is stored between runs is up to the caller, which
//! is why the type is serializable and nothing more.

use serde::{Deserialize, Serialize};

/// Highest score seen so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    #[must_use]
    pub const fn new(best: u64) -> Self {
        Self { best }
    }

    #[must_use]
    pub const fn best(&self) -> u64 {
        self.best
    }

    /// Record a score. Returns true if it beat the previous best.
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }
}
