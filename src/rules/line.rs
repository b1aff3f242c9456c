//! Single-line slide and merge.
//!
//! Every move reduces to this: compact a line toward one end, then merge
//! adjacent equal tiles pairwise from that end. A tile produced by a merge
//! never merges again in the same move, so `[2, 2, 2, 2]` becomes `[4, 4]`
//! and not `[8]`.
//!
//! The score for a move is the sum of the merged values. Tiles of
//! `MAX_TILE` and above never merge, so values cannot overflow.
//!
//! ```
//! use slide_merge::rules::transform_line;
//!
//! let out = transform_line(&[0, 2, 0, 2], false);
//! assert_eq!(out.cells, vec![0, 0, 0, 4]);
//! assert_eq!(out.score_delta, 4);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::grid::MAX_TILE;

/// A merge within one line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMerge {
    /// Position of the merged tile in the output line (grid order).
    pub index: usize,
    /// Value of the merged tile.
    pub value: u64,
}

/// Result of transforming one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineOutcome {
    /// New cell values, same length and orientation as the input.
    pub cells: Vec<u64>,
    /// Points gained from merges.
    pub score_delta: u64,
    /// Merges, in the order they happened (leading edge first).
    pub merges: SmallVec<[LineMerge; 4]>,
}

impl LineOutcome {
    /// True if the line differs from `before`.
    #[must_use]
    pub fn changed_from(&self, before: &[u64]) -> bool {
        self.cells.as_slice() != before
    }
}

/// Slide and merge one line.
///
/// `line` is in grid order. With `toward_start` tiles move toward index 0
/// (Up/Left), otherwise toward the last index (Down/Right).
#[must_use]
pub fn transform_line(line: &[u64], toward_start: bool) -> LineOutcome {
    let len = line.len();

    // Leading edge first
    let tiles: Vec<u64> = if toward_start {
        line.iter().copied().filter(|&v| v != 0).collect()
    } else {
        line.iter().rev().copied().filter(|&v| v != 0).collect()
    };

    let mut packed = Vec::with_capacity(len);
    let mut merges: SmallVec<[LineMerge; 4]> = SmallVec::new();
    let mut score_delta: u64 = 0;

    let mut i = 0;
    while i < tiles.len() {
        let value = tiles[i];
        if value < MAX_TILE && i + 1 < tiles.len() && tiles[i + 1] == value {
            let merged = value * 2;
            score_delta = score_delta.saturating_add(merged);
            merges.push(LineMerge {
                index: packed.len(),
                value: merged,
            });
            packed.push(merged);
            i += 2;
        } else {
            packed.push(value);
            i += 1;
        }
    }

    packed.resize(len, 0);

    if !toward_start {
        packed.reverse();
        for merge in merges.iter_mut() {
            merge.index = len - 1 - merge.index;
        }
    }

    LineOutcome {
        cells: packed,
        score_delta,
        merges,
    }
}
