//! The N x N tile grid.
//!
//! ## Grid
//!
//! Row-major `Vec<u64>`. A cell holds 0 when empty, otherwise a power of
//! two >= 2. The dimension is fixed once the grid is created.
//!
//! ## Lines
//!
//! A move works on lines: rows for horizontal moves, columns for vertical
//! ones. `line()` reads a line in grid order (top to bottom, left to right)
//! and `set_line()` writes one back. The line algorithm decides which end
//! tiles slide toward.
//!
//! ## GridSnapshot
//!
//! Read-only copy handed to callers (renderers, network handlers, tests).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// Largest tile value. Tiles this large cannot merge: their double would
/// not fit in a `u64`.
pub const MAX_TILE: u64 = 1 << 63;

/// Mutable N x N grid owned by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<u64>,
}

impl Grid {
    /// Create an empty grid. Size is validated by the engine config.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build a grid from rows. Returns `None` unless the rows form a square.
    #[must_use]
    pub fn from_rows(rows: &[Vec<u64>]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            cells: rows.iter().flatten().copied().collect(),
        })
    }

    /// Grid dimension N.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Cell value, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<u64> {
        (row < self.size && col < self.size).then(|| self.cells[self.idx(row, col)])
    }

    /// Set a cell. Panics if out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: u64) {
        assert!(row < self.size && col < self.size, "cell ({row}, {col}) out of bounds");
        let idx = self.idx(row, col);
        self.cells[idx] = value;
    }

    /// Empty cells in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(|(i, _)| (i / self.size, i % self.size))
            .collect()
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }

    /// Largest tile, 0 on an empty grid.
    #[must_use]
    pub fn highest_tile(&self) -> u64 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Grid coordinates of position `pos` along line `index` for `direction`.
    #[inline]
    #[must_use]
    pub fn line_cell(direction: Direction, index: usize, pos: usize) -> (usize, usize) {
        if direction.is_vertical() {
            (pos, index)
        } else {
            (index, pos)
        }
    }

    /// Read line `index` (a column for vertical moves, a row otherwise) in grid order.
    #[must_use]
    pub fn line(&self, index: usize, direction: Direction) -> Vec<u64> {
        (0..self.size)
            .map(|pos| {
                let (r, c) = Self::line_cell(direction, index, pos);
                self.cells[self.idx(r, c)]
            })
            .collect()
    }

    /// Write line `index` back. `values` must have length N.
    pub fn set_line(&mut self, index: usize, direction: Direction, values: &[u64]) {
        debug_assert_eq!(values.len(), self.size);
        for (pos, &value) in values.iter().enumerate() {
            let (r, c) = Self::line_cell(direction, index, pos);
            self.set(r, c, value);
        }
    }

    /// True if two horizontally or vertically adjacent cells hold the same
    /// mergeable tile.
    #[must_use]
    pub fn has_adjacent_pair(&self) -> bool {
        for r in 0..self.size {
            for c in 0..self.size {
                let v = self.cells[self.idx(r, c)];
                if v == 0 || v >= MAX_TILE {
                    continue;
                }
                if c + 1 < self.size && self.cells[self.idx(r, c + 1)] == v {
                    return true;
                }
                if r + 1 < self.size && self.cells[self.idx(r + 1, c)] == v {
                    return true;
                }
            }
        }
        false
    }

    /// Read-only copy of the grid contents.
    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            rows: self.cells.chunks(self.size).map(<[u64]>::to_vec).collect(),
        }
    }
}

/// Read-only N x N matrix of cell values, rows in order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSnapshot {
    rows: Vec<Vec<u64>>,
}

impl GridSnapshot {
    /// Grid dimension N.
    #[must_use]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Rows, top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[Vec<u64>] {
        &self.rows
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<u64> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows.iter().flatten().filter(|&&v| v != 0).count()
    }
}

impl From<&Grid> for GridSnapshot {
    fn from(grid: &Grid) -> Self {
        grid.snapshot()
    }
}

impl fmt::Display for GridSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .flatten()
            .map(|v| v.to_string().len())
            .max()
            .unwrap_or(1);
        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .map(|&v| {
                    if v == 0 {
                        format!("{:>width$}", ".")
                    } else {
                        format!("{v:>width$}")
                    }
                })
                .collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}
