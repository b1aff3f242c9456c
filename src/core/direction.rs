//! Move directions.
//!
//! A move slides every tile toward one edge of the grid. Rows are the lines
//! for `Left`/`Right`, columns for `Up`/`Down`. `Up` and `Left` slide toward
//! index 0 of their line ("toward start").
//!
//! Values coming from outside the process (numeric codes, key names, JSON)
//! are parsed with `TryFrom<u8>` or `FromStr`; anything else is
//! `InvalidDirection`.
//!
//! ```
//! use slide_merge::core::Direction;
//!
//! assert_eq!("ArrowLeft".parse::<Direction>().unwrap(), Direction::Left);
//! assert_eq!(Direction::try_from(1u8).unwrap(), Direction::Down);
//! assert!("sideways".parse::<Direction>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One of the four move directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// True if lines are columns.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// True if tiles slide toward index 0 of their line.
    #[must_use]
    pub const fn toward_start(self) -> bool {
        matches!(self, Direction::Up | Direction::Left)
    }

    /// Numeric code: 0=Up, 1=Down, 2=Left, 3=Right.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        };
        f.write_str(name)
    }
}

impl TryFrom<u8> for Direction {
    type Error = EngineError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Direction::Up),
            1 => Ok(Direction::Down),
            2 => Ok(Direction::Left),
            3 => Ok(Direction::Right),
            other => Err(EngineError::direction(other)),
        }
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed.strip_prefix("Arrow").unwrap_or(trimmed);
        match name.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(EngineError::direction(s)),
        }
    }
}
