//! Cell coordinates and swap definitions.

use serde::{Deserialize, Serialize};

/// Board coordinate. Row 0 is the top row, column 0 the leftmost column.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Signed offset. Returns `None` when the result would be negative;
    /// the upper bound is the board's business.
    #[inline(always)]
    pub fn offset(self, dr: isize, dc: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(dr)?,
            col: self.col.checked_add_signed(dc)?,
        })
    }
}

impl From<(usize, usize)> for Pos {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Swaps are only proposed towards the neighbor below or to the right,
/// so every interior edge is considered exactly once.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Direction {
    Down,
    Right,
}

impl Direction {
    /// Canonical enumeration order: down before right.
    pub const ALL: [Direction; 2] = [Direction::Down, Direction::Right];

    #[inline(always)]
    pub const fn delta(self) -> (usize, usize) {
        match self {
            Self::Down => (1, 0),
            Self::Right => (0, 1),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Swap {
    pub from: Pos,
    pub dir: Direction,
}

impl Swap {
    pub const fn new(from: Pos, dir: Direction) -> Self {
        Self { from, dir }
    }

    /// The neighbor this swap exchanges with. May lie outside the board.
    #[inline(always)]
    pub const fn target(self) -> Pos {
        let (dr, dc) = self.dir.delta();
        Pos {
            row: self.from.row + dr,
            col: self.from.col + dc,
        }
    }
}
