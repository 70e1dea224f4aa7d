use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Board, CoreError, Palette};

/// Board geometry plus the palette random fills draw from.
///
/// Shapes of five cells (LINE5, T, L) need at least a 3x3 or 1x5 area to
/// ever appear; smaller boards are legal but can only score short lines.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawBoardConfig", into = "RawBoardConfig")]
pub struct BoardConfig {
    rows: usize,
    cols: usize,
    palette: Palette,
}

#[derive(Serialize, Deserialize)]
struct RawBoardConfig {
    rows: usize,
    cols: usize,
    palette: Palette,
}

impl BoardConfig {
    pub const REFERENCE_ROWS: usize = 11;
    pub const REFERENCE_COLS: usize = 11;

    pub fn new(rows: usize, cols: usize, palette: Palette) -> Result<Self, CoreError> {
        if rows == 0 || cols == 0 {
            return Err(CoreError::InvalidDimensions { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            palette,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Fresh board with every cell drawn uniformly from the palette.
    pub fn random_board<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Board, CoreError> {
        Board::random(self.rows, self.cols, &self.palette, rng)
    }

    /// Fixed board, validated against this configuration.
    pub fn board_from_rows<T: AsRef<[u8]>>(&self, rows: &[T]) -> Result<Board, CoreError> {
        let board = Board::from_rows(rows)?;
        self.check(&board)?;
        Ok(board)
    }

    /// Fails when the board's dimensions differ from the configured ones, or
    /// when a cell is empty or holds a color outside the palette.
    pub fn check(&self, board: &Board) -> Result<(), CoreError> {
        if board.rows() != self.rows || board.cols() != self.cols {
            return Err(CoreError::DimensionMismatch {
                rows: self.rows,
                cols: self.cols,
                found_rows: board.rows(),
                found_cols: board.cols(),
            });
        }
        board.check_colors(&self.palette)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: Self::REFERENCE_ROWS,
            cols: Self::REFERENCE_COLS,
            palette: Palette::default(),
        }
    }
}

impl TryFrom<RawBoardConfig> for BoardConfig {
    type Error = CoreError;

    fn try_from(raw: RawBoardConfig) -> Result<Self, Self::Error> {
        BoardConfig::new(raw.rows, raw.cols, raw.palette)
    }
}

impl From<BoardConfig> for RawBoardConfig {
    fn from(config: BoardConfig) -> Self {
        Self {
            rows: config.rows,
            cols: config.cols,
            palette: config.palette,
        }
    }
}
