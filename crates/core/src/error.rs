use thiserror::Error;

/// Configuration and geometry failures. Raised by constructors and checked
/// accessors before any simulation touches the board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("board dimensions must be at least 1x1, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("palette must contain at least one color")]
    EmptyPalette,

    #[error("color {0} is reserved for the empty sentinel")]
    ReservedColor(u8),

    #[error("duplicate color {0} in palette")]
    DuplicateColor(u8),

    #[error("cell ({row}, {col}) is outside the {rows}x{cols} board")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cell ({row}, {col}) holds {color}, which is not in the palette of {palette} colors")]
    ColorOutOfPalette {
        row: usize,
        col: usize,
        color: u8,
        palette: usize,
    },

    #[error("board is {found_rows}x{found_cols} but the configuration expects {rows}x{cols}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        found_rows: usize,
        found_cols: usize,
    },
}
