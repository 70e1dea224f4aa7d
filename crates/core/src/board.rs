//! board representation - flat row-major cell array, value semantics
//! every speculative evaluation works on its own clone, never an alias

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Color, CoreError, Direction, Palette, Pos, Swap};

/// `None` is the empty sentinel, only present between removal and refill.
pub type Cell = Option<Color>;

/// The 11x11 four-color grid used for fixed-board runs.
/// Diagonal pattern, so no line, T or L is present at the start.
pub const REFERENCE_GRID: [[u8; 11]; 11] = [
    [1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3],
    [2, 1, 4, 3, 2, 1, 4, 3, 2, 1, 4],
    [3, 4, 1, 2, 3, 4, 1, 2, 3, 4, 1],
    [4, 3, 2, 1, 4, 3, 2, 1, 4, 3, 2],
    [1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3],
    [2, 1, 4, 3, 2, 1, 4, 3, 2, 1, 4],
    [3, 4, 1, 2, 3, 4, 1, 2, 3, 4, 1],
    [4, 3, 2, 1, 4, 3, 2, 1, 4, 3, 2],
    [1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3],
    [2, 1, 4, 3, 2, 1, 4, 3, 2, 1, 4],
    [3, 4, 1, 2, 3, 4, 1, 2, 3, 4, 1],
];

/// Rectangular grid of colored cells.
/// Cells are stored row-major (`row * cols + col`), row 0 at the top.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// All-empty board. Mostly useful as a scratch buffer and in tests.
    pub fn new(rows: usize, cols: usize) -> Result<Self, CoreError> {
        if rows == 0 || cols == 0 {
            return Err(CoreError::InvalidDimensions { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        })
    }

    /// Raw grid where 0 means empty. Checks shape only.
    pub fn from_rows<T: AsRef<[u8]>>(rows: &[T]) -> Result<Self, CoreError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut board = Self::new(height, width)?;
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != width {
                return Err(CoreError::RaggedGrid {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
            let start = row * width;
            for (slot, &value) in board.cells[start..start + width].iter_mut().zip(values) {
                *slot = Color::new(value);
            }
        }
        Ok(board)
    }

    /// Fixed initial grid: every cell must hold a palette color.
    pub fn from_palette_rows<T: AsRef<[u8]>>(
        rows: &[T],
        palette: &Palette,
    ) -> Result<Self, CoreError> {
        let board = Self::from_rows(rows)?;
        board.check_colors(palette)?;
        Ok(board)
    }

    /// Fails on the first empty cell or color outside `palette`, row-major.
    pub fn check_colors(&self, palette: &Palette) -> Result<(), CoreError> {
        for (idx, cell) in self.cells.iter().enumerate() {
            match cell {
                None => return Err(CoreError::ReservedColor(0)),
                Some(color) if !palette.contains(*color) => {
                    return Err(CoreError::ColorOutOfPalette {
                        row: idx / self.cols,
                        col: idx % self.cols,
                        color: color.get(),
                        palette: palette.len(),
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Every cell drawn uniformly from `palette`.
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        palette: &Palette,
        rng: &mut R,
    ) -> Result<Self, CoreError> {
        let mut board = Self::new(rows, cols)?;
        for cell in &mut board.cells {
            *cell = Some(palette.sample(rng));
        }
        Ok(board)
    }

    pub fn reference() -> Self {
        let cells = REFERENCE_GRID
            .iter()
            .flat_map(|row| row.iter().map(|&v| Color::new(v)))
            .collect();
        Self {
            rows: REFERENCE_GRID.len(),
            cols: REFERENCE_GRID[0].len(),
            cells,
        }
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline(always)]
    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Flat index of an in-bounds position. Panics otherwise.
    #[inline(always)]
    pub fn index(&self, pos: Pos) -> usize {
        assert!(self.in_bounds(pos), "{pos:?} outside {}x{} board", self.rows, self.cols);
        pos.row * self.cols + pos.col
    }

    /// Neighbor of `pos` in `dir`, if it exists.
    #[inline]
    pub fn neighbor(&self, pos: Pos, dir: Direction) -> Option<Pos> {
        let target = Swap::new(pos, dir).target();
        self.in_bounds(target).then_some(target)
    }

    /// Unchecked read; panics on out-of-bounds positions.
    #[inline(always)]
    pub fn get(&self, pos: Pos) -> Cell {
        self.cells[self.index(pos)]
    }

    /// Unchecked write; panics on out-of-bounds positions.
    #[inline(always)]
    pub fn set(&mut self, pos: Pos, cell: Cell) {
        let idx = self.index(pos);
        self.cells[idx] = cell;
    }

    pub fn try_get(&self, pos: Pos) -> Result<Cell, CoreError> {
        self.check(pos)?;
        Ok(self.get(pos))
    }

    pub fn try_set(&mut self, pos: Pos, cell: Cell) -> Result<(), CoreError> {
        self.check(pos)?;
        self.set(pos, cell);
        Ok(())
    }

    /// Exchange two cells. Both must be on the board.
    pub fn swap(&mut self, a: Pos, b: Pos) -> Result<(), CoreError> {
        self.check(a)?;
        self.check(b)?;
        self.swap_cells(a, b);
        Ok(())
    }

    /// Unchecked exchange; panics on out-of-bounds positions.
    #[inline(always)]
    pub fn swap_cells(&mut self, a: Pos, b: Pos) {
        let (ia, ib) = (self.index(a), self.index(b));
        self.cells.swap(ia, ib);
    }

    pub fn apply_swap(&mut self, swap: Swap) -> Result<(), CoreError> {
        self.swap(swap.from, swap.target())
    }

    /// Copy of this board with `swap` applied.
    pub fn swapped(&self, swap: Swap) -> Result<Self, CoreError> {
        let mut next = self.clone();
        next.apply_swap(swap)?;
        Ok(next)
    }

    #[inline]
    fn check(&self, pos: Pos) -> Result<(), CoreError> {
        if self.in_bounds(pos) {
            Ok(())
        } else {
            Err(CoreError::OutOfBounds {
                row: pos.row,
                col: pos.col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Raw cell data, row-major
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable raw cell data - for column compaction and refill
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// A resolved board never holds the empty sentinel.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Raw rows with 0 for empty cells.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|c| c.map_or(0, Color::get)).collect())
            .collect()
    }

    /// Iterate positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Pos::new(row, col)))
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_rows().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows: Vec<Vec<u8>> = Vec::deserialize(deserializer)?;
        Board::from_rows(&rows).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.cols) {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                match cell {
                    Some(color) => write!(f, "{}", color)?,
                    None => write!(f, ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn c(v: u8) -> Cell {
        Color::new(v)
    }

    #[test]
    fn test_set_get() {
        let mut b = Board::new(5, 4).expect("board");
        b.set(Pos::new(3, 2), c(2));
        assert_eq!(b.get(Pos::new(3, 2)), c(2));
        assert_eq!(b.get(Pos::new(2, 3)), None);
        assert_eq!(b.cells()[3 * 4 + 2], c(2));
    }

    #[test]
    fn test_in_bounds() {
        let b = Board::new(3, 5).expect("board");
        assert!(b.in_bounds(Pos::new(0, 0)));
        assert!(b.in_bounds(Pos::new(2, 4)));
        assert!(!b.in_bounds(Pos::new(3, 0)));
        assert!(!b.in_bounds(Pos::new(0, 5)));
    }

    #[test]
    fn test_checked_access_reports_out_of_bounds() {
        let mut b = Board::new(2, 2).expect("board");
        let err = CoreError::OutOfBounds {
            row: 2,
            col: 0,
            rows: 2,
            cols: 2,
        };
        assert_eq!(b.try_get(Pos::new(2, 0)), Err(err.clone()));
        assert_eq!(b.try_set(Pos::new(2, 0), c(1)), Err(err));
        assert!(b.try_set(Pos::new(1, 1), c(1)).is_ok());
    }

    #[test]
    fn test_swap_exchanges_cells() {
        let mut b = Board::from_rows(&[[1u8, 2], [3, 4]]).expect("board");
        b.apply_swap(Swap::new(Pos::new(0, 0), Direction::Right))
            .expect("in bounds");
        assert_eq!(b.to_rows(), vec![vec![2, 1], vec![3, 4]]);
        b.apply_swap(Swap::new(Pos::new(0, 1), Direction::Down))
            .expect("in bounds");
        assert_eq!(b.to_rows(), vec![vec![2, 4], vec![3, 1]]);
    }

    #[test]
    fn test_swap_off_edge_fails_without_mutation() {
        let mut b = Board::from_rows(&[[1u8, 2], [3, 4]]).expect("board");
        let before = b.clone();
        assert!(b
            .apply_swap(Swap::new(Pos::new(1, 0), Direction::Down))
            .is_err());
        assert!(b
            .apply_swap(Swap::new(Pos::new(0, 1), Direction::Right))
            .is_err());
        assert_eq!(b, before);
    }

    #[test]
    fn test_swapped_leaves_original_untouched() {
        let b = Board::from_rows(&[[1u8, 2]]).expect("board");
        let next = b
            .swapped(Swap::new(Pos::new(0, 0), Direction::Right))
            .expect("in bounds");
        assert_eq!(b.to_rows(), vec![vec![1, 2]]);
        assert_eq!(next.to_rows(), vec![vec![2, 1]]);
    }

    #[test]
    fn test_from_rows_rejects_ragged_and_empty() {
        assert_eq!(
            Board::from_rows(&[vec![1u8, 2], vec![3]]),
            Err(CoreError::RaggedGrid {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        let none: [[u8; 0]; 0] = [];
        assert!(Board::from_rows(&none).is_err());
    }

    #[test]
    fn test_from_palette_rows_validates_colors() {
        let palette = Palette::with_size(3).expect("palette");
        assert!(Board::from_palette_rows(&[[1u8, 2, 3]], &palette).is_ok());
        assert_eq!(
            Board::from_palette_rows(&[[1u8, 0, 3]], &palette),
            Err(CoreError::ReservedColor(0))
        );
        assert_eq!(
            Board::from_palette_rows(&[[1u8, 4, 3]], &palette),
            Err(CoreError::ColorOutOfPalette {
                row: 0,
                col: 1,
                color: 4,
                palette: 3
            })
        );
    }

    #[test]
    fn test_random_rejects_zero_dimensions() {
        let palette = Palette::default();
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(
            Board::random(4, 0, &palette, &mut rng),
            Err(CoreError::InvalidDimensions { rows: 4, cols: 0 })
        );
        let board = Board::random(2, 3, &palette, &mut rng).expect("board");
        assert!(board.is_full());
        assert!(board.check_colors(&palette).is_ok());
    }

    #[test]
    fn test_reference_grid() {
        let b = Board::reference();
        assert_eq!((b.rows(), b.cols()), (11, 11));
        assert!(b.is_full());
        assert_eq!(b.get(Pos::new(3, 0)), c(4));
        assert_eq!(b.to_rows()[10], REFERENCE_GRID[10].to_vec());
    }

    #[test]
    fn test_clone_is_independent() {
        let a = Board::reference();
        let mut b = a.clone();
        b.set(Pos::new(0, 0), None);
        assert_ne!(a, b);
        assert_eq!(a.get(Pos::new(0, 0)), c(1));
    }

    #[test]
    fn test_display() {
        let b = Board::from_rows(&[[1u8, 0], [3, 4]]).expect("board");
        assert_eq!(b.to_string(), "1 .\n3 4\n");
    }

    #[test]
    fn test_serde_roundtrip_keeps_empties() {
        let b = Board::from_rows(&[[1u8, 0, 2]]).expect("board");
        let json = serde_json::to_string(&b).expect("serialize");
        assert_eq!(json, "[[1,0,2]]");
        let back: Board = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, b);
    }
}
