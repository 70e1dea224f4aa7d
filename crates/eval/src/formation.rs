//! Formation detection.
//!
//! One pass claims shapes in a fixed priority order: horizontal lines, vertical
//! lines, T shapes, then L shapes, each scanned row-major. A candidate sharing
//! any cell with an earlier claim in the same pass is skipped outright, so the
//! result is a pure function of the board and this scan order.

use cascade_core::{Board, Cell, Pos};
use smallvec::SmallVec;

use crate::{ScoreTable, Shape};

/// Plus shape: center, up, down, left, right.
pub const T_PATTERN: [(isize, isize); 5] = [(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1)];

/// The four L pentominoes as (row, col) offsets from the anchor.
/// The last one does not cover its anchor; it still takes the anchor's color
/// as the color to match.
pub const L_PATTERNS: [[(isize, isize); 5]; 4] = [
    [(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)],
    [(0, 0), (0, 1), (0, 2), (1, 0), (2, 0)],
    [(0, 2), (1, 2), (2, 2), (0, 0), (0, 1)],
    [(2, 0), (2, 1), (2, 2), (0, 2), (1, 2)],
];

pub type ShapeCells = SmallVec<[Pos; 5]>;

/// A credited shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Formation {
    pub shape: Shape,
    pub cells: ShapeCells,
}

/// Result of one detection pass. Claimed cells are pairwise disjoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Detection {
    formations: Vec<Formation>,
    score: u64,
}

impl Detection {
    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn formations(&self) -> &[Formation] {
        &self.formations
    }

    pub fn is_empty(&self) -> bool {
        self.formations.is_empty()
    }

    pub fn claimed_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.formations.iter().flat_map(|f| f.cells.iter().copied())
    }

    pub fn claimed_count(&self) -> usize {
        self.formations.iter().map(|f| f.cells.len()).sum()
    }
}

/// Claim accumulator for a single pass.
struct Claims<'a> {
    board: &'a Board,
    scores: &'a ScoreTable,
    used: Vec<bool>,
    detection: Detection,
}

impl<'a> Claims<'a> {
    fn new(board: &'a Board, scores: &'a ScoreTable) -> Self {
        Self {
            board,
            scores,
            used: vec![false; board.len()],
            detection: Detection::default(),
        }
    }

    /// All-or-nothing: credit `cells` only if none is already claimed.
    fn take(&mut self, shape: Shape, cells: ShapeCells) -> bool {
        let board = self.board;
        if cells.iter().any(|&pos| self.used[board.index(pos)]) {
            return false;
        }
        for &pos in &cells {
            self.used[board.index(pos)] = true;
        }
        self.detection.score += u64::from(self.scores.points(shape));
        self.detection.formations.push(Formation { shape, cells });
        true
    }

    /// Maximal runs along one line of cells, in scan order.
    fn scan_line(&mut self, line: impl Iterator<Item = Pos>) {
        let cells: SmallVec<[Pos; 16]> = line.collect();
        let mut i = 0;
        while i < cells.len() {
            let color = self.board.get(cells[i]);
            if color.is_none() {
                i += 1;
                continue;
            }
            let start = i;
            while i < cells.len() && self.board.get(cells[i]) == color {
                i += 1;
            }
            if let Some(shape) = Shape::for_run(i - start) {
                let credited = shape.cell_count();
                self.take(shape, cells[start..start + credited].iter().copied().collect());
            }
        }
    }

    fn scan_pattern(
        &mut self,
        shape: Shape,
        anchor: Pos,
        color: Cell,
        pattern: &[(isize, isize); 5],
    ) {
        if let Some(cells) = match_pattern(self.board, anchor, color, pattern) {
            self.take(shape, cells);
        }
    }

    fn finish(self) -> Detection {
        self.detection
    }
}

/// Cells of `pattern` anchored at `anchor` if every one is on the board and
/// holds `color`.
fn match_pattern(
    board: &Board,
    anchor: Pos,
    color: Cell,
    pattern: &[(isize, isize); 5],
) -> Option<ShapeCells> {
    let mut cells = ShapeCells::new();
    for &(dr, dc) in pattern {
        let pos = anchor.offset(dr, dc).filter(|&p| board.in_bounds(p))?;
        if board.get(pos) != color {
            return None;
        }
        cells.push(pos);
    }
    Some(cells)
}

/// Scan `board` once and report the non-overlapping formations it contains.
pub fn detect_formations(board: &Board, scores: &ScoreTable) -> Detection {
    let mut claims = Claims::new(board, scores);
    let (rows, cols) = (board.rows(), board.cols());

    for row in 0..rows {
        claims.scan_line((0..cols).map(move |col| Pos::new(row, col)));
    }
    for col in 0..cols {
        claims.scan_line((0..rows).map(move |row| Pos::new(row, col)));
    }

    for pos in board.positions() {
        let color = board.get(pos);
        if color.is_some() {
            claims.scan_pattern(Shape::T, pos, color, &T_PATTERN);
        }
    }

    for pos in board.positions() {
        let color = board.get(pos);
        if color.is_none() {
            continue;
        }
        for pattern in &L_PATTERNS {
            claims.scan_pattern(Shape::L, pos, color, pattern);
        }
    }

    claims.finish()
}
