//! Gravity and refill.
//!
//! Gravity compacts each column's colored cells towards the bottom row keeping
//! their order. Refill then colors whatever is still empty, or leaves it empty
//! when refill is suppressed.

use cascade_core::{Board, Palette};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How vacated cells are colored after gravity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefillPolicy {
    /// Uniform draw from the palette.
    #[default]
    Random,
    /// Leave vacated cells empty. Deterministic; used for verification runs.
    Suppressed,
}

impl RefillPolicy {
    pub fn is_random(self) -> bool {
        matches!(self, Self::Random)
    }
}

/// Compact every column downward. Two-pointer per column, no allocation.
pub fn apply_gravity(board: &mut Board) {
    let (rows, cols) = (board.rows(), board.cols());
    let cells = board.cells_mut();

    for col in 0..cols {
        let mut write = rows;
        for read in (0..rows).rev() {
            if let Some(color) = cells[read * cols + col] {
                write -= 1;
                cells[write * cols + col] = Some(color);
            }
        }
        for row in 0..write {
            cells[row * cols + col] = None;
        }
    }
}

/// Color every empty cell in row-major order. Returns how many were filled.
pub fn refill<R: Rng + ?Sized>(
    board: &mut Board,
    palette: &Palette,
    policy: RefillPolicy,
    rng: &mut R,
) -> usize {
    if !policy.is_random() {
        return 0;
    }
    let mut filled = 0;
    for cell in board.cells_mut().iter_mut().filter(|c| c.is_none()) {
        *cell = Some(palette.sample(rng));
        filled += 1;
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::{Color, Pos};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn board(rows: &[&[u8]]) -> Board {
        Board::from_rows(rows).expect("valid grid")
    }

    #[test]
    fn test_single_cell_falls_to_bottom() {
        let mut b = board(&[&[3], &[0], &[0], &[0], &[0]]);
        apply_gravity(&mut b);
        let mut rng = SmallRng::seed_from_u64(1);
        refill(&mut b, &Palette::default(), RefillPolicy::Suppressed, &mut rng);
        assert_eq!(b.to_rows(), vec![vec![0], vec![0], vec![0], vec![0], vec![3]]);
    }

    #[test]
    fn test_gravity_preserves_column_order() {
        let mut b = board(&[
            &[1, 0, 4],
            &[0, 2, 0],
            &[2, 0, 3],
            &[0, 3, 0],
        ]);
        apply_gravity(&mut b);
        assert_eq!(
            b.to_rows(),
            vec![vec![0, 0, 0], vec![0, 0, 0], vec![1, 2, 4], vec![2, 3, 3]]
        );
    }

    #[test]
    fn test_gravity_noop_on_full_board() {
        let mut b = Board::reference();
        let before = b.clone();
        apply_gravity(&mut b);
        assert_eq!(b, before);
    }

    #[test]
    fn test_random_refill_fills_everything() {
        let mut b = board(&[&[0, 1, 0], &[0, 0, 2]]);
        let mut rng = SmallRng::seed_from_u64(42);
        let palette = Palette::default();
        let filled = refill(&mut b, &palette, RefillPolicy::Random, &mut rng);
        assert_eq!(filled, 4);
        assert!(b.is_full());
        assert_eq!(b.get(Pos::new(0, 1)), Color::new(1));
        assert_eq!(b.get(Pos::new(1, 2)), Color::new(2));
        assert!(b.cells().iter().flatten().all(|&c| palette.contains(c)));
    }

    #[test]
    fn test_suppressed_refill_leaves_empties() {
        let mut b = board(&[&[0, 1], &[0, 0]]);
        let mut rng = SmallRng::seed_from_u64(42);
        let filled = refill(&mut b, &Palette::default(), RefillPolicy::Suppressed, &mut rng);
        assert_eq!(filled, 0);
        assert_eq!(b.count_empty(), 3);
    }

    #[test]
    fn test_policy_serde_names() {
        let json = serde_json::to_string(&RefillPolicy::Suppressed).expect("serialize");
        assert_eq!(json, "\"suppressed\"");
    }
}
