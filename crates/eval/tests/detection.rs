//! Detection over generated boards plus the worked line scenarios.

use cascade_core::{Board, Pos};
use cascade_eval::{detect_formations, ScoreTable, Shape};
use proptest::prelude::*;

fn grid() -> impl Strategy<Value = Vec<Vec<u8>>> {
    (1usize..9, 1usize..9).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(prop::collection::vec(0u8..=4, cols), rows)
    })
}

#[test]
fn scenario_a_five_in_a_row() {
    let board = Board::from_rows(&[[1u8, 1, 1, 1, 1]]).expect("board");
    let detection = detect_formations(&board, &ScoreTable::default());
    assert_eq!(detection.score(), 50);
    assert_eq!(detection.formations().len(), 1);
    assert_eq!(detection.formations()[0].shape, Shape::Line5);
    let cells: Vec<Pos> = detection.claimed_cells().collect();
    assert_eq!(cells, (0..5).map(|c| Pos::new(0, c)).collect::<Vec<_>>());
}

#[test]
fn scenario_b_crossing_lines_credit_once() {
    let board = Board::from_rows(&[[2u8, 1, 3, 4], [1, 1, 1, 2], [3, 1, 4, 3]]).expect("board");
    let detection = detect_formations(&board, &ScoreTable::default());
    assert_eq!(detection.score(), 5);
    assert_eq!(detection.formations().len(), 1);
    assert_eq!(detection.formations()[0].cells[0], Pos::new(1, 0));
}

proptest! {
    #[test]
    fn claims_are_disjoint_and_stable(rows in grid()) {
        let board = Board::from_rows(&rows).expect("board");
        let scores = ScoreTable::default();
        let first = detect_formations(&board, &scores);
        let second = detect_formations(&board, &scores);
        prop_assert_eq!(&first, &second);

        let mut seen = vec![false; board.len()];
        for pos in first.claimed_cells() {
            let idx = board.index(pos);
            prop_assert!(!seen[idx], "cell {:?} claimed twice", pos);
            prop_assert!(board.get(pos).is_some());
            seen[idx] = true;
        }
        let expected: u64 = first
            .formations()
            .iter()
            .map(|f| u64::from(scores.points(f.shape)))
            .sum();
        prop_assert_eq!(first.score(), expected);
    }

    #[test]
    fn formations_are_single_colored(rows in grid()) {
        let board = Board::from_rows(&rows).expect("board");
        let detection = detect_formations(&board, &ScoreTable::default());
        for formation in detection.formations() {
            prop_assert_eq!(formation.cells.len(), formation.shape.cell_count());
            let color = board.get(formation.cells[0]);
            prop_assert!(formation.cells.iter().all(|&p| board.get(p) == color));
        }
    }
}
