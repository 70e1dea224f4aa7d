//! Greedy single-swap search.
//!
//! Every swap of a cell with its neighbor below or to its right is evaluated
//! by fully resolving a private copy of the swapped board. Evaluations are
//! independent, so they can run on rayon's pool; the winner is still picked by
//! a sequential fold in canonical order (row-major, down before right), strict
//! `>` so the first candidate wins ties.

use cascade_core::{Board, CoreError, Direction, Swap};
use cascade_engine::{resolve, EngineConfig};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A swap and what resolving it produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub swap: Swap,
    pub gain: u64,
    pub cascades: u32,
}

/// The winning swap together with the swapped, not yet resolved, board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub swap: Swap,
    pub board: Board,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Zero exactly when `best` is `None`.
    pub gain: u64,
    pub best: Option<Candidate>,
    pub evaluated: usize,
}

impl SearchOutcome {
    pub fn found(&self) -> bool {
        self.best.is_some()
    }
}

/// All in-bounds swaps in canonical order.
pub fn candidate_swaps(board: &Board) -> Vec<Swap> {
    let mut swaps = Vec::with_capacity(board.len() * 2);
    for from in board.positions() {
        for dir in Direction::ALL {
            if board.neighbor(from, dir).is_some() {
                swaps.push(Swap::new(from, dir));
            }
        }
    }
    swaps
}

/// Refill seed for the candidate at `index`. Depends only on the round seed
/// and the canonical index, never on which worker evaluates it.
#[inline]
pub fn candidate_seed(round_seed: u64, index: usize) -> u64 {
    // splitmix64 finalizer over a golden-ratio stride
    let mut z = round_seed.wrapping_add((index as u64 + 1).wrapping_mul(0x9e3779b97f4a7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Gain of one swap: resolve a swapped copy of `board` with its own refill stream.
/// Fails with `OutOfBounds` when `swap` leaves the board.
pub fn evaluate_swap(
    board: &Board,
    swap: Swap,
    config: &EngineConfig,
    seed: u64,
) -> Result<Evaluation, CoreError> {
    let scratch = board.swapped(swap)?;
    Ok(resolve_candidate(scratch, swap, config, seed))
}

/// Candidates come from `candidate_swaps`, so the swap is already on the board.
fn evaluate_candidate(board: &Board, swap: Swap, config: &EngineConfig, seed: u64) -> Evaluation {
    let mut scratch = board.clone();
    scratch.swap_cells(swap.from, swap.target());
    resolve_candidate(scratch, swap, config, seed)
}

fn resolve_candidate(
    mut scratch: Board,
    swap: Swap,
    config: &EngineConfig,
    seed: u64,
) -> Evaluation {
    let mut rng = SmallRng::seed_from_u64(seed);
    let res = resolve(&mut scratch, config, &mut rng);
    trace!(
        row = swap.from.row,
        col = swap.from.col,
        dir = ?swap.dir,
        gain = res.score,
        "candidate"
    );
    Evaluation {
        swap,
        gain: res.score,
        cascades: res.cascades,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GreedySearch {
    pub parallel: bool,
}

impl Default for GreedySearch {
    fn default() -> Self {
        Self {
            parallel: cfg!(feature = "parallel"),
        }
    }
}

impl GreedySearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequential() -> Self {
        Self { parallel: false }
    }

    /// Evaluate every candidate, results in canonical order.
    pub fn evaluate_all(
        &self,
        board: &Board,
        config: &EngineConfig,
        round_seed: u64,
    ) -> Vec<Evaluation> {
        let swaps = candidate_swaps(board);
        let eval = |(index, &swap): (usize, &Swap)| {
            evaluate_candidate(board, swap, config, candidate_seed(round_seed, index))
        };
        map_candidates(&swaps, self.parallel, eval)
    }

    /// Best single swap on `board`. `board` is only read.
    pub fn best_swap(
        &self,
        board: &Board,
        config: &EngineConfig,
        round_seed: u64,
    ) -> SearchOutcome {
        let evaluations = self.evaluate_all(board, config, round_seed);
        let evaluated = evaluations.len();

        let mut best: Option<&Evaluation> = None;
        for eval in &evaluations {
            if eval.gain > best.map_or(0, |b| b.gain) {
                best = Some(eval);
            }
        }

        let Some(winner) = best else {
            debug!(evaluated, "no improving swap");
            return SearchOutcome {
                gain: 0,
                best: None,
                evaluated,
            };
        };

        let mut swapped = board.clone();
        swapped.swap_cells(winner.swap.from, winner.swap.target());
        debug!(
            evaluated,
            gain = winner.gain,
            row = winner.swap.from.row,
            col = winner.swap.from.col,
            dir = ?winner.swap.dir,
            "best swap"
        );
        SearchOutcome {
            gain: winner.gain,
            best: Some(Candidate {
                swap: winner.swap,
                board: swapped,
            }),
            evaluated,
        }
    }
}

#[cfg(feature = "parallel")]
fn map_candidates<F>(swaps: &[Swap], parallel: bool, eval: F) -> Vec<Evaluation>
where
    F: Fn((usize, &Swap)) -> Evaluation + Sync + Send,
{
    if parallel {
        swaps.par_iter().enumerate().map(eval).collect()
    } else {
        swaps.iter().enumerate().map(eval).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn map_candidates<F>(swaps: &[Swap], _parallel: bool, eval: F) -> Vec<Evaluation>
where
    F: Fn((usize, &Swap)) -> Evaluation,
{
    swaps.iter().enumerate().map(eval).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::{BoardConfig, Palette, Pos};
    use cascade_engine::RefillPolicy;

    fn suppressed(board: &Board) -> EngineConfig {
        let dims =
            BoardConfig::new(board.rows(), board.cols(), Palette::default()).expect("config");
        EngineConfig::new(dims).with_refill(RefillPolicy::Suppressed)
    }

    #[test]
    fn test_candidate_count_and_order() {
        let board = Board::new(3, 4).expect("board");
        let swaps = candidate_swaps(&board);
        // vertical edges (rows-1)*cols + horizontal edges rows*(cols-1)
        assert_eq!(swaps.len(), 2 * 4 + 3 * 3);
        assert_eq!(swaps[0], Swap::new(Pos::new(0, 0), Direction::Down));
        assert_eq!(swaps[1], Swap::new(Pos::new(0, 0), Direction::Right));
        let last = *swaps.last().expect("non-empty");
        assert_eq!(last, Swap::new(Pos::new(2, 2), Direction::Right));
    }

    #[test]
    fn test_single_cell_has_no_candidates() {
        let board = Board::from_rows(&[[1u8]]).expect("board");
        assert!(candidate_swaps(&board).is_empty());
        let outcome = GreedySearch::sequential().best_swap(&board, &suppressed(&board), 0);
        assert_eq!(outcome.gain, 0);
        assert!(outcome.best.is_none());
    }

    #[test]
    fn test_candidate_seed_is_index_sensitive() {
        assert_ne!(candidate_seed(7, 0), candidate_seed(7, 1));
        assert_ne!(candidate_seed(7, 0), candidate_seed(8, 0));
        assert_eq!(candidate_seed(7, 3), candidate_seed(7, 3));
    }

    #[test]
    fn test_finds_completing_swap() {
        let board = Board::from_rows(&[
            [1u8, 2, 1, 1],
            [2, 1, 3, 4],
            [3, 4, 2, 3],
        ])
        .expect("board");
        let config = suppressed(&board);
        let outcome = GreedySearch::sequential().best_swap(&board, &config, 0);
        assert_eq!(outcome.gain, 10);
        let best = outcome.best.expect("a swap");
        assert_eq!(best.swap, Swap::new(Pos::new(0, 1), Direction::Down));
        // committed board is the swapped board before resolution
        assert_eq!(
            best.board.to_rows(),
            vec![vec![1, 1, 1, 1], vec![2, 2, 3, 4], vec![3, 4, 2, 3]]
        );
    }

    #[test]
    fn test_first_found_wins_ties() {
        // two separate swaps each complete a line of three
        let board = Board::from_rows(&[
            [1u8, 1, 2, 1],
            [3, 4, 3, 4],
            [2, 3, 2, 2],
        ])
        .expect("board");
        let config = suppressed(&board);
        let evaluations = GreedySearch::sequential().evaluate_all(&board, &config, 0);
        let winners: Vec<Swap> = evaluations
            .iter()
            .filter(|e| e.gain == 5)
            .map(|e| e.swap)
            .collect();
        assert!(winners.len() >= 2);
        let outcome = GreedySearch::sequential().best_swap(&board, &config, 0);
        assert_eq!(outcome.gain, 5);
        assert_eq!(outcome.best.map(|c| c.swap), Some(winners[0]));
    }

    #[test]
    fn test_off_board_swap_is_rejected() {
        let board = Board::from_rows(&[[1u8, 2, 3], [2, 3, 1]]).expect("board");
        let config = suppressed(&board);
        let right_edge = Swap::new(Pos::new(0, 2), Direction::Right);
        assert!(matches!(
            evaluate_swap(&board, right_edge, &config, 0),
            Err(CoreError::OutOfBounds { row: 0, col: 3, .. })
        ));
        let bottom_edge = Swap::new(Pos::new(1, 0), Direction::Down);
        assert!(evaluate_swap(&board, bottom_edge, &config, 0).is_err());

        let inside = Swap::new(Pos::new(0, 0), Direction::Right);
        let eval = evaluate_swap(&board, inside, &config, 0).expect("in bounds");
        assert_eq!((eval.swap, eval.gain), (inside, 0));
    }

    #[test]
    fn test_search_does_not_mutate_input() {
        let board = Board::reference();
        let before = board.clone();
        let outcome = GreedySearch::new().best_swap(&board, &EngineConfig::default(), 99);
        assert_eq!(board, before);
        assert_eq!(outcome.evaluated, 2 * 11 * 10);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let board = Board::reference();
        let config = EngineConfig::default();
        for seed in [1u64, 2, 3] {
            let par = GreedySearch { parallel: true }.best_swap(&board, &config, seed);
            let seq = GreedySearch::sequential().best_swap(&board, &config, seed);
            assert_eq!(par, seq);
        }
    }
}
