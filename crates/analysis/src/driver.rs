//! One game: resolve the opening board, then commit greedy swaps until the
//! target is met or no swap scores.

use cascade_core::Board;
use cascade_engine::{resolve, EngineConfig, EngineError};
use cascade_search::GreedySearch;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopReason {
    ReachedTarget,
    NoMoves,
}

impl StopReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReachedTarget => "REACHED_TARGET",
            Self::NoMoves => "NO_MOVES",
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub points: u64,
    pub swaps: u32,
    /// Cascades of the opening resolve only.
    pub total_cascades: u32,
    pub reached_target: bool,
    pub stopping_reason: StopReason,
    /// Swap count at which the target was first met. `None` when it never
    /// was, or was already met by the opening resolve.
    pub first_swap_at_target: Option<u32>,
}

/// Owns the authoritative board for one game.
pub struct GameDriver {
    board: Board,
    config: EngineConfig,
    search: GreedySearch,
    rng: SmallRng,
}

impl GameDriver {
    /// Fails fast on an invalid configuration or a board that does not fit it.
    pub fn new(board: Board, config: EngineConfig, seed: u64) -> Result<Self, EngineError> {
        config.check_board(&board)?;
        Ok(Self {
            board,
            config,
            search: GreedySearch::default(),
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    pub fn with_search(mut self, search: GreedySearch) -> Self {
        self.search = search;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    #[instrument(skip(self), fields(rows = self.board.rows(), cols = self.board.cols()))]
    pub fn run(&mut self, target: u64) -> GameResult {
        let opening = resolve(&mut self.board, &self.config, &mut self.rng);
        let mut points = opening.score;
        let mut swaps = 0u32;
        let mut first_swap_at_target = None;
        debug!(points, cascades = opening.cascades, "opening resolved");

        while points < target {
            let round_seed: u64 = self.rng.random();
            let outcome = self.search.best_swap(&self.board, &self.config, round_seed);
            let Some(candidate) = outcome.best else {
                break;
            };
            self.board = candidate.board;
            points += outcome.gain;
            swaps += 1;
            debug!(
                swap = swaps,
                gain = outcome.gain,
                points,
                row = candidate.swap.from.row,
                col = candidate.swap.from.col,
                dir = ?candidate.swap.dir,
                "swap committed"
            );
            if points >= target && first_swap_at_target.is_none() {
                first_swap_at_target = Some(swaps);
            }
        }

        let reached_target = points >= target;
        GameResult {
            points,
            swaps,
            total_cascades: opening.cascades,
            reached_target,
            stopping_reason: if reached_target {
                StopReason::ReachedTarget
            } else {
                StopReason::NoMoves
            },
            first_swap_at_target,
        }
    }
}

/// Play one game from `board` to `target`.
pub fn resolve_game(
    board: Board,
    config: &EngineConfig,
    target: u64,
    seed: u64,
) -> Result<GameResult, EngineError> {
    let mut driver = GameDriver::new(board, config.clone(), seed)?;
    Ok(driver.run(target))
}
