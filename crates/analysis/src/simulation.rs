//! Batches of games and their aggregate statistics.

use cascade_core::Board;
use cascade_engine::{EngineConfig, EngineError};
use cascade_search::GreedySearch;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::driver::{GameDriver, GameResult};

/// Where each game's opening board comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartBoard {
    /// Fresh uniform board per game.
    #[default]
    Random,
    /// The same fixed board for every game.
    Fixed(Board),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub games: usize,
    pub target: u64,
    /// Game `i` is seeded with `seed + i`.
    pub seed: u64,
    pub start: StartBoard,
    pub engine: EngineConfig,
    /// Play games concurrently. Each game is still deterministic.
    pub parallel_games: bool,
    /// Evaluate swap candidates concurrently.
    pub parallel_search: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            games: 10,
            target: 1000,
            seed: 0,
            start: StartBoard::Random,
            engine: EngineConfig::default(),
            parallel_games: false,
            parallel_search: cfg!(feature = "parallel"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: usize,
    #[serde(flatten)]
    pub result: GameResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub games: usize,
    pub avg_points: f64,
    pub avg_swaps: f64,
    pub reached: usize,
    pub reached_rate: f64,
}

impl SimulationSummary {
    pub fn from_records(records: &[GameRecord]) -> Self {
        let games = records.len();
        if games == 0 {
            return Self {
                games,
                avg_points: 0.0,
                avg_swaps: 0.0,
                reached: 0,
                reached_rate: 0.0,
            };
        }
        let n = games as f64;
        let points: u64 = records.iter().map(|r| r.result.points).sum();
        let swaps: u64 = records.iter().map(|r| u64::from(r.result.swaps)).sum();
        let reached = records.iter().filter(|r| r.result.reached_target).count();
        Self {
            games,
            avg_points: points as f64 / n,
            avg_swaps: swaps as f64 / n,
            reached,
            reached_rate: reached as f64 / n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub records: Vec<GameRecord>,
    pub summary: SimulationSummary,
}

fn play_one(config: &SimulationConfig, game_id: usize) -> Result<GameRecord, EngineError> {
    let mut rng = SmallRng::seed_from_u64(config.seed.wrapping_add(game_id as u64));
    let board = match &config.start {
        StartBoard::Random => config.engine.board.random_board(&mut rng)?,
        StartBoard::Fixed(board) => board.clone(),
    };
    let search = GreedySearch {
        parallel: config.parallel_search,
    };
    let mut driver =
        GameDriver::new(board, config.engine.clone(), rng.random())?.with_search(search);
    let result = driver.run(config.target);
    info!(
        game = game_id,
        points = result.points,
        reached_target = result.reached_target,
        reason = %result.stopping_reason,
        "game finished"
    );
    Ok(GameRecord { game_id, result })
}

/// Play `config.games` games. Records come back ordered by game id.
pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationReport, EngineError> {
    config.engine.validate()?;
    if let StartBoard::Fixed(board) = &config.start {
        config.engine.check_board(board)?;
    }

    let records = play_all(config)?;
    let summary = SimulationSummary::from_records(&records);
    info!(
        games = summary.games,
        avg_points = summary.avg_points,
        avg_swaps = summary.avg_swaps,
        "simulation finished"
    );
    Ok(SimulationReport { records, summary })
}

#[cfg(feature = "parallel")]
fn play_all(config: &SimulationConfig) -> Result<Vec<GameRecord>, EngineError> {
    if config.parallel_games {
        (0..config.games)
            .into_par_iter()
            .map(|id| play_one(config, id))
            .collect()
    } else {
        (0..config.games).map(|id| play_one(config, id)).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn play_all(config: &SimulationConfig) -> Result<Vec<GameRecord>, EngineError> {
    (0..config.games).map(|id| play_one(config, id)).collect()
}
