use cascade_core::{Board, BoardConfig, CoreError};
use cascade_eval::{ScoreError, ScoreTable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gravity::RefillPolicy;

/// Safety bound on cascade passes per resolve call. Random refill from a
/// palette of two or more colors stays orders of magnitude below it.
pub const DEFAULT_MAX_CASCADES: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error("max_cascades must be at least 1")]
    ZeroCascadeCap,
}

/// Everything the resolution loop reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub board: BoardConfig,
    pub scores: ScoreTable,
    pub refill: RefillPolicy,
    /// `None` resolves until the board is stable, however long that takes.
    pub max_cascades: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            scores: ScoreTable::default(),
            refill: RefillPolicy::Random,
            max_cascades: Some(DEFAULT_MAX_CASCADES),
        }
    }
}

impl EngineConfig {
    pub fn new(board: BoardConfig) -> Self {
        Self {
            board,
            ..Self::default()
        }
    }

    pub fn with_scores(mut self, scores: ScoreTable) -> Self {
        self.scores = scores;
        self
    }

    pub fn with_refill(mut self, refill: RefillPolicy) -> Self {
        self.refill = refill;
        self
    }

    pub fn with_max_cascades(mut self, max_cascades: Option<usize>) -> Self {
        self.max_cascades = max_cascades;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.scores.validate()?;
        if self.max_cascades == Some(0) {
            return Err(EngineError::ZeroCascadeCap);
        }
        Ok(())
    }

    /// Validate the configuration and that `board` fits it.
    pub fn check_board(&self, board: &Board) -> Result<(), EngineError> {
        self.validate()?;
        self.board.check(board)?;
        Ok(())
    }
}
