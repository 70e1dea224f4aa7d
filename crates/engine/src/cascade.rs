//! The cascade loop: detect, remove, gravity, refill, repeat until stable.

use cascade_core::Board;
use cascade_eval::{detect_formations, Detection};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::config::EngineConfig;
use crate::gravity::{apply_gravity, refill};

/// Outcome of resolving one board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub score: u64,
    pub cascades: u32,
    /// The cascade cap stopped resolution with formations still on the board.
    pub capped: bool,
}

/// One cascade pass. Returns `None`, leaving the board untouched, when
/// nothing matches.
pub fn resolve_step<R: Rng + ?Sized>(
    board: &mut Board,
    config: &EngineConfig,
    rng: &mut R,
) -> Option<Detection> {
    let detection = detect_formations(board, &config.scores);
    if detection.is_empty() {
        return None;
    }
    for pos in detection.claimed_cells() {
        board.set(pos, None);
    }
    apply_gravity(board);
    refill(board, config.board.palette(), config.refill, rng);
    Some(detection)
}

/// Resolve `board` in place until no formation remains (or the cap is hit).
pub fn resolve<R: Rng + ?Sized>(
    board: &mut Board,
    config: &EngineConfig,
    rng: &mut R,
) -> Resolution {
    let mut out = Resolution::default();
    loop {
        if let Some(cap) = config.max_cascades {
            if out.cascades as usize >= cap {
                if !detect_formations(board, &config.scores).is_empty() {
                    warn!(cap, score = out.score, "cascade cap reached, board left unresolved");
                    out.capped = true;
                }
                break;
            }
        }
        let Some(detection) = resolve_step(board, config, rng) else {
            break;
        };
        out.score += detection.score();
        out.cascades += 1;
        trace!(
            cascade = out.cascades,
            formations = detection.formations().len(),
            points = detection.score(),
            "cascade pass"
        );
    }
    out
}
