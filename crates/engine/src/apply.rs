use cascade_core::{Board, Swap};
use rand::Rng;

use crate::cascade::{resolve, Resolution};
use crate::config::{EngineConfig, EngineError};

/// Apply a swap to a copy of `board`, resolve it fully and return the
/// settled board with its resolution. `board` itself is never touched.
pub fn apply_swap<R: Rng + ?Sized>(
    board: &Board,
    swap: Swap,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<(Board, Resolution), EngineError> {
    let mut next = board.swapped(swap)?;
    let resolution = resolve(&mut next, config, rng);
    Ok((next, resolution))
}
