//! Cascade core crate - board, colors and swap geometry for the match-three simulator.

mod board;
mod color;
mod config;
mod error;
mod moves;

pub use board::{Board, Cell, REFERENCE_GRID};
pub use color::{Color, Palette};
pub use config::BoardConfig;
pub use error::CoreError;
pub use moves::{Direction, Pos, Swap};
