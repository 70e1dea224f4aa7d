//! Cascade analysis crate - game driver, multi-game simulation and result output.

mod driver;
mod simulation;
mod writer;

pub use driver::{resolve_game, GameDriver, GameResult, StopReason};
pub use simulation::{
    run_simulation, GameRecord, SimulationConfig, SimulationReport, SimulationSummary, StartBoard,
};
pub use writer::{
    create_writer, CsvResultWriter, JsonLinesWriter, OutputFormat, ResultWriter, CSV_HEADER,
};
