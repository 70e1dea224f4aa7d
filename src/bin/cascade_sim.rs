use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use cascade_sim::analysis::{
    create_writer, run_simulation, OutputFormat, SimulationConfig, StartBoard,
};
use cascade_sim::core::{Board, BoardConfig, Palette};
use cascade_sim::engine::RefillPolicy;
use clap::{Parser, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::prelude::*;

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Format {
    Csv,
    Jsonl,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => OutputFormat::Csv,
            Format::Jsonl => OutputFormat::JsonLines,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "cascade_sim", about = "Greedy match-three game simulator")]
struct Cli {
    #[arg(
        short = 'v',
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity level (default = WARN, -v = INFO, -vv = DEBUG, -vvv = TRACE)"
    )]
    verbose: u8,

    #[arg(long, help = "JSON simulation config; flags below override it")]
    config: Option<PathBuf>,

    #[arg(long, help = "Number of games to play [default: 10]")]
    games: Option<usize>,

    #[arg(long, help = "Points needed to win a game [default: 1000]")]
    target: Option<u64>,

    #[arg(long, help = "Board rows [default: 11]")]
    rows: Option<usize>,

    #[arg(long, help = "Board columns [default: 11]")]
    cols: Option<usize>,

    #[arg(long, help = "Number of colors on the board [default: 4]")]
    colors: Option<u8>,

    #[arg(long, help = "Base seed; game i uses seed + i [default: 0]")]
    seed: Option<u64>,

    #[arg(long, help = "Start every game from the built-in 11x11 reference board")]
    predefined: bool,

    #[arg(long, help = "Leave cleared cells empty instead of refilling them")]
    no_refill: bool,

    #[arg(long, help = "Evaluate swaps and games on the current thread only")]
    sequential: bool,

    #[arg(long, default_value = "results/results.csv", help = "Per-game results file")]
    output: PathBuf,

    #[arg(long, value_enum, default_value = "csv", help = "Results file format")]
    format: Format,
}

fn load_config(cli: &Cli) -> Result<SimulationConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SimulationConfig {
            parallel_games: true,
            ..SimulationConfig::default()
        },
    };

    if let Some(games) = cli.games {
        config.games = games;
    }
    if let Some(target) = cli.target {
        config.target = target;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let current = &config.engine.board;
    let (mut rows, mut cols) = (
        cli.rows.unwrap_or(current.rows()),
        cli.cols.unwrap_or(current.cols()),
    );
    let palette = match cli.colors {
        Some(n) => Palette::with_size(n)?,
        None => current.palette().clone(),
    };
    if cli.predefined {
        let board = Board::reference();
        rows = board.rows();
        cols = board.cols();
        config.start = StartBoard::Fixed(board);
    }
    config.engine.board = BoardConfig::new(rows, cols, palette)?;

    if cli.no_refill {
        config.engine.refill = RefillPolicy::Suppressed;
    }
    if cli.sequential {
        config.parallel_games = false;
        config.parallel_search = false;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbosity = cli.verbose.saturating_add(2).clamp(1, 5);
    let level = Level::from_str(verbosity.to_string().as_str())?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();

    let config = load_config(&cli)?;
    info!(
        games = config.games,
        target = config.target,
        seed = config.seed,
        "starting simulation"
    );

    let report = run_simulation(&config)?;

    if let Some(dir) = cli.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let mut writer = create_writer(&cli.output, cli.format.into())
        .with_context(|| format!("opening {}", cli.output.display()))?;
    writer.write_all(&report.records)?;
    writer.flush()?;
    info!(records = writer.count(), path = %cli.output.display(), "results written");

    let summary = &report.summary;
    println!("games       = {}", summary.games);
    println!("avg_points  = {:.2}", summary.avg_points);
    println!("avg_swaps   = {:.2}", summary.avg_swaps);
    println!(
        "reached     = {} ({:.1}%)",
        summary.reached,
        summary.reached_rate * 100.0
    );
    Ok(())
}
