//! Per-game result sinks.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::simulation::GameRecord;

pub const CSV_HEADER: &str =
    "game_id,points,swaps,total_cascades,reached_target,stopping_reason,moves_to_target";

/// Sink for finished games.
pub trait ResultWriter {
    fn write_record(&mut self, record: &GameRecord) -> io::Result<()>;

    fn write_all(&mut self, records: &[GameRecord]) -> io::Result<()> {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()>;

    /// Records written so far.
    fn count(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Csv,
    #[serde(rename = "jsonl")]
    JsonLines,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::JsonLines => "jsonl",
        }
    }
}

pub struct CsvResultWriter<W: Write> {
    out: W,
    header_written: bool,
    count: usize,
}

impl<W: Write> CsvResultWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
            count: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn ensure_header(&mut self) -> io::Result<()> {
        if !self.header_written {
            writeln!(self.out, "{CSV_HEADER}")?;
            self.header_written = true;
        }
        Ok(())
    }
}

impl<W: Write> ResultWriter for CsvResultWriter<W> {
    fn write_record(&mut self, record: &GameRecord) -> io::Result<()> {
        self.ensure_header()?;
        let r = &record.result;
        let moves = r
            .first_swap_at_target
            .map(|n| n.to_string())
            .unwrap_or_default();
        writeln!(
            self.out,
            "{},{},{},{},{},{},{}",
            record.game_id,
            r.points,
            r.swaps,
            r.total_cascades,
            r.reached_target,
            r.stopping_reason,
            moves
        )?;
        self.count += 1;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        // An empty run still gets a header.
        self.ensure_header()?;
        self.out.flush()
    }

    fn count(&self) -> usize {
        self.count
    }
}

/// One JSON object per line.
pub struct JsonLinesWriter<W: Write> {
    out: W,
    count: usize,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, count: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultWriter for JsonLinesWriter<W> {
    fn write_record(&mut self, record: &GameRecord) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, record).map_err(io::Error::other)?;
        self.out.write_all(b"\n")?;
        self.count += 1;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn count(&self) -> usize {
        self.count
    }
}

/// Open `path` for writing, truncating any existing file.
pub fn create_writer(path: &Path, format: OutputFormat) -> io::Result<Box<dyn ResultWriter>> {
    let file = BufWriter::new(File::create(path)?);
    Ok(match format {
        OutputFormat::Csv => Box::new(CsvResultWriter::new(file)),
        OutputFormat::JsonLines => Box::new(JsonLinesWriter::new(file)),
    })
}
