//! Reader that turns a spiral log back into a timestamp-indexed series
//!
//! Grammar accepted by the reader:
//!
//! ```text
//! log       := line*
//! sentinel  := "Frame" <anything> "Date" <date-text> ["UT:" <anything>]
//! data line := <anything> "Distance to Earth [AU]:" <spaces> [0-9.]+ <anything>
//! ```
//!
//! Every line starting with `Frame` opens a new block. Lines before the first
//! sentinel (the header) belong to no block and are ignored. Row `i` of a block
//! is the `i`-th line after its sentinel. Missing rows and lines without a
//! distance read as absent values. A final block whose sentinel date does not
//! parse is dropped with a warning; anywhere else it is an error.

use crate::date::normalize;
use crate::error::{FormatError, LogError, LogResult};
use crate::writer::{DISTANCE_LABEL, SENTINEL};
use hifitime::Epoch;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Rows extracted by default
pub const DEFAULT_TARGET_ROWS: [usize; 7] = [15, 20, 25, 30, 35, 40, 45];

/// One raw block of the log
#[derive(Clone, Debug, PartialEq)]
pub struct LogBlock {
    /// Frame number from the sentinel, if it parses
    pub frame_index: Option<u32>,
    /// Date text between `Date` and `UT:` on the sentinel line
    pub timestamp_text: Option<String>,
    /// The sentinel line itself
    pub sentinel: String,
    /// 1-based line number of the sentinel
    pub line_number: usize,
    pub lines: Vec<String>,
}

impl LogBlock {
    fn from_sentinel(line: &str, line_number: usize) -> Self {
        Self {
            frame_index: sentinel_frame(line),
            timestamp_text: sentinel_timestamp(line).map(str::to_owned),
            sentinel: line.to_owned(),
            line_number,
            lines: Vec::new(),
        }
    }

    /// Distance on the given row, if present
    pub fn distance(&self, row: usize) -> Option<f64> {
        self.lines.get(row).and_then(|line| extract_distance(line))
    }
}

/// Frame number following the sentinel token
pub fn sentinel_frame(line: &str) -> Option<u32> {
    line.strip_prefix(SENTINEL)?
        .split_whitespace()
        .next()?
        .parse()
        .ok()
}

/// Date text of a sentinel line: everything between `Date` and `UT:`, trimmed
pub fn sentinel_timestamp(line: &str) -> Option<&str> {
    let (_, after) = line.split_once("Date")?;
    let text = after.split_once("UT:").map_or(after, |(head, _)| head);
    let text = text.trim().trim_start_matches(':').trim();
    if text.is_empty() { None } else { Some(text) }
}

/// Numeric value following the distance label
pub fn extract_distance(line: &str) -> Option<f64> {
    let (_, rest) = line.split_once(DISTANCE_LABEL)?;
    let rest = rest.trim_start();
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    rest[..end].parse().ok()
}

/// Split a log into blocks in file order
pub fn read_blocks<R: BufRead>(reader: R) -> LogResult<Vec<LogBlock>> {
    let mut blocks = Vec::new();
    let mut current: Option<LogBlock> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.starts_with(SENTINEL) {
            if let Some(done) = current.take() {
                blocks.push(done);
            }
            current = Some(LogBlock::from_sentinel(&line, idx + 1));
        } else if let Some(block) = current.as_mut() {
            block.lines.push(line);
        }
    }

    // No trailing sentinel closes the last block
    if let Some(done) = current.take() {
        blocks.push(done);
    }

    Ok(blocks)
}

/// Distances of one frame, aligned with the series' target rows
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceRecord {
    pub timestamp: Epoch,
    pub frame_index: Option<u32>,
    pub values: Vec<Option<f64>>,
}

/// Parsed log: target rows plus one record per block
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceSeries {
    rows: Vec<usize>,
    records: Vec<DistanceRecord>,
}

impl DistanceSeries {
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn records(&self) -> &[DistanceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DistanceRecord> {
        self.records.iter()
    }

    /// Position of `row` among the target rows
    pub fn column_index(&self, row: usize) -> Option<usize> {
        self.rows.iter().position(|r| *r == row)
    }

    /// Value of `row` in record `record`
    pub fn value(&self, record: usize, row: usize) -> Option<f64> {
        let col = self.column_index(row)?;
        self.records.get(record)?.values.get(col).copied().flatten()
    }

    /// Every value of one row, in record order
    pub fn column(&self, row: usize) -> Option<Vec<Option<f64>>> {
        let col = self.column_index(row)?;
        Some(self.records.iter().map(|r| r.values[col]).collect())
    }
}

fn finalize(block: &LogBlock, rows: &[usize]) -> LogResult<DistanceRecord> {
    let text = block.timestamp_text.as_deref().ok_or_else(|| LogError::FormatAt {
        line: block.line_number,
        source: FormatError::new(block.sentinel.as_str(), "sentinel line carries no date"),
    })?;
    let timestamp = normalize(text).map_err(|source| LogError::FormatAt {
        line: block.line_number,
        source,
    })?;

    let values: Vec<Option<f64>> = rows.iter().map(|row| block.distance(*row)).collect();
    let absent = values.iter().filter(|v| v.is_none()).count();
    if absent > 0 {
        tracing::debug!(
            "Frame block at line {}: {} of {} rows absent",
            block.line_number, absent, rows.len()
        );
    }

    Ok(DistanceRecord { timestamp, frame_index: block.frame_index, values })
}

/// Parse log content from any buffered reader
pub fn parse_reader<R: BufRead>(reader: R, target_rows: &[usize]) -> LogResult<DistanceSeries> {
    let blocks = read_blocks(reader)?;
    let mut records = Vec::with_capacity(blocks.len());
    for (idx, block) in blocks.iter().enumerate() {
        match finalize(block, target_rows) {
            Ok(record) => records.push(record),
            // A writer may still be appending: a torn final sentinel is dropped
            Err(LogError::FormatAt { line, source }) if idx + 1 == blocks.len() => {
                tracing::warn!("Skipping trailing block at line {}: {}", line, source);
            }
            Err(err) => return Err(err),
        }
    }

    Ok(DistanceSeries { rows: target_rows.to_vec(), records })
}

/// Parse a log file into a series restricted to `target_rows`
pub fn parse(path: &Path, target_rows: &[usize]) -> LogResult<DistanceSeries> {
    tracing::info!("Reading spiral log {:?}", path);
    let file = File::open(path)?;
    let series = parse_reader(BufReader::new(file), target_rows)?;
    tracing::info!("Parsed {} frames for {} rows", series.len(), target_rows.len());
    Ok(series)
}
