//! Append-only writer for the per-frame spiral log
//!
//! Wire format:
//!
//! ```text
//! Spiral Data Log
//!
//! Frame 0 - Date: 23-Jan-2008 16:39 UT:
//! Fast Spiral - x: -0.211, y: -0.213, Distance to Earth [AU]: 1.232
//! ...
//!
//! Frame 1 - Date: 23-Jan-2008 18:34 UT:
//! ...
//! ```

use crate::error::LogResult;
use std::fmt::Write as _;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Header written when a log is (re)initialised
pub const LOG_HEADER: &str = "Spiral Data Log\n\n";

/// Token that starts every block boundary line
pub const SENTINEL: &str = "Frame";

/// Label preceding the distance value on each data line
pub const DISTANCE_LABEL: &str = "Distance to Earth [AU]:";

/// One fast-branch sample as it appears in the log
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogRow {
    pub x: f64,
    pub y: f64,
    pub distance: f64,
}

impl LogRow {
    pub fn new(x: f64, y: f64, distance: f64) -> Self {
        Self { x, y, distance }
    }
}

/// Truncate or create `path` and write the log header.
///
/// The file is closed again before returning.
pub fn init_log(path: &Path) -> LogResult<()> {
    let mut file = File::create(path)?;
    file.write_all(LOG_HEADER.as_bytes())?;
    tracing::info!("Initialised spiral log at {:?}", path);
    Ok(())
}

/// Render one block: sentinel line, one line per row, blank separator
pub fn format_block(frame_index: u32, timestamp_text: &str, rows: &[LogRow]) -> String {
    let mut block = String::with_capacity(64 + rows.len() * 72);
    // Writing into a String cannot fail
    let _ = writeln!(block, "{} {} - Date: {}:", SENTINEL, frame_index, timestamp_text);
    for row in rows {
        let _ = writeln!(
            block,
            "Fast Spiral - x: {:.3}, y: {:.3}, {} {:.3}",
            row.x, row.y, DISTANCE_LABEL, row.distance
        );
    }
    block.push('\n');
    block
}

/// Append one block to an existing log with a single write
pub fn append_block(
    path: &Path,
    frame_index: u32,
    timestamp_text: &str,
    rows: &[LogRow],
) -> LogResult<()> {
    let block = format_block(frame_index, timestamp_text, rows);
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(block.as_bytes())?;
    tracing::debug!("Appended frame {} ({} rows) to {:?}", frame_index, rows.len(), path);
    Ok(())
}

/// Handle on a log file that tracks how many blocks it appended
#[derive(Debug)]
pub struct SpiralLogWriter {
    path: PathBuf,
    blocks_written: usize,
}

impl SpiralLogWriter {
    /// Create a fresh log, discarding any previous content
    pub fn create(path: impl Into<PathBuf>) -> LogResult<Self> {
        let path = path.into();
        init_log(&path)?;
        Ok(Self { path, blocks_written: 0 })
    }

    /// Extend an existing log without touching its content
    pub fn append_to(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), blocks_written: 0 }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Blocks appended through this handle
    pub fn blocks_written(&self) -> usize {
        self.blocks_written
    }

    pub fn append(&mut self, frame_index: u32, timestamp_text: &str, rows: &[LogRow]) -> LogResult<()> {
        append_block(&self.path, frame_index, timestamp_text, rows)?;
        self.blocks_written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_block_format() {
        let rows = [LogRow::new(0.1234, -1.0, 1.23456), LogRow::new(-0.0004, 2.0, 0.5)];
        let block = format_block(7, "23-Jan-2008 16:39 UT", &rows);
        let expected = "Frame 7 - Date: 23-Jan-2008 16:39 UT:\n\
                        Fast Spiral - x: 0.123, y: -1.000, Distance to Earth [AU]: 1.235\n\
                        Fast Spiral - x: -0.000, y: 2.000, Distance to Earth [AU]: 0.500\n\
                        \n";
        assert_eq!(block, expected);
    }

    #[test]
    fn test_init_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spiral.txt");
        std::fs::write(&path, "stale content\n").unwrap();

        init_log(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), LOG_HEADER);
    }

    #[test]
    fn test_append_keeps_previous_blocks() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spiral.txt");
        let mut writer = SpiralLogWriter::create(&path).unwrap();

        writer.append(0, "23-Jan-2008 16:39 UT", &[LogRow::new(1.0, 0.0, 0.0)]).unwrap();
        writer.append(1, "23-Jan-2008 18:34 UT", &[LogRow::new(0.0, 1.0, 1.414)]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(LOG_HEADER));
        assert_eq!(content.lines().filter(|l| l.starts_with(SENTINEL)).count(), 2);
        assert_eq!(writer.blocks_written(), 2);

        // Reopening for append does not reset the file
        let mut again = SpiralLogWriter::append_to(&path);
        again.append(2, "23-Jan-2008 20:30 UT", &[]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().filter(|l| l.starts_with(SENTINEL)).count(), 3);
    }
}
