//! Spiral log codec
//!
//! The writer appends one human-readable block per animation frame; the reader
//! parses such a log back into a timestamp-indexed distance series.

pub mod date;
pub mod error;
pub mod reader;
pub mod table;
pub mod writer;

pub use date::{format_log_timestamp, normalize, parse_observation_time};
pub use error::{FormatError, LogError, LogResult};
pub use reader::{parse, parse_reader, DistanceRecord, DistanceSeries, LogBlock, DEFAULT_TARGET_ROWS};
pub use table::{save_table, write_table, DateColumns};
pub use writer::{append_block, init_log, LogRow, SpiralLogWriter, LOG_HEADER};
