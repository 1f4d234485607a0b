//! Engine output written as a log and read back

use approx::assert_relative_eq;
use nalgebra::Vector2;
use parker_log::{parse, save_table, DateColumns, SpiralLogWriter};
use parker_sim::{Advance, FrameAdvanceEngine, SpiralConfig, SpiralGeometry};
use tempfile::tempdir;

const FRAMES: u32 = 12;

fn engine(config: &SpiralConfig) -> FrameAdvanceEngine {
    let params = config.parameters().unwrap();
    FrameAdvanceEngine::new(SpiralGeometry::build(&params), config.clock().unwrap())
}

#[test]
fn test_logged_frames_parse_back() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("spiral_data_log.txt");

    let config = SpiralConfig::default();
    let mut engine = engine(&config);
    let mut writer = SpiralLogWriter::create(&log_path).unwrap();

    let mut expected = Vec::new();
    for frame in 0..FRAMES {
        assert_eq!(engine.advance(frame, &mut writer).unwrap(), Advance::Advanced);
        expected.push(engine.state().cloned().unwrap());
    }
    // Timer firing twice on the same index leaves the log alone
    assert_eq!(engine.advance(FRAMES - 1, &mut writer).unwrap(), Advance::Unchanged);
    assert_eq!(writer.blocks_written(), FRAMES as usize);

    let rows: Vec<usize> = (0..config.sample_count).collect();
    let series = parse(&log_path, &rows).unwrap();
    assert_eq!(series.len(), FRAMES as usize);

    for (record, state) in series.iter().zip(&expected) {
        assert_eq!(record.frame_index, Some(state.frame_index));
        for (value, distance) in record.values.iter().zip(&state.fast.distances) {
            let value = value.expect("every sample row is present");
            assert_relative_eq!(value, *distance, epsilon = 5e-4 + 1e-12);
        }
    }

    // Frames are 1.927 h apart, well above the minute resolution of the log
    for pair in series.records().windows(2) {
        assert!(pair[0].timestamp < pair[1].timestamp);
    }
}

#[test]
fn test_logged_positions_agree_with_distances() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("spiral_data_log.txt");

    let config = SpiralConfig::default();
    let mut engine = engine(&config);
    let mut writer = SpiralLogWriter::create(&log_path).unwrap();
    engine.advance(30, &mut writer).unwrap();

    let text = std::fs::read_to_string(&log_path).unwrap();
    let observer = engine.observer();
    let mut checked = 0;
    for line in text.lines().filter(|l| l.starts_with("Fast Spiral")) {
        let numbers: Vec<f64> = line
            .split(|c: char| c == ',' || c == ':')
            .filter_map(|field| field.trim().parse().ok())
            .collect();
        assert_eq!(numbers.len(), 3, "line {:?}", line);
        let recomputed = (Vector2::new(numbers[0], numbers[1]) - observer).norm();
        // x and y carry 3 decimals each
        assert_relative_eq!(recomputed, numbers[2], epsilon = 2e-3);
        checked += 1;
    }
    assert_eq!(checked, config.sample_count);
}

#[test]
fn test_extracted_table_has_one_line_per_frame() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("spiral_data_log.txt");
    let table_path = dir.path().join("extracted_data.txt");

    let config = SpiralConfig { frame_count: 5, ..SpiralConfig::default() };
    let mut engine = engine(&config);
    let mut writer = SpiralLogWriter::create(&log_path).unwrap();
    while let Some(frame) = engine.clock_mut().tick() {
        engine.advance(frame, &mut writer).unwrap();
    }

    let series = parse(&log_path, &config.target_rows).unwrap();
    assert_eq!(series.len(), 5);
    save_table(&series, &table_path, DateColumns::Combined).unwrap();

    let table = std::fs::read_to_string(&table_path).unwrap();
    let mut lines = table.lines();
    let header = lines.next().unwrap();
    assert_eq!(header.split('\t').count(), 1 + config.target_rows.len());
    assert_eq!(lines.count(), 5);
}
