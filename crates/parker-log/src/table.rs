//! Tab-separated export of a parsed distance series

use crate::error::LogResult;
use crate::reader::DistanceSeries;
use std::io::Write;
use std::path::Path;

/// How the timestamp is laid out in the exported table
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateColumns {
    /// A single `Date` column, `YYYY-MM-DD HH:MM:SS`
    #[default]
    Combined,
    /// `Day`, `Month`, `Year`, `Hour`, `Minute`
    Decomposed,
}

fn header(series: &DistanceSeries, layout: DateColumns) -> Vec<String> {
    let mut cols: Vec<String> = match layout {
        DateColumns::Combined => vec!["Date".to_string()],
        DateColumns::Decomposed => ["Day", "Month", "Year", "Hour", "Minute"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    };
    cols.extend(series.rows().iter().map(|row| format!("Row {}", row)));
    cols
}

/// Write the series as a tab-separated table with a header and no index column.
///
/// Absent values are written as empty cells.
pub fn write_table<W: Write>(series: &DistanceSeries, out: W, layout: DateColumns) -> LogResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(out);

    writer.write_record(header(series, layout))?;

    for record in series.iter() {
        let (year, month, day, hour, minute, second, _) = record.timestamp.to_gregorian_utc();
        let mut fields: Vec<String> = match layout {
            DateColumns::Combined => vec![format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                year, month, day, hour, minute, second
            )],
            DateColumns::Decomposed => vec![
                day.to_string(),
                month.to_string(),
                year.to_string(),
                hour.to_string(),
                minute.to_string(),
            ],
        };
        fields.extend(
            record.values.iter().map(|v| v.map(|d| d.to_string()).unwrap_or_default()),
        );
        writer.write_record(&fields)?;
    }

    writer.flush()?;
    Ok(())
}

/// Save the series to `path`
pub fn save_table(series: &DistanceSeries, path: &Path, layout: DateColumns) -> LogResult<()> {
    let file = std::fs::File::create(path)?;
    write_table(series, file, layout)?;
    tracing::info!("Wrote {} rows to {:?}", series.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::parse_reader;

    const LOG: &str = "Spiral Data Log\n\n\
Frame 0 - Date: 23-Jan-2008 16:39 UT:\n\
Fast Spiral - x: 0.300, y: 0.000, Distance to Earth [AU]: 0.700\n\
Fast Spiral - x: 0.500, y: 0.100, Distance to Earth [AU]: 0.510\n\
\n";

    #[test]
    fn test_combined_table() {
        let series = parse_reader(LOG.as_bytes(), &[0, 1, 5]).unwrap();
        let mut out = Vec::new();
        write_table(&series, &mut out, DateColumns::Combined).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Date\tRow 0\tRow 1\tRow 5");
        assert_eq!(lines[1], "2008-01-23 16:39:00\t0.7\t0.51\t");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_decomposed_table() {
        let series = parse_reader(LOG.as_bytes(), &[1]).unwrap();
        let mut out = Vec::new();
        write_table(&series, &mut out, DateColumns::Decomposed).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Day\tMonth\tYear\tHour\tMinute\tRow 1");
        assert_eq!(lines[1], "23\t1\t2008\t16\t39\t0.51");
    }
}
