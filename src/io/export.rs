//! Export the active series (and trendline) to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts:
//! one row per point, with a `series` column telling data rows from trend rows.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::app::session::ChartFrame;
use crate::error::AppError;

/// Write the frame's points to a CSV file.
pub fn write_series_csv(path: &Path, frame: &ChartFrame) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_series_csv_to(file, frame)
}

/// Write the frame's points as CSV to any writer.
pub fn write_series_csv_to<W: Write>(writer: W, frame: &ChartFrame) -> Result<(), AppError> {
    let mut out = csv::Writer::from_writer(writer);
    let err = |e: csv::Error| AppError::io(format!("Failed to write export CSV: {e}"));

    out.write_record(["year", "total_fatalities", "series"]).map_err(err)?;

    let label = frame.filter.label();
    for p in &frame.series {
        out.write_record([p.year.to_string(), p.total_fatalities.to_string(), label.to_string()])
            .map_err(err)?;
    }
    if let Some(line) = frame.trend.line() {
        for p in &line.points {
            out.write_record([p.year.to_string(), format!("{:.6}", p.total_fatalities), "trend".to_string()])
                .map_err(err)?;
        }
    }

    out.flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::app::session::ChartSession;
    use crate::domain::{IncidentRecord, SeriesFilter, TrendBounds};

    #[test]
    fn writes_series_and_trend_rows() {
        let records = vec![
            IncidentRecord::from_raw("2000-01-01", "Boeing", "10"),
            IncidentRecord::from_raw("2001-01-01", "Boeing", "20"),
            IncidentRecord::from_raw("2002-01-01", "Boeing", "30"),
        ];
        let mut session = ChartSession::new(aggregate(&records), TrendBounds::default());
        session.on_filter_changed(SeriesFilter::from_label("Boeing"));
        let frame = session.on_trend_toggle(true);

        let mut buf = Vec::new();
        write_series_csv_to(&mut buf, &frame).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let expected = concat!(
            "year,total_fatalities,series\n",
            "2000,10,Boeing\n",
            "2001,20,Boeing\n",
            "2002,30,Boeing\n",
            "1995,-40.000000,trend\n",
            "2016,170.000000,trend\n",
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn writes_file_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.csv");
        let session = ChartSession::new(aggregate(&[]), TrendBounds::default());
        write_series_csv(&path, &session.frame()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "year,total_fatalities,series\n");
    }

    #[test]
    fn unwritable_destination_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("series.csv");
        let session = ChartSession::new(aggregate(&[]), TrendBounds::default());
        let err = write_series_csv(&path, &session.frame()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_IO);
    }
}
