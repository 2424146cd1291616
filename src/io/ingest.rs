//! CSV ingest.
//!
//! This module turns an incident CSV export into `IncidentRecord`s.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Lenient rows**: malformed values are kept as `None` and left for the
//!   aggregator to exclude; only rows the CSV reader cannot parse at all are dropped
//! - **Separation of concerns**: no aggregation logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::domain::IncidentRecord;
use crate::error::AppError;

pub const COL_EVENT_DATE: &str = "event_date";
pub const COL_MAKE: &str = "make";
pub const COL_FATALITIES: &str = "total_fatal_injuries";

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: records + rows the reader could not parse.
#[derive(Debug, Clone, Default)]
pub struct IngestedData {
    pub records: Vec<IncidentRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load incident records from a CSV file.
pub fn load_incidents(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let data = read_incidents(file)?;
    info!(
        path = %path.display(),
        rows = data.rows_read,
        records = data.records.len(),
        row_errors = data.row_errors.len(),
        "loaded incident CSV"
    );
    Ok(data)
}

/// Read incident records from any CSV source.
pub fn read_incidents<R: Read>(source: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    let columns = Columns::resolve(&header_map)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header line, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        match result {
            Ok(record) => {
                let parsed = columns.parse(&record);
                if parsed.event_date.is_none() {
                    debug!(line, "unparseable event date");
                }
                if parsed.fatalities.is_none() {
                    debug!(line, "non-numeric fatality value");
                }
                records.push(parsed);
            }
            Err(e) => {
                warn!(line, error = %e, "skipping unreadable CSV row");
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
            }
        }
    }

    Ok(IngestedData {
        records,
        row_errors,
        rows_read,
    })
}

/// Column positions of the fields we need.
#[derive(Debug, Clone, Copy)]
struct Columns {
    event_date: usize,
    make: usize,
    fatalities: usize,
}

impl Columns {
    fn resolve(header_map: &HashMap<String, usize>) -> Result<Self, AppError> {
        let find = |name: &str| {
            header_map
                .get(name)
                .copied()
                .ok_or_else(|| AppError::input(format!("Missing required column: `{name}`")))
        };
        Ok(Self {
            event_date: find(COL_EVENT_DATE)?,
            make: find(COL_MAKE)?,
            fatalities: find(COL_FATALITIES)?,
        })
    }

    fn parse(&self, record: &StringRecord) -> IncidentRecord {
        // Short rows (flexible mode) read missing cells as empty.
        let field = |idx: usize| record.get(idx).unwrap_or("");
        IncidentRecord::from_raw(
            field(self.event_date),
            field(self.make),
            field(self.fatalities),
        )
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    #[test]
    fn reads_required_columns_case_insensitively() {
        let csv = "\u{feff}Event_Id,Event_Date,Make,Model,Total_Fatal_Injuries\n\
                   E1,2001-03-04,Boeing,737,12\n\
                   E2,1/9/2003,Airbus,A320,\n";
        let data = read_incidents(csv.as_bytes()).unwrap();

        assert_eq!(data.rows_read, 2);
        assert!(data.row_errors.is_empty());
        assert_eq!(
            data.records[0],
            IncidentRecord::new(NaiveDate::from_ymd_opt(2001, 3, 4).unwrap(), "Boeing", 12.0)
        );
        assert_eq!(
            data.records[1],
            IncidentRecord::new(NaiveDate::from_ymd_opt(2003, 1, 9).unwrap(), "Airbus", 0.0)
        );
    }

    #[test]
    fn malformed_values_are_kept_as_none() {
        let csv = "Event_Date,Make,Total_Fatal_Injuries\n\
                   garbage,Boeing,3\n\
                   2004-05-06,Boeing,N/A\n";
        let data = read_incidents(csv.as_bytes()).unwrap();
        assert_eq!(data.records.len(), 2);
        assert_eq!(data.records[0].event_date, None);
        assert_eq!(data.records[1].fatalities, None);
    }

    #[test]
    fn short_rows_read_missing_cells_as_blank() {
        let csv = "Event_Date,Make,Total_Fatal_Injuries\n2004-05-06,Cessna\n";
        let data = read_incidents(csv.as_bytes()).unwrap();
        assert_eq!(data.records[0].manufacturer, "Cessna");
        assert_eq!(data.records[0].fatalities, Some(0.0));
    }

    #[test]
    fn missing_column_is_an_input_error() {
        let csv = "Event_Date,Make\n2004-05-06,Cessna\n";
        let err = read_incidents(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("total_fatal_injuries"));
    }

    #[test]
    fn load_incidents_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Event_Date,Make,Total_Fatal_Injuries").unwrap();
        writeln!(file, "2010-02-03,Piper,1").unwrap();
        let data = load_incidents(file.path()).unwrap();
        assert_eq!(data.records.len(), 1);
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = load_incidents(Path::new("/nonexistent/incidents.csv")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
