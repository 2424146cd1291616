//! Year-wise fatality aggregation.
//!
//! One pass over the records groups fatalities by year (combined series) and by
//! `(manufacturer, year)` (per-manufacturer series). Grouping uses ordered maps, so
//! every produced series comes out strictly increasing by year.
//!
//! Records whose date has no year or whose fatality value is not finite are counted
//! in `SeriesCollection::excluded` and contribute to no series at all. A record that
//! would push a running total past the finite range is excluded the same way. That
//! keeps the combined series equal to the year-wise sum of the manufacturer series.
//!
//! Manufacturer keys come from every input record, so a manufacturer whose records
//! were all excluded still has an (empty) series.

use std::collections::BTreeMap;

use crate::domain::{ExclusionCounts, IncidentRecord, RecordIssue, SeriesCollection, YearlyPoint};

/// Aggregate incident records into yearly series.
pub fn aggregate(records: &[IncidentRecord]) -> SeriesCollection {
    let mut overall: BTreeMap<i32, f64> = BTreeMap::new();
    let mut by_make: BTreeMap<String, BTreeMap<i32, f64>> = BTreeMap::new();
    let mut excluded = ExclusionCounts::default();
    let mut records_used = 0usize;

    for record in records {
        // Every manufacturer present in the input stays selectable, even when all
        // of its records are excluded.
        let make_years = by_make.entry(record.manufacturer.clone()).or_default();

        let (year, value) = match record.classify() {
            Ok(v) => v,
            Err(issue) => {
                excluded.record(issue);
                continue;
            }
        };

        let year_total = overall.get(&year).copied().unwrap_or(0.0) + value;
        let make_total = make_years.get(&year).copied().unwrap_or(0.0) + value;
        if !year_total.is_finite() || !make_total.is_finite() {
            excluded.record(RecordIssue::NonNumericFatalityValue);
            continue;
        }

        overall.insert(year, year_total);
        make_years.insert(year, make_total);
        records_used += 1;
    }

    SeriesCollection {
        overall: into_series(overall),
        by_manufacturer: by_make
            .into_iter()
            .map(|(make, years)| (make, into_series(years)))
            .collect(),
        excluded,
        records_used,
    }
}

fn into_series(years: BTreeMap<i32, f64>) -> Vec<YearlyPoint> {
    years
        .into_iter()
        .map(|(year, total)| YearlyPoint::new(year, total))
        .collect()
}
