//! Shared domain types.
//!
//! Lightweight, serializable types that are:
//!
//! - produced by the aggregation/trend core
//! - rendered by the terminal front-ends
//! - exported to JSON/CSV

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserved selection label meaning "all manufacturers combined".
pub const ALL_LABEL: &str = "All";

/// Display label used for records whose manufacturer field is empty.
pub const BLANK_LABEL: &str = "(blank)";

/// Default display bounds of the year axis (and the trendline end points).
pub const DEFAULT_FROM_YEAR: i32 = 1995;
pub const DEFAULT_TO_YEAR: i32 = 2016;

/// One incident row after field coercion.
///
/// The date and fatality fields stay optional: a malformed source value is kept as
/// `None` here and excluded later by the aggregator, so ingest never has to decide
/// what a bad row means for the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentRecord {
    pub event_date: Option<NaiveDate>,
    pub manufacturer: String,
    pub fatalities: Option<f64>,
}

/// Why a record was left out of every aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum RecordIssue {
    #[error("event date does not resolve to a calendar year")]
    UnparseableDate,
    #[error("fatality value is not a finite number")]
    NonNumericFatalityValue,
}

impl IncidentRecord {
    pub fn new(event_date: NaiveDate, manufacturer: impl Into<String>, fatalities: f64) -> Self {
        Self {
            event_date: Some(event_date),
            manufacturer: manufacturer.into(),
            fatalities: Some(fatalities),
        }
    }

    /// Build a record from raw text fields, applying the date and number coercions.
    pub fn from_raw(event_date: &str, manufacturer: &str, fatalities: &str) -> Self {
        Self {
            event_date: parse_event_date(event_date),
            manufacturer: manufacturer.trim().to_string(),
            fatalities: coerce_fatalities(fatalities),
        }
    }

    /// Calendar year of the event.
    pub fn year(&self) -> Result<i32, RecordIssue> {
        self.event_date
            .map(|d| d.year())
            .ok_or(RecordIssue::UnparseableDate)
    }

    /// Fatality count as a finite number.
    pub fn fatality_value(&self) -> Result<f64, RecordIssue> {
        match self.fatalities {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(RecordIssue::NonNumericFatalityValue),
        }
    }

    /// Validate both fields at once, date first.
    pub fn classify(&self) -> Result<(i32, f64), RecordIssue> {
        let year = self.year()?;
        let value = self.fatality_value()?;
        Ok((year, value))
    }
}

/// Parse an event date from the handful of layouts seen in incident exports.
///
/// Two-digit-year layouts are tried before their four-digit twins: chrono's `%Y`
/// happily reads `16` as the year 16 AD.
pub fn parse_event_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    const DATE_FMTS: [&str; 9] = [
        "%Y-%m-%d",
        "%m/%d/%y",
        "%m/%d/%Y",
        "%Y/%m/%d",
        "%d-%b-%y",
        "%d-%b-%Y",
        "%b %d, %Y",
        "%B %d, %Y",
        "%d %B %Y",
    ];
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    const DATETIME_FMTS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%m/%d/%Y %H:%M:%S",
    ];
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    // A bare year ("2009") is a valid date in most spreadsheet exports.
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year = s.parse::<i32>().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    None
}

/// Coerce a fatality field to a number.
///
/// Blank means zero (an empty cell counts as "no fatalities"). Anything that does not
/// parse as a number is `None`. Non-finite parses (`inf`, `NaN`) are kept so the
/// aggregator can reject them with the same issue as text.
pub fn coerce_fatalities(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    s.parse::<f64>().ok()
}

/// One aggregated point of a yearly series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyPoint {
    pub year: i32,
    pub total_fatalities: f64,
}

impl YearlyPoint {
    pub fn new(year: i32, total_fatalities: f64) -> Self {
        Self {
            year,
            total_fatalities,
        }
    }
}

/// Which series the chart shows.
///
/// `All` is kept separate from manufacturer labels so a manufacturer literally named
/// "All" can never shadow the combined series.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeriesFilter {
    #[default]
    All,
    Manufacturer(String),
}

impl SeriesFilter {
    /// Interpret a user-facing label (`All` is reserved).
    pub fn from_label(label: &str) -> Self {
        if label == ALL_LABEL {
            SeriesFilter::All
        } else {
            SeriesFilter::Manufacturer(label.to_string())
        }
    }

    /// Raw label as used for lookups and exports.
    pub fn label(&self) -> &str {
        match self {
            SeriesFilter::All => ALL_LABEL,
            SeriesFilter::Manufacturer(label) => label,
        }
    }

    /// Label for terminal display (empty manufacturer shows as `(blank)`).
    pub fn display_name(&self) -> &str {
        match self {
            SeriesFilter::Manufacturer(label) if label.is_empty() => BLANK_LABEL,
            other => other.label(),
        }
    }
}

impl fmt::Display for SeriesFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Counts of records left out of the aggregates, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionCounts {
    pub unparseable_date: usize,
    pub non_numeric_fatalities: usize,
}

impl ExclusionCounts {
    pub fn record(&mut self, issue: RecordIssue) {
        match issue {
            RecordIssue::UnparseableDate => self.unparseable_date += 1,
            RecordIssue::NonNumericFatalityValue => self.non_numeric_fatalities += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.unparseable_date + self.non_numeric_fatalities
    }
}

/// Aggregator output: the combined series plus one series per manufacturer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesCollection {
    pub overall: Vec<YearlyPoint>,
    pub by_manufacturer: BTreeMap<String, Vec<YearlyPoint>>,
    pub excluded: ExclusionCounts,
    /// Records that contributed to at least one point.
    pub records_used: usize,
}

impl SeriesCollection {
    /// Series for a selection. Unknown labels yield an empty series.
    pub fn series(&self, filter: &SeriesFilter) -> &[YearlyPoint] {
        match filter {
            SeriesFilter::All => &self.overall,
            SeriesFilter::Manufacturer(label) => self
                .by_manufacturer
                .get(label)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }

    /// Selectable labels: `All` first, then manufacturers in sorted order.
    pub fn available_labels(&self) -> Vec<SeriesFilter> {
        std::iter::once(SeriesFilter::All)
            .chain(
                self.by_manufacturer
                    .keys()
                    .map(|label| SeriesFilter::Manufacturer(label.clone())),
            )
            .collect()
    }

    /// Largest yearly total of the combined series.
    pub fn max_overall(&self) -> Option<f64> {
        self.overall
            .iter()
            .map(|p| p.total_fatalities)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
    }

    pub fn is_empty(&self) -> bool {
        self.overall.is_empty()
    }
}

/// Years at which a trendline is evaluated (also the chart's x-domain).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendBounds {
    pub from_year: i32,
    pub to_year: i32,
}

impl Default for TrendBounds {
    fn default() -> Self {
        Self {
            from_year: DEFAULT_FROM_YEAR,
            to_year: DEFAULT_TO_YEAR,
        }
    }
}

/// Two-point rendering of a least-squares fit over a yearly series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub points: [YearlyPoint; 2],
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn start(&self) -> YearlyPoint {
        self.points[0]
    }

    pub fn end(&self) -> YearlyPoint {
        self.points[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_event_date_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2016, 1, 3).unwrap();
        assert_eq!(parse_event_date("2016-01-03"), Some(expected));
        assert_eq!(parse_event_date("1/3/2016"), Some(expected));
        assert_eq!(parse_event_date("1/3/16"), Some(expected));
        assert_eq!(parse_event_date("03-Jan-16"), Some(expected));
        assert_eq!(parse_event_date("Jan 3, 2016"), Some(expected));
        assert_eq!(parse_event_date("2016-01-03T10:15:00"), Some(expected));
        assert_eq!(
            parse_event_date("2009"),
            NaiveDate::from_ymd_opt(2009, 1, 1)
        );
    }

    #[test]
    fn parse_event_date_rejects_garbage() {
        assert_eq!(parse_event_date(""), None);
        assert_eq!(parse_event_date("unknown"), None);
        assert_eq!(parse_event_date("2016-13-40"), None);
    }

    #[test]
    fn coerce_fatalities_follows_numeric_coercion() {
        assert_eq!(coerce_fatalities(""), Some(0.0));
        assert_eq!(coerce_fatalities(" 3 "), Some(3.0));
        assert_eq!(coerce_fatalities("2.5"), Some(2.5));
        assert_eq!(coerce_fatalities("N/A"), None);
    }

    #[test]
    fn classify_reports_date_before_value() {
        let r = IncidentRecord::from_raw("not a date", "Boeing", "N/A");
        assert_eq!(r.classify(), Err(RecordIssue::UnparseableDate));

        let r = IncidentRecord::from_raw("2001-05-01", "Boeing", "N/A");
        assert_eq!(r.classify(), Err(RecordIssue::NonNumericFatalityValue));

        let r = IncidentRecord::from_raw("2001-05-01", "Boeing", "inf");
        assert_eq!(r.classify(), Err(RecordIssue::NonNumericFatalityValue));

        let r = IncidentRecord::from_raw("2001-05-01", "Boeing", "4");
        assert_eq!(r.classify(), Ok((2001, 4.0)));
    }

    #[test]
    fn filter_labels() {
        assert_eq!(SeriesFilter::from_label("All"), SeriesFilter::All);
        assert_eq!(
            SeriesFilter::from_label("Airbus"),
            SeriesFilter::Manufacturer("Airbus".to_string())
        );
        assert_eq!(SeriesFilter::Manufacturer(String::new()).display_name(), "(blank)");
        assert_eq!(SeriesFilter::Manufacturer(String::new()).label(), "");
    }
}
