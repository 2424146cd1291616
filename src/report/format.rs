//! Text formatting for run summaries, series tables, and point tooltips.

use crate::app::pipeline::RunOutput;
use crate::app::session::{ChartFrame, TrendOverlay};
use crate::domain::{SeriesFilter, YearlyPoint};

/// Format a fatality total: whole numbers print without decimals.
pub fn fmt_fatalities(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

/// Hover text for a chart point.
pub fn format_point_tooltip(point: &YearlyPoint) -> String {
    format!(
        "Year: {}, Fatalities: {}",
        point.year,
        fmt_fatalities(point.total_fatalities)
    )
}

/// Format the full run summary (dataset stats + active selection + trend).
pub fn format_run_summary(run: &RunOutput, frame: &ChartFrame) -> String {
    let collection = run.session.collection();
    let mut out = String::new();

    out.push_str("=== fatal - aviation fatalities per year ===\n");
    out.push_str(&format!("Source: {}\n", run.source));
    out.push_str(&format!(
        "Rows: read={} | used={} | unreadable={}\n",
        run.rows_read,
        collection.records_used,
        run.row_errors.len()
    ));
    out.push_str(&format!(
        "Excluded: unparseable date={} | non-numeric fatalities={}\n",
        collection.excluded.unparseable_date, collection.excluded.non_numeric_fatalities
    ));
    if let (Some(first), Some(last)) = (collection.overall.first(), collection.overall.last()) {
        out.push_str(&format!(
            "Years: {}..{} ({} with data) | manufacturers: {}\n",
            first.year,
            last.year,
            collection.overall.len(),
            collection.by_manufacturer.len()
        ));
    } else {
        out.push_str("Years: none\n");
    }
    for e in run.row_errors.iter().take(5) {
        out.push_str(&format!("  line {}: {}\n", e.line, e.message));
    }

    out.push_str(&format!("\nSeries: {}\n", frame.filter));
    out.push_str(&format_series_table(&frame.series));
    out.push('\n');
    out.push_str(&format_trend(&frame.trend));
    out.push('\n');

    out
}

/// Format a yearly series as a two-column table.
pub fn format_series_table(series: &[YearlyPoint]) -> String {
    if series.is_empty() {
        return "(no data)\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("{:>6} {:>12}\n", "year", "fatalities"));
    out.push_str(&format!("{:->6} {:->12}\n", "", ""));
    for p in series {
        out.push_str(&format!("{:>6} {:>12}\n", p.year, fmt_fatalities(p.total_fatalities)));
    }
    let total: f64 = series.iter().map(|p| p.total_fatalities).sum();
    out.push_str(&format!("{:>6} {:>12}\n", "total", fmt_fatalities(total)));
    out
}

/// Describe the trend overlay in one or two lines.
pub fn format_trend(trend: &TrendOverlay) -> String {
    match trend {
        TrendOverlay::Hidden => "Trend: off\n".to_string(),
        TrendOverlay::Unavailable(err) => format!("Trend: unavailable ({err})\n"),
        TrendOverlay::Shown(line) => {
            let (a, b) = (line.start(), line.end());
            format!(
                "Trend: slope={:+.3}/yr intercept={:.3}\n       {} -> {:.2} | {} -> {:.2}\n",
                line.slope, line.intercept, a.year, a.total_fatalities, b.year, b.total_fatalities
            )
        }
    }
}

/// One label per line, `All` first.
pub fn format_labels(labels: &[SeriesFilter]) -> String {
    let mut out = String::new();
    for label in labels {
        out.push_str(label.display_name());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TrendLine, YearlyPoint};
    use crate::trend::TrendError;

    #[test]
    fn tooltip_prints_whole_numbers_plainly() {
        assert_eq!(
            format_point_tooltip(&YearlyPoint::new(2001, 20.0)),
            "Year: 2001, Fatalities: 20"
        );
        assert_eq!(
            format_point_tooltip(&YearlyPoint::new(2001, 2.5)),
            "Year: 2001, Fatalities: 2.50"
        );
    }

    #[test]
    fn series_table_snapshot() {
        let txt = format_series_table(&[YearlyPoint::new(2000, 6.0), YearlyPoint::new(2001, 15.0)]);
        let expected = concat!(
            "  year   fatalities\n",
            "------ ------------\n",
            "  2000            6\n",
            "  2001           15\n",
            " total           21\n",
        );
        assert_eq!(txt, expected);
        assert_eq!(format_series_table(&[]), "(no data)\n");
    }

    #[test]
    fn trend_lines() {
        assert_eq!(format_trend(&TrendOverlay::Hidden), "Trend: off\n");
        assert_eq!(
            format_trend(&TrendOverlay::Unavailable(TrendError::TooFewPoints(1))),
            "Trend: unavailable (needs at least 2 years of data (have 1))\n"
        );

        let line = TrendLine {
            points: [YearlyPoint::new(1995, -40.0), YearlyPoint::new(2016, 170.0)],
            slope: 10.0,
            intercept: -19_990.0,
        };
        let txt = format_trend(&TrendOverlay::Shown(line));
        assert!(txt.starts_with("Trend: slope=+10.000/yr intercept=-19990.000\n"));
        assert!(txt.contains("1995 -> -40.00 | 2016 -> 170.00"));
    }

    #[test]
    fn labels_show_blank_manufacturer() {
        let labels = [SeriesFilter::All, SeriesFilter::Manufacturer(String::new())];
        assert_eq!(format_labels(&labels), "All\n(blank)\n");
    }
}
