//! ASCII plotting for terminal output.
//!
//! A fixed-size character grid, aimed at:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - yearly points: `o`
//! - series line: `-`
//! - trendline: `.` (never overwrites the series)
//!
//! Points outside the year domain are not drawn.

use crate::app::session::ChartFrame;
use crate::domain::{TrendLine, YearlyPoint};
use crate::io::chart_json::ChartFile;

/// Render a plot for an in-memory chart frame.
pub fn render_ascii_plot(frame: &ChartFrame, width: usize, height: usize) -> String {
    render_plot(
        frame.filter.display_name(),
        &frame.series,
        frame.trend.line(),
        frame.x_domain,
        frame.y_domain,
        width,
        height,
    )
}

/// Render a plot from a saved chart JSON file.
pub fn render_ascii_plot_from_chart_file(chart: &ChartFile, width: usize, height: usize) -> String {
    let label = if chart.frame.filter.is_empty() {
        crate::domain::BLANK_LABEL
    } else {
        chart.frame.filter.as_str()
    };
    render_plot(
        label,
        &chart.frame.series,
        chart.frame.trend.as_ref(),
        chart.frame.x_domain,
        chart.frame.y_domain,
        width,
        height,
    )
}

fn render_plot(
    label: &str,
    series: &[YearlyPoint],
    trend: Option<&TrendLine>,
    x_domain: [i32; 2],
    y_domain: [f64; 2],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let x_min = f64::from(x_domain[0]);
    let x_max = if x_domain[1] > x_domain[0] {
        f64::from(x_domain[1])
    } else {
        x_min + 1.0
    };

    let visible: Vec<(f64, f64)> = series
        .iter()
        .filter(|p| p.year >= x_domain[0] && p.year <= x_domain[1])
        .map(|p| (f64::from(p.year), p.total_fatalities))
        .collect();
    let trend_pts: Vec<(f64, f64)> = trend
        .map(|t| {
            t.points
                .iter()
                .map(|p| (f64::from(p.year), p.total_fatalities))
                .collect()
        })
        .unwrap_or_default();

    let (y_min, y_max) = y_range(y_domain, &visible, &trend_pts).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let scale = Scale {
        x_min,
        x_max,
        y_min,
        y_max,
        width,
        height,
    };

    draw_polyline(&mut grid, &visible, &scale, '-');
    draw_polyline(&mut grid, &trend_pts, &scale, '.');
    for &(x, y) in &visible {
        let (col, row) = scale.map(x, y);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {label} | years=[{}, {}] | fatalities=[{y_min:.1}, {y_max:.1}]\n",
        x_domain[0], x_domain[1]
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    let left = x_domain[0].to_string();
    let right = x_domain[1].to_string();
    let gap = width.saturating_sub(left.len() + right.len()).max(1);
    out.push_str(&format!("{left}{}{right}\n", " ".repeat(gap)));

    out
}

struct Scale {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    width: usize,
    height: usize,
}

impl Scale {
    /// Map data coordinates to `(column, row)`; row 0 is the top.
    fn map(&self, x: f64, y: f64) -> (usize, usize) {
        let u = ((x - self.x_min) / (self.x_max - self.x_min)).clamp(0.0, 1.0);
        let v = ((y - self.y_min) / (self.y_max - self.y_min)).clamp(0.0, 1.0);
        let col = (u * (self.width as f64 - 1.0)).round() as usize;
        let row = (self.height as f64 - 1.0 - (v * (self.height as f64 - 1.0))).round() as usize;
        (col, row)
    }
}

fn y_range(domain: [f64; 2], series: &[(f64, f64)], trend: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = domain[0];
    let mut max_y = domain[1];
    for &(_, y) in series.iter().chain(trend) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn draw_polyline(grid: &mut [Vec<char>], points: &[(f64, f64)], scale: &Scale, ch: char) {
    let mut prev = None;
    for &(x, y) in points {
        let (col, row) = scale.map(x, y);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, ch),
            None if grid[row][col] == ' ' => grid[row][col] = ch,
            None => {}
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish). Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::session::TrendOverlay;
    use crate::domain::SeriesFilter;

    fn frame(series: Vec<YearlyPoint>, trend: TrendOverlay, y_max: f64) -> ChartFrame {
        ChartFrame {
            filter: SeriesFilter::All,
            series,
            trend,
            x_domain: [1995, 2016],
            y_domain: [0.0, y_max],
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let f = frame(
            vec![YearlyPoint::new(1995, 0.0), YearlyPoint::new(2016, 10.0)],
            TrendOverlay::Hidden,
            10.0,
        );
        let txt = render_ascii_plot(&f, 10, 5);
        let expected = concat!(
            "Plot: All | years=[1995, 2016] | fatalities=[-0.5, 10.5]\n",
            "        -o\n",
            "      --  \n",
            "    --    \n",
            "  --      \n",
            "o-        \n",
            "1995  2016\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn trend_is_drawn_with_dots() {
        let line = TrendLine {
            points: [YearlyPoint::new(1995, 0.0), YearlyPoint::new(2016, 0.0)],
            slope: 0.0,
            intercept: 0.0,
        };
        let f = frame(Vec::new(), TrendOverlay::Shown(line), 0.0);
        let txt = render_ascii_plot(&f, 10, 5);
        let rows: Vec<&str> = txt.lines().collect();
        assert_eq!(rows[5], "..........");
        assert!(rows[1..5].iter().all(|r| r.trim().is_empty()));
    }

    #[test]
    fn points_outside_domain_are_skipped() {
        let f = frame(
            vec![YearlyPoint::new(1980, 5.0), YearlyPoint::new(2000, 5.0)],
            TrendOverlay::Hidden,
            10.0,
        );
        let txt = render_ascii_plot(&f, 22, 5);
        let markers: usize = txt.lines().skip(1).map(|l| l.matches('o').count()).sum();
        assert_eq!(markers, 1);
    }
}
