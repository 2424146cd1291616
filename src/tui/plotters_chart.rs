//! Plotters-powered fatality chart widget for Ratatui.
//!
//! Plotters output is rendered into the Ratatui buffer via
//! `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

const STEELBLUE: RGBColor = RGBColor(70, 130, 180);
const DIM_GRAY: RGBColor = RGBColor(105, 105, 105);
const CURSOR: RGBColor = RGBColor(255, 215, 0);

/// Render-only chart description. All series and bounds are computed by the
/// caller; `render()` only draws.
pub struct FatalityChart<'a> {
    /// Yearly totals of the active series, sorted by year.
    pub series: &'a [(f64, f64)],
    /// Trendline endpoints, when shown.
    pub trend: Option<[(f64, f64); 2]>,
    /// Focused point (highlighted).
    pub cursor: Option<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl Widget for FatalityChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.0}"))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            chart.draw_series(LineSeries::new(self.series.iter().copied(), &STEELBLUE))?;

            // Circle radii come out wrong through the ratatui backend; pixels
            // render as clean dots.
            chart.draw_series(self.series.iter().map(|&(x, y)| Pixel::new((x, y), STEELBLUE)))?;

            if let Some(trend) = self.trend {
                chart.draw_series(DashedLineSeries::new(
                    trend,
                    4,
                    3,
                    ShapeStyle::from(DIM_GRAY).stroke_width(1),
                ))?;
            }

            if let Some(point) = self.cursor {
                chart.draw_series(std::iter::once(Pixel::new(point, CURSOR)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawn_cells(buf: &Buffer) -> usize {
        buf.content().iter().filter(|c| c.symbol() != " ").count()
    }

    #[test]
    fn renders_series_with_dashed_trend() {
        let series = [(2000.0, 10.0), (2001.0, 20.0), (2002.0, 30.0)];
        let chart = FatalityChart {
            series: &series,
            trend: Some([(1995.0, -40.0), (2016.0, 170.0)]),
            cursor: Some((2002.0, 30.0)),
            x_bounds: [1995.0, 2016.0],
            y_bounds: [-50.0, 180.0],
        };

        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);
        assert!(drawn_cells(&buf) > 0);
    }

    #[test]
    fn tiny_area_shows_hint() {
        let chart = FatalityChart {
            series: &[],
            trend: None,
            cursor: None,
            x_bounds: [1995.0, 2016.0],
            y_bounds: [0.0, 1.0],
        };

        let area = Rect::new(0, 0, 60, 4);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);
        let first_row: String = (0..area.width).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert!(first_row.starts_with("Chart area too small"));
    }
}
