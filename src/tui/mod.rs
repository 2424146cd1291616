//! Ratatui-based terminal UI.
//!
//! Left panel: series selector (`All` first, then manufacturers). Right: the
//! Plotters chart of the active series with an optional dashed trendline.
//! Every selection or toggle goes through the [`ChartSession`] callbacks.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::pipeline::RunOutput;
use crate::app::session::{ChartFrame, TrendOverlay};
use crate::domain::SeriesFilter;
use crate::error::AppError;
use crate::report::{fmt_fatalities, format_point_tooltip};

mod plotters_chart;

use plotters_chart::FatalityChart;

/// Start the TUI on an already-loaded run. Returns the run with the session left
/// at the user's final selection.
pub fn run(run: RunOutput) -> Result<RunOutput, AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::io(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(run);
    app.event_loop(&mut terminal)?;
    Ok(app.run)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::io(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::io(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    run: RunOutput,
    labels: Vec<SeriesFilter>,
    selected: usize,
    frame: ChartFrame,
    /// Index into `frame.series` of the focused point.
    cursor: Option<usize>,
    status: String,
}

impl App {
    fn new(mut run: RunOutput) -> Self {
        let labels = run.session.available_labels();
        // An unknown `--make` falls back to `All` so the list and chart agree.
        let selected = match labels.iter().position(|l| l == run.session.filter()) {
            Some(i) => i,
            None => {
                run.session.on_filter_changed(SeriesFilter::All);
                0
            }
        };
        let frame = run.session.frame();
        let mut app = Self {
            run,
            labels,
            selected,
            frame,
            cursor: None,
            status: String::new(),
        };
        app.frame_changed();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::io(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::io(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::io(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply one key press. Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up if self.selected > 0 => self.select(self.selected - 1),
            KeyCode::Down if self.selected + 1 < self.labels.len() => self.select(self.selected + 1),
            KeyCode::Char('t') => {
                let enabled = !self.run.session.trend_enabled();
                self.frame = self.run.session.on_trend_toggle(enabled);
                self.frame_changed();
            }
            KeyCode::Left => {
                if let Some(i) = self.cursor {
                    self.cursor = Some(i.saturating_sub(1));
                }
            }
            KeyCode::Right => {
                if let Some(i) = self.cursor {
                    self.cursor = Some((i + 1).min(self.frame.series.len().saturating_sub(1)));
                }
            }
            _ => {}
        }
        false
    }

    fn select(&mut self, index: usize) {
        self.selected = index;
        let filter = self.labels[index].clone();
        self.frame = self.run.session.on_filter_changed(filter);
        self.frame_changed();
    }

    /// Reset the cursor and status line after the frame was recomputed.
    fn frame_changed(&mut self) {
        self.cursor = self.frame.series.len().checked_sub(1);
        self.status = trend_status(&self.frame.trend);
    }

    fn tooltip(&self) -> Option<String> {
        self.cursor
            .and_then(|i| self.frame.series.get(i))
            .map(format_point_tooltip)
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(26), Constraint::Min(0)])
            .split(chunks[1]);
        self.draw_selector(frame, body[0]);
        self.draw_chart(frame, body[1]);

        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let collection = self.run.session.collection();
        let lines = vec![
            Line::from(vec![
                Span::styled("fatal", Style::default().fg(Color::Cyan)),
                Span::raw(format!(
                    " | {} | used {} of {} rows | excluded {}",
                    self.run.source,
                    collection.records_used,
                    self.run.rows_read,
                    collection.excluded.total()
                )),
            ]),
            Line::from(Span::styled(
                self.tooltip().unwrap_or_else(|| "No data for this series".to_string()),
                Style::default().fg(Color::Yellow),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_selector(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .labels
            .iter()
            .map(|l| ListItem::new(l.display_name().to_string()))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Manufacturer").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = format!("Fatalities per year: {}", self.frame.filter);
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let (x_bounds, y_bounds) = chart_bounds(&self.frame);
        let series = series_points(&self.frame);
        let trend = self.frame.trend.line().map(|line| {
            [
                (f64::from(line.start().year), line.start().total_fatalities),
                (f64::from(line.end().year), line.end().total_fatalities),
            ]
        });
        let cursor = self
            .cursor
            .and_then(|i| self.frame.series.get(i))
            .map(|p| (f64::from(p.year), p.total_fatalities));

        let (chart_rect, insets) = chart_layout(inner);
        let widget = FatalityChart {
            series: &series,
            trend,
            cursor,
            x_bounds,
            y_bounds,
        };
        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ series  ←/→ point  t trend  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn trend_status(trend: &TrendOverlay) -> String {
    match trend {
        TrendOverlay::Hidden => "trend off".to_string(),
        TrendOverlay::Unavailable(err) => format!("trend unavailable: {err}"),
        TrendOverlay::Shown(line) => format!(
            "trend {:+.2}/yr ({} -> {})",
            line.slope,
            fmt_fatalities(line.start().total_fatalities.round()),
            fmt_fatalities(line.end().total_fatalities.round()),
        ),
    }
}

/// Points of the active series that fall inside the year domain.
fn series_points(frame: &ChartFrame) -> Vec<(f64, f64)> {
    frame
        .series
        .iter()
        .filter(|p| p.year >= frame.x_domain[0] && p.year <= frame.x_domain[1])
        .map(|p| (f64::from(p.year), p.total_fatalities))
        .collect()
}

/// Chart bounds: the year domain, and the fatality domain widened to include the
/// trend endpoints (which can go negative), padded by 5%.
fn chart_bounds(frame: &ChartFrame) -> ([f64; 2], [f64; 2]) {
    let x_bounds = [f64::from(frame.x_domain[0]), f64::from(frame.x_domain[1])];

    let [mut y_min, mut y_max] = frame.y_domain;
    if let Some(line) = frame.trend.line() {
        for p in line.points {
            y_min = y_min.min(p.total_fatalities);
            y_max = y_max.max(p.total_fatalities);
        }
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min = 0.0;
        y_max = 1.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    (x_bounds, [y_min - pad, y_max + pad])
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 7,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let year = (x_bounds[0] + u * (x_bounds[1] - x_bounds[0])).round();
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = format!("{year:.0}");
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label.clone()).style(style),
            Rect {
                x: x.saturating_sub((label.len() / 2) as u16),
                y,
                width: label.len() as u16,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let value = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{value:.0}");
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label.clone()).style(style),
            Rect {
                x: start,
                y,
                width: label.len() as u16,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("year")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("fatal")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
