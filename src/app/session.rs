//! Chart session: the state behind the manufacturer selector and trend toggle.
//!
//! The session owns the immutable aggregation result and two pieces of UI state
//! (active filter, trend on/off). Every callback recomputes a fresh `ChartFrame`
//! from scratch; nothing in a frame is shared with or mutated by the session.

use serde::{Deserialize, Serialize};

use crate::domain::{SeriesCollection, SeriesFilter, TrendBounds, TrendLine, YearlyPoint};
use crate::trend::{TrendError, estimate_trend};

/// Trendline state for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrendOverlay {
    /// Toggle is off.
    Hidden,
    /// Toggle is on and the fit succeeded.
    Shown(TrendLine),
    /// Toggle is on but the active series cannot be fitted.
    Unavailable(TrendError),
}

impl TrendOverlay {
    pub fn line(&self) -> Option<&TrendLine> {
        match self {
            TrendOverlay::Shown(line) => Some(line),
            _ => None,
        }
    }
}

/// Everything a renderer needs to draw one state of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub filter: SeriesFilter,
    pub series: Vec<YearlyPoint>,
    pub trend: TrendOverlay,
    /// Year axis bounds (also where the trendline is evaluated).
    pub x_domain: [i32; 2],
    /// Fatality axis bounds: `[0, max of the combined series]`, independent of the
    /// active filter so switching manufacturers keeps the scale stable.
    pub y_domain: [f64; 2],
}

/// Serializable view of a frame (used by the JSON export).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub filter: String,
    pub x_domain: [i32; 2],
    pub y_domain: [f64; 2],
    pub series: Vec<YearlyPoint>,
    pub trend: Option<TrendLine>,
    pub trend_note: Option<String>,
}

impl ChartFrame {
    pub fn snapshot(&self) -> FrameSnapshot {
        let trend_note = match self.trend {
            TrendOverlay::Unavailable(err) => Some(err.to_string()),
            _ => None,
        };
        FrameSnapshot {
            filter: self.filter.label().to_string(),
            x_domain: self.x_domain,
            y_domain: self.y_domain,
            series: self.series.clone(),
            trend: self.trend.line().copied(),
            trend_note,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartSession {
    collection: SeriesCollection,
    bounds: TrendBounds,
    filter: SeriesFilter,
    trend_enabled: bool,
}

impl ChartSession {
    pub fn new(collection: SeriesCollection, bounds: TrendBounds) -> Self {
        Self {
            collection,
            bounds,
            filter: SeriesFilter::All,
            trend_enabled: false,
        }
    }

    pub fn collection(&self) -> &SeriesCollection {
        &self.collection
    }

    pub fn bounds(&self) -> TrendBounds {
        self.bounds
    }

    pub fn filter(&self) -> &SeriesFilter {
        &self.filter
    }

    pub fn trend_enabled(&self) -> bool {
        self.trend_enabled
    }

    /// Selector entries: `All` first, then manufacturers in sorted order.
    pub fn available_labels(&self) -> Vec<SeriesFilter> {
        self.collection.available_labels()
    }

    /// Selection changed: switch the active series and redraw.
    pub fn on_filter_changed(&mut self, filter: SeriesFilter) -> ChartFrame {
        tracing::debug!(filter = %filter, "filter changed");
        self.filter = filter;
        self.frame()
    }

    /// Trend checkbox changed: show or hide the trendline and redraw.
    pub fn on_trend_toggle(&mut self, enabled: bool) -> ChartFrame {
        tracing::debug!(enabled, "trend toggled");
        self.trend_enabled = enabled;
        self.frame()
    }

    /// Recompute the frame for the current state.
    pub fn frame(&self) -> ChartFrame {
        let series = self.collection.series(&self.filter).to_vec();

        let trend = if self.trend_enabled {
            match estimate_trend(&series, self.bounds) {
                Ok(line) => TrendOverlay::Shown(line),
                Err(err) => TrendOverlay::Unavailable(err),
            }
        } else {
            TrendOverlay::Hidden
        };

        ChartFrame {
            filter: self.filter.clone(),
            series,
            trend,
            x_domain: [self.bounds.from_year, self.bounds.to_year],
            y_domain: [0.0, self.collection.max_overall().unwrap_or(0.0)],
        }
    }
}
