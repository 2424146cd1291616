//! Trendline estimation over a yearly series.
//!
//! The fit is an ordinary least-squares line through `(year, total_fatalities)`,
//! evaluated at the two display-bound years so the renderer can draw it as a
//! single segment across the whole x-axis.

use thiserror::Error;

use crate::domain::{TrendBounds, TrendLine, YearlyPoint};
use crate::math::{FitError, fit_line};

/// Why no trendline is available for a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrendError {
    #[error("needs at least 2 years of data (have {0})")]
    TooFewPoints(usize),
    #[error("all points fall in the same year")]
    ZeroYearVariance,
    #[error("fit is not finite")]
    NonFinite,
}

impl From<FitError> for TrendError {
    fn from(value: FitError) -> Self {
        match value {
            FitError::TooFewPoints(n) => TrendError::TooFewPoints(n),
            FitError::ZeroVariance => TrendError::ZeroYearVariance,
            FitError::NonFinite => TrendError::NonFinite,
        }
    }
}

/// Fit a trendline to `series` and evaluate it at `bounds`.
pub fn estimate_trend(series: &[YearlyPoint], bounds: TrendBounds) -> Result<TrendLine, TrendError> {
    let pairs: Vec<(f64, f64)> = series
        .iter()
        .map(|p| (f64::from(p.year), p.total_fatalities))
        .collect();

    let fit = fit_line(&pairs)?;

    let at = |year: i32| YearlyPoint::new(year, fit.predict(f64::from(year)));
    let points = [at(bounds.from_year), at(bounds.to_year)];
    if points.iter().any(|p| !p.total_fatalities.is_finite()) {
        return Err(TrendError::NonFinite);
    }

    Ok(TrendLine {
        points,
        slope: fit.slope,
        intercept: fit.intercept,
    })
}
