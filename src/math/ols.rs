//! Ordinary least squares for a single regressor.
//!
//! We fit
//!
//! ```text
//! y = slope * x + intercept
//! ```
//!
//! using the centered closed form:
//!
//! ```text
//! slope     = Σ (x_i - x̄)(y_i - ȳ) / Σ (x_i - x̄)²
//! intercept = ȳ - slope * x̄
//! ```
//!
//! Series here are tiny (one point per year), so the closed form is both exact
//! enough and cheaper than a general solver. The denominator is checked for an
//! exact zero rather than a tolerance: with integer years it is either zero or at
//! least `2 / n`.

use nalgebra::DVector;
use thiserror::Error;

/// Fitted line parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Why a line could not be fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FitError {
    #[error("need at least 2 points to fit a line (got {0})")]
    TooFewPoints(usize),
    #[error("all x values are identical; slope is undefined")]
    ZeroVariance,
    #[error("fit produced a non-finite coefficient")]
    NonFinite,
}

/// Fit `y = slope * x + intercept` over `(x, y)` pairs by ordinary least squares.
pub fn fit_line(points: &[(f64, f64)]) -> Result<LinearFit, FitError> {
    if points.len() < 2 {
        return Err(FitError::TooFewPoints(points.len()));
    }

    let x = DVector::from_iterator(points.len(), points.iter().map(|&(x, _)| x));
    let y = DVector::from_iterator(points.len(), points.iter().map(|&(_, y)| y));

    let mean_x = x.mean();
    let mean_y = y.mean();

    let dx = x.add_scalar(-mean_x);
    let dy = y.add_scalar(-mean_y);

    let sxx = dx.dot(&dx);
    if sxx == 0.0 {
        return Err(FitError::ZeroVariance);
    }
    let sxy = dx.dot(&dy);

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    if !(slope.is_finite() && intercept.is_finite()) {
        return Err(FitError::NonFinite);
    }

    Ok(LinearFit { slope, intercept })
}
