//! A full run's configuration as understood by the pipeline.
//!
//! This is derived from CLI flags (plus `.env` / environment defaults).

use std::path::PathBuf;

use crate::data::SampleConfig;
use crate::domain::{SeriesFilter, TrendBounds};
use crate::error::AppError;

/// Where incident records come from.
#[derive(Debug, Clone)]
pub enum DataSource {
    Csv(PathBuf),
    Demo(SampleConfig),
}

impl DataSource {
    pub fn describe(&self) -> String {
        match self {
            DataSource::Csv(path) => path.display().to_string(),
            DataSource::Demo(cfg) => format!("demo (seed={}, n={})", cfg.seed, cfg.count),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: DataSource,
    pub filter: SeriesFilter,
    pub trend: bool,
    pub bounds: TrendBounds,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

impl RunConfig {
    /// Check cross-field constraints that clap cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.bounds.from_year >= self.bounds.to_year {
            return Err(AppError::input(format!(
                "--from-year ({}) must be before --to-year ({}).",
                self.bounds.from_year, self.bounds.to_year
            )));
        }
        if self.plot && (self.plot_width < 10 || self.plot_height < 5) {
            return Err(AppError::input("Plot must be at least 10 columns by 5 rows."));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RunConfig {
        RunConfig {
            source: DataSource::Demo(SampleConfig::default()),
            filter: SeriesFilter::All,
            trend: false,
            bounds: TrendBounds::default(),
            plot: true,
            plot_width: 80,
            plot_height: 20,
            export_csv: None,
            export_json: None,
        }
    }

    #[test]
    fn default_bounds_validate() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let mut c = config();
        c.bounds = TrendBounds {
            from_year: 2016,
            to_year: 1995,
        };
        assert_eq!(c.validate().unwrap_err().exit_code(), 2);
    }

    #[test]
    fn tiny_plot_is_rejected_only_when_plotting() {
        let mut c = config();
        c.plot_width = 3;
        assert!(c.validate().is_err());
        c.plot = false;
        assert!(c.validate().is_ok());
    }
}
