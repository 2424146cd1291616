//! Synthetic incident dataset for `--demo` runs.
//!
//! Each generated incident picks a manufacturer (weighted by fleet share), a day in
//! the configured year range, and a Poisson fatality count whose mean decays over
//! time. A small fraction of rows are deliberately malformed so the exclusion
//! counters show something in demo output.

use chrono::NaiveDate;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Poisson;

use crate::domain::IncidentRecord;
use crate::error::AppError;

/// Manufacturers with relative incident share and mean fatalities per incident.
const MANUFACTURERS: [(&str, f64, f64); 8] = [
    ("Airbus", 0.16, 3.5),
    ("Beech", 0.08, 0.9),
    ("Boeing", 0.30, 5.0),
    ("Bombardier", 0.10, 1.4),
    ("Cessna", 0.12, 0.6),
    ("Embraer", 0.09, 1.8),
    ("McDonnell Douglas", 0.09, 4.2),
    ("Piper", 0.06, 0.5),
];

/// Yearly decay of the mean fatality count (safety improves over time).
const YEARLY_DECAY: f64 = 0.04;

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub count: usize,
    pub seed: u64,
    pub from_year: i32,
    pub to_year: i32,
    /// Fraction of rows generated with a bad date or a non-numeric fatality value.
    pub malformed_fraction: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            count: 1_500,
            seed: 42,
            from_year: crate::domain::DEFAULT_FROM_YEAR,
            to_year: crate::domain::DEFAULT_TO_YEAR,
            malformed_fraction: 0.01,
        }
    }
}

/// Generate a deterministic synthetic incident list.
pub fn generate_incidents(config: &SampleConfig) -> Result<Vec<IncidentRecord>, AppError> {
    if config.count == 0 {
        return Err(AppError::input("Demo incident count must be > 0."));
    }
    if config.to_year < config.from_year {
        return Err(AppError::input("Demo year range is empty."));
    }
    if !(0.0..1.0).contains(&config.malformed_fraction) {
        return Err(AppError::input("Malformed fraction must be in [0, 1)."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let total_share: f64 = MANUFACTURERS.iter().map(|&(_, share, _)| share).sum();

    let mut out = Vec::with_capacity(config.count);
    for _ in 0..config.count {
        let (make, mean) = pick_manufacturer(&mut rng, total_share);
        let year = rng.gen_range(config.from_year..=config.to_year);
        let event_date = random_day(&mut rng, year)?;

        let decay = (-YEARLY_DECAY * f64::from(year - config.from_year)).exp();
        let lambda = (mean * decay).max(1e-3);
        let poisson = Poisson::new(lambda)
            .map_err(|e| AppError::input(format!("Fatality distribution error: {e}")))?;
        let fatalities: f64 = poisson.sample(&mut rng);

        let mut record = IncidentRecord::new(event_date, make, fatalities);
        if rng.gen_bool(config.malformed_fraction) {
            if rng.gen_bool(0.5) {
                record.event_date = None;
            } else {
                record.fatalities = None;
            }
        }
        out.push(record);
    }

    Ok(out)
}

fn pick_manufacturer(rng: &mut StdRng, total_share: f64) -> (&'static str, f64) {
    let mut u = rng.gen_range(0.0..total_share);
    for &(name, share, mean) in &MANUFACTURERS {
        if u < share {
            return (name, mean);
        }
        u -= share;
    }
    let (name, _, mean) = MANUFACTURERS[MANUFACTURERS.len() - 1];
    (name, mean)
}

fn random_day(rng: &mut StdRng, year: i32) -> Result<NaiveDate, AppError> {
    let ordinal = rng.gen_range(1..=365);
    NaiveDate::from_yo_opt(year, ordinal)
        .ok_or_else(|| AppError::input(format!("Invalid demo year: {year}")))
}
