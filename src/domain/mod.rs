//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw incident inputs (`IncidentRecord`) and their coercion rules
//! - aggregated outputs (`YearlyPoint`, `SeriesCollection`)
//! - trend outputs (`TrendLine`, `TrendBounds`) and series selection (`SeriesFilter`)
//! - the resolved run configuration (`RunConfig`)

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
