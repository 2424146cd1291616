//! `fatality-trends` library crate.
//!
//! Aviation incident records are grouped into yearly fatality totals, both
//! overall and per manufacturer, with an optional least-squares trendline.
//!
//! The binary (`fatal`) is a thin wrapper around this library so the core
//! logic is testable without spawning processes.

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod telemetry;
pub mod trend;
pub mod tui;
