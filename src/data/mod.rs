//! Dataset sources other than a CSV file.

pub mod sample;

pub use sample::{SampleConfig, generate_incidents};
