//! Input/output helpers.
//!
//! - CSV ingest (`ingest`)
//! - series CSV export (`export`)
//! - chart JSON read/write (`chart_json`)

pub mod chart_json;
pub mod export;
pub mod ingest;

pub use chart_json::*;
pub use export::*;
pub use ingest::*;
