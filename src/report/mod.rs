//! Reporting utilities: formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the aggregation/trend code stays clean and testable
//! - output changes are localized (important for snapshot tests)

pub mod format;

pub use format::*;
