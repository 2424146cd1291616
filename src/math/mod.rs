//! Mathematical utilities: simple linear least squares.

pub mod ols;

pub use ols::*;
