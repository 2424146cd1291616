//! Terminal plotting without the TUI.

pub mod ascii;

pub use ascii::*;
