//! Command-line parsing for the `fatal` binary.
//!
//! Argument parsing and command dispatch stay separate from aggregation and
//! trend code; `app` turns these structs into a [`crate::domain::RunConfig`].

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ALL_LABEL, DEFAULT_FROM_YEAR, DEFAULT_TO_YEAR};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "fatal",
    version,
    about = "Aviation incident fatalities per year, by manufacturer, with a linear trend"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print dataset stats, the selected series, trend diagnostics and a plot.
    Summary(ChartArgs),
    /// List the selectable series labels (`All` first).
    Makes(ChartArgs),
    /// Render an ASCII chart of one series, or of a saved chart JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// Uses the same pipeline as `fatal summary`; the manufacturer and trend
    /// toggle can then be changed live.
    Tui(ChartArgs),
}

/// Options shared by every command that loads incident data.
#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    /// Incident CSV (needs `Event_Date`, `Make`, `Total_Fatal_Injuries` columns).
    #[arg(short = 'f', long = "csv", value_name = "CSV", env = "FATAL_CSV")]
    pub csv: Option<PathBuf>,

    /// Use a generated demo dataset instead of a CSV (takes precedence over `--csv`).
    #[arg(long)]
    pub demo: bool,

    /// Random seed for the demo dataset.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of demo incidents to generate.
    #[arg(long, default_value_t = 1500)]
    pub demo_count: usize,

    /// Series to show: a manufacturer name, or `All` for the combined series.
    #[arg(short = 'm', long = "make", default_value = ALL_LABEL)]
    pub make: String,

    /// Overlay the least-squares trendline.
    #[arg(long)]
    pub trend: bool,

    /// First year of the trend/display range.
    #[arg(long, default_value_t = DEFAULT_FROM_YEAR)]
    pub from_year: i32,

    /// Last year of the trend/display range.
    #[arg(long, default_value_t = DEFAULT_TO_YEAR)]
    pub to_year: i32,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Write the selected series (and trend endpoints) to CSV.
    #[arg(long, value_name = "PATH")]
    pub export_csv: Option<PathBuf>,

    /// Write the selected chart to JSON (replayable with `fatal plot --chart`).
    #[arg(long, value_name = "PATH")]
    pub export_json: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Append logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Options for `fatal plot`.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Chart JSON produced by `--export-json`. When given, no data is loaded.
    #[arg(long, value_name = "JSON")]
    pub chart: Option<PathBuf>,

    #[command(flatten)]
    pub chart_args: ChartArgs,
}
