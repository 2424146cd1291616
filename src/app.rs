//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - resolves the data source (CSV, picker, or demo)
//! - runs the aggregation pipeline and prints, plots, or launches the TUI
//! - writes optional exports

use std::io::IsTerminal;

use clap::Parser;

use crate::cli::{ChartArgs, Command, PlotArgs};
use crate::data::SampleConfig;
use crate::domain::{DataSource, RunConfig, SeriesFilter, TrendBounds};
use crate::error::AppError;

pub mod pipeline;
pub mod session;

/// Entry point for the `fatal` binary.
pub fn run() -> Result<(), AppError> {
    // A missing `.env` is the normal case.
    dotenvy::dotenv().ok();

    // `fatal` and `fatal --demo` behave like `fatal tui ...`; clap needs the
    // subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Summary(args) => handle_summary(&args),
        Command::Makes(args) => handle_makes(&args),
        Command::Plot(args) => handle_plot(&args),
        Command::Tui(args) => handle_tui(&args),
    }
}

fn handle_summary(args: &ChartArgs) -> Result<(), AppError> {
    crate::telemetry::init(args.verbose, args.log_file.as_deref(), false)?;
    let config = run_config_from_args(args)?;
    let run = pipeline::run_pipeline(&config)?;
    let frame = run.session.frame();

    println!("{}", crate::report::format_run_summary(&run, &frame));
    if config.plot {
        println!(
            "{}",
            crate::plot::render_ascii_plot(&frame, config.plot_width, config.plot_height)
        );
    }

    write_exports(&config, &run, &frame)
}

fn handle_makes(args: &ChartArgs) -> Result<(), AppError> {
    crate::telemetry::init(args.verbose, args.log_file.as_deref(), false)?;
    let config = run_config_from_args(args)?;
    let run = pipeline::run_pipeline(&config)?;

    print!("{}", crate::report::format_labels(&run.session.available_labels()));
    Ok(())
}

fn handle_plot(args: &PlotArgs) -> Result<(), AppError> {
    let chart_args = &args.chart_args;
    crate::telemetry::init(chart_args.verbose, chart_args.log_file.as_deref(), false)?;

    if let Some(path) = &args.chart {
        let chart = crate::io::chart_json::read_chart_json(path)?;
        println!(
            "{}",
            crate::plot::render_ascii_plot_from_chart_file(&chart, chart_args.width, chart_args.height)
        );
        return Ok(());
    }

    let mut config = run_config_from_args(chart_args)?;
    config.plot = true;
    config.validate()?;
    let run = pipeline::run_pipeline(&config)?;
    let frame = run.session.frame();

    println!(
        "{}",
        crate::plot::render_ascii_plot(&frame, config.plot_width, config.plot_height)
    );
    write_exports(&config, &run, &frame)
}

fn handle_tui(args: &ChartArgs) -> Result<(), AppError> {
    crate::telemetry::init(args.verbose, args.log_file.as_deref(), true)?;
    let config = run_config_from_args(args)?;
    let run = pipeline::run_pipeline(&config)?;
    if run.session.collection().is_empty() {
        return Err(AppError::no_data(format!(
            "No usable incidents in {} (nothing to chart).",
            run.source
        )));
    }

    let run = crate::tui::run(run)?;

    // Exports reflect the selection the user left the TUI on.
    let frame = run.session.frame();
    write_exports(&config, &run, &frame)
}

fn write_exports(
    config: &RunConfig,
    run: &pipeline::RunOutput,
    frame: &session::ChartFrame,
) -> Result<(), AppError> {
    if let Some(path) = &config.export_csv {
        crate::io::export::write_series_csv(path, frame)?;
    }
    if let Some(path) = &config.export_json {
        let chart = crate::io::chart_json::ChartFile::new(
            &run.source,
            run.session.collection().excluded,
            frame,
        );
        crate::io::chart_json::write_chart_json(path, &chart)?;
    }
    Ok(())
}

/// Resolve flags into a validated [`RunConfig`].
///
/// Source precedence: `--demo`, then `--csv`/`FATAL_CSV`, then the interactive
/// picker when stdin is a terminal.
pub fn run_config_from_args(args: &ChartArgs) -> Result<RunConfig, AppError> {
    let source = if args.demo {
        DataSource::Demo(SampleConfig {
            count: args.demo_count,
            seed: args.seed,
            ..SampleConfig::default()
        })
    } else if let Some(path) = &args.csv {
        DataSource::Csv(crate::cli::picker::validate_csv_path(path)?)
    } else if std::io::stdin().is_terminal() {
        DataSource::Csv(crate::cli::picker::prompt_for_csv_path()?)
    } else {
        return Err(AppError::input(
            "No input data. Pass `--csv <file.csv>` (or set FATAL_CSV), or use `--demo`.",
        ));
    };

    let config = RunConfig {
        source,
        filter: SeriesFilter::from_label(&args.make),
        trend: args.trend,
        bounds: TrendBounds {
            from_year: args.from_year,
            to_year: args.to_year,
        },
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_csv: args.export_csv.clone(),
        export_json: args.export_json.clone(),
    };
    config.validate()?;
    Ok(config)
}

/// Rewrite argv so `fatal` defaults to `fatal tui`.
///
/// Rules:
/// - `fatal`                     -> `fatal tui`
/// - `fatal --demo ...`          -> `fatal tui --demo ...`
/// - `fatal --help/--version/-h` -> unchanged (top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    if matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help") {
        return argv;
    }
    if matches!(arg1.as_str(), "summary" | "makes" | "plot" | "tui") {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_launches_tui() {
        assert_eq!(rewrite_args(argv(&["fatal"])), argv(&["fatal", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["fatal", "--demo", "-m", "Boeing"])),
            argv(&["fatal", "tui", "--demo", "-m", "Boeing"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [
            argv(&["fatal", "summary", "--demo"]),
            argv(&["fatal", "--help"]),
            argv(&["fatal", "-V"]),
        ] {
            assert_eq!(rewrite_args(args.clone()), args);
        }
    }

    fn demo_args(extra: &[&str]) -> ChartArgs {
        let mut all = vec!["fatal", "summary", "--demo"];
        all.extend_from_slice(extra);
        match crate::cli::Cli::try_parse_from(all).unwrap().command {
            Command::Summary(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn demo_flags_build_config() {
        let config =
            run_config_from_args(&demo_args(&["--seed", "7", "--demo-count", "50", "-m", "Cessna"]))
                .unwrap();
        match &config.source {
            DataSource::Demo(cfg) => {
                assert_eq!(cfg.seed, 7);
                assert_eq!(cfg.count, 50);
            }
            other => panic!("unexpected source: {other:?}"),
        }
        assert_eq!(config.filter, SeriesFilter::Manufacturer("Cessna".into()));
        assert!(config.plot);
    }

    #[test]
    fn all_label_maps_to_combined_series() {
        let config = run_config_from_args(&demo_args(&[])).unwrap();
        assert_eq!(config.filter, SeriesFilter::All);
    }

    #[test]
    fn inverted_years_fail_with_input_code() {
        let err = run_config_from_args(&demo_args(&["--from-year", "2010", "--to-year", "2000"]))
            .unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }
}
