//! Tracing subscriber setup.
//!
//! `RUST_LOG` always wins. Without it the level comes from `-v` repetitions.
//! The TUI owns the terminal, so in interactive mode logs go to `--log-file` or
//! nowhere.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Map `-v` repetitions to a default filter directive.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init(verbosity: u8, log_file: Option<&Path>, interactive: bool) -> Result<bool, AppError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact();

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AppError::io(format!("Failed to open log file '{}': {e}", path.display())))?;
        return Ok(builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
            .is_ok());
    }

    if interactive {
        return Ok(builder.with_writer(std::io::sink).try_init().is_ok());
    }

    Ok(builder.with_writer(std::io::stderr).try_init().is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(1), "info");
        assert_eq!(default_directive(2), "debug");
        assert_eq!(default_directive(9), "trace");
    }
}
