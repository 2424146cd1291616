//! Read/write chart JSON files.
//!
//! Chart JSON is the "portable" representation of one chart state:
//! - where the data came from
//! - the active filter and axis domains
//! - the plotted series and, when shown, the trendline
//!
//! The `plot` subcommand can redraw a chart from this file without the source CSV.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::session::{ChartFrame, FrameSnapshot};
use crate::domain::ExclusionCounts;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFile {
    pub tool: String,
    pub source: String,
    pub excluded: ExclusionCounts,
    #[serde(flatten)]
    pub frame: FrameSnapshot,
}

impl ChartFile {
    pub fn new(source: &str, excluded: ExclusionCounts, frame: &ChartFrame) -> Self {
        Self {
            tool: "fatal".to_string(),
            source: source.to_string(),
            excluded,
            frame: frame.snapshot(),
        }
    }
}

/// Write a chart JSON file.
pub fn write_chart_json(path: &Path, chart: &ChartFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create chart JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, chart)
        .map_err(|e| AppError::io(format!("Failed to write chart JSON: {e}")))?;
    Ok(())
}

/// Read a chart JSON file.
pub fn read_chart_json(path: &Path) -> Result<ChartFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open chart JSON '{}': {e}", path.display())))?;
    let chart: ChartFile =
        serde_json::from_reader(file).map_err(|e| AppError::input(format!("Invalid chart JSON: {e}")))?;
    Ok(chart)
}
