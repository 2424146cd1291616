//! Shared pipeline logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load records (CSV or demo) -> aggregate -> chart session
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use tracing::{info, warn};

use crate::aggregate::aggregate;
use crate::app::session::ChartSession;
use crate::data::generate_incidents;
use crate::domain::{DataSource, IncidentRecord, RunConfig};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, RowError, load_incidents};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub source: String,
    pub rows_read: usize,
    pub row_errors: Vec<RowError>,
    pub session: ChartSession,
}

/// Execute the full pipeline and return a session positioned at the configured
/// filter and trend state.
pub fn run_pipeline(config: &RunConfig) -> Result<RunOutput, AppError> {
    let (records, ingest) = load_records(&config.source)?;
    Ok(build_run(config, records, ingest))
}

/// Build a run from already-loaded records.
pub fn build_run(config: &RunConfig, records: Vec<IncidentRecord>, ingest: IngestedMeta) -> RunOutput {
    let collection = aggregate(&records);
    info!(
        records = records.len(),
        used = collection.records_used,
        years = collection.overall.len(),
        manufacturers = collection.by_manufacturer.len(),
        "aggregated incidents"
    );
    if collection.excluded.total() > 0 {
        warn!(
            unparseable_date = collection.excluded.unparseable_date,
            non_numeric_fatalities = collection.excluded.non_numeric_fatalities,
            "excluded malformed records from all series"
        );
    }

    let mut session = ChartSession::new(collection, config.bounds);
    session.on_filter_changed(config.filter.clone());
    session.on_trend_toggle(config.trend);

    RunOutput {
        source: config.source.describe(),
        rows_read: ingest.rows_read,
        row_errors: ingest.row_errors,
        session,
    }
}

/// Ingest bookkeeping carried alongside the records.
#[derive(Debug, Clone, Default)]
pub struct IngestedMeta {
    pub rows_read: usize,
    pub row_errors: Vec<RowError>,
}

fn load_records(source: &DataSource) -> Result<(Vec<IncidentRecord>, IngestedMeta), AppError> {
    match source {
        DataSource::Csv(path) => {
            let IngestedData {
                records,
                row_errors,
                rows_read,
            } = load_incidents(path)?;
            Ok((records, IngestedMeta { rows_read, row_errors }))
        }
        DataSource::Demo(cfg) => {
            let records = generate_incidents(cfg)?;
            info!(seed = cfg.seed, count = records.len(), "generated demo incidents");
            let meta = IngestedMeta {
                rows_read: records.len(),
                row_errors: Vec::new(),
            };
            Ok((records, meta))
        }
    }
}
