//! Data module - CSV loading, cleaning and aggregation

mod aggregate;
mod loader;
mod location;
mod processor;
mod states;

pub use aggregate::{AggregateError, Aggregator, FatalityRow, FatalityTable};
pub use loader::{Incident, IncidentLoader, LoaderError};
pub use processor::{DataProcessor, DerivationReport, ProcessorError};
pub use states::{canonical_codes, state_name};

use std::path::Path;
use thiserror::Error;
use tracing::info_span;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Process(#[from] ProcessorError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

/// Result of one full load: the aggregated table plus data-quality counters.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub table: FatalityTable,
    pub report: DerivationReport,
}

/// Loader → Splitter/Normalizer → Aggregator, recomputed from scratch.
pub fn load_and_aggregate(path: &Path) -> Result<LoadedData, PipelineError> {
    let _span = info_span!("pipeline", path = %path.display()).entered();

    let mut loader = IncidentLoader::new();
    loader.load_csv(path)?;
    let batch = loader.incidents()?;

    let (records, mut report) = DataProcessor::derive(&batch.incidents);
    report.rows_read = batch.rows_read;
    report.rows_skipped = batch.rows_skipped;

    let derived = DataProcessor::to_frame(&records)?;
    let table = Aggregator::aggregate(&derived)?;
    Ok(LoadedData { table, report })
}
