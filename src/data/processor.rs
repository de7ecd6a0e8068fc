//! Data Processor Module
//! Cleans incidents into derived records: location split plus state code.

use crate::data::loader::Incident;
use crate::data::location::{split_location, LocationError};
use crate::data::states::normalize_state;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// An incident with its location split and its state normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedRecord {
    pub city: String,
    pub state_raw: String,
    /// Canonical two-letter code, `None` when `state_raw` is not in the table.
    pub state_code: Option<&'static str>,
    pub year: i32,
    pub fatalities: u32,
}

/// Data-quality counters collected while deriving records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DerivationReport {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub malformed_locations: usize,
    /// Unrecognized state tokens and how often each appeared.
    pub unmapped_states: BTreeMap<String, usize>,
    pub records_kept: usize,
}

impl DerivationReport {
    pub fn unmapped_total(&self) -> usize {
        self.unmapped_states.values().sum()
    }
}

/// Handles cleaning and transformation of incident records.
pub struct DataProcessor;

impl DataProcessor {
    /// Derive one record per incident.
    ///
    /// Incidents whose location has no comma are dropped and counted in the
    /// report. Unrecognized state tokens keep their record with a missing
    /// state code so the aggregator can exclude them.
    pub fn derive(incidents: &[Incident]) -> (Vec<DerivedRecord>, DerivationReport) {
        let mut records = Vec::with_capacity(incidents.len());
        let mut report = DerivationReport::default();

        for incident in incidents {
            match Self::derive_one(incident) {
                Ok(record) => {
                    match record.state_code {
                        Some(_) => report.records_kept += 1,
                        None => {
                            debug!(state = %record.state_raw, "unrecognized state token");
                            *report
                                .unmapped_states
                                .entry(record.state_raw.clone())
                                .or_default() += 1;
                        }
                    }
                    records.push(record);
                }
                Err(LocationError::Malformed(location)) => {
                    debug!(%location, "dropping incident with malformed location");
                    report.malformed_locations += 1;
                }
            }
        }

        if report.malformed_locations > 0 || !report.unmapped_states.is_empty() {
            warn!(
                malformed = report.malformed_locations,
                unmapped = report.unmapped_total(),
                "incidents excluded from state totals"
            );
        }
        info!(
            derived = records.len(),
            kept = report.records_kept,
            "derived incident records"
        );
        (records, report)
    }

    /// Split and normalize a single incident.
    pub fn derive_one(incident: &Incident) -> Result<DerivedRecord, LocationError> {
        let (city, state_raw) = split_location(&incident.location)?;
        let state_code = normalize_state(&state_raw);
        Ok(DerivedRecord {
            city,
            state_raw,
            state_code,
            year: incident.year,
            fatalities: incident.fatalities,
        })
    }

    /// Build the derived table the aggregator consumes.
    ///
    /// Output columns: ["city", "state_raw", "state_code", "year", "fatalities"]
    pub fn to_frame(records: &[DerivedRecord]) -> Result<DataFrame, ProcessorError> {
        let mut cities: Vec<&str> = Vec::with_capacity(records.len());
        let mut raw_states: Vec<&str> = Vec::with_capacity(records.len());
        let mut codes: Vec<Option<&str>> = Vec::with_capacity(records.len());
        let mut years: Vec<i32> = Vec::with_capacity(records.len());
        let mut fatalities: Vec<i64> = Vec::with_capacity(records.len());

        for record in records {
            cities.push(&record.city);
            raw_states.push(&record.state_raw);
            codes.push(record.state_code);
            years.push(record.year);
            fatalities.push(i64::from(record.fatalities));
        }

        let df = DataFrame::new(vec![
            Column::new("city".into(), cities),
            Column::new("state_raw".into(), raw_states),
            Column::new("state_code".into(), codes),
            Column::new("year".into(), years),
            Column::new("fatalities".into(), fatalities),
        ])?;
        Ok(df)
    }
}
