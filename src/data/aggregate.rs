//! Aggregator Module
//! Groups derived records by (year, state) and sums fatalities.

use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unexpected null in aggregated column '{0}'")]
    UnexpectedNull(&'static str),
}

/// One aggregated row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FatalityRow {
    pub year: i32,
    pub state_code: String,
    pub fatalities: i64,
}

/// The aggregated `(year, state_code, fatalities)` table, sorted by year then state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FatalityTable {
    rows: Vec<FatalityRow>,
}

/// Performs the group-and-sum step.
pub struct Aggregator;

impl Aggregator {
    /// Aggregate a derived frame (see `DataProcessor::to_frame`).
    ///
    /// Records with a null `state_code` are filtered out before grouping.
    pub fn aggregate(derived: &DataFrame) -> Result<FatalityTable, AggregateError> {
        let grouped = derived
            .clone()
            .lazy()
            .filter(col("state_code").is_not_null())
            .group_by([col("year"), col("state_code")])
            .agg([col("fatalities").sum()])
            .sort_by_exprs(
                vec![col("year"), col("state_code")],
                SortMultipleOptions::default(),
            )
            .collect()?;

        let table = FatalityTable::from_frame(&grouped)?;
        info!(
            groups = table.len(),
            years = table.years().len(),
            states = table.states().len(),
            "aggregated fatalities by year and state"
        );
        Ok(table)
    }
}

impl FatalityTable {
    /// Read a frame with columns ["year", "state_code", "fatalities"].
    pub fn from_frame(df: &DataFrame) -> Result<Self, AggregateError> {
        let year = df.column("year")?.cast(&DataType::Int32)?;
        let year = year.i32()?;
        let state = df.column("state_code")?.cast(&DataType::String)?;
        let state = state.str()?;
        let fatalities = df.column("fatalities")?.cast(&DataType::Int64)?;
        let fatalities = fatalities.i64()?;

        let mut rows = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            rows.push(FatalityRow {
                year: year.get(i).ok_or(AggregateError::UnexpectedNull("year"))?,
                state_code: state
                    .get(i)
                    .ok_or(AggregateError::UnexpectedNull("state_code"))?
                    .to_string(),
                fatalities: fatalities
                    .get(i)
                    .ok_or(AggregateError::UnexpectedNull("fatalities"))?,
            });
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[FatalityRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct years, newest first (year-picker order).
    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.rows.iter().map(|r| r.year).collect();
        years.into_iter().rev().collect()
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.rows.iter().map(|r| r.year).max()
    }

    /// Distinct state codes, sorted.
    pub fn states(&self) -> Vec<&str> {
        let states: BTreeSet<&str> = self.rows.iter().map(|r| r.state_code.as_str()).collect();
        states.into_iter().collect()
    }

    /// Rows for the single-year map view.
    pub fn for_year(&self, year: i32) -> Vec<&FatalityRow> {
        self.rows.iter().filter(|r| r.year == year).collect()
    }

    /// Rows for a year, highest fatalities first. Ties keep state order.
    pub fn ranked_for_year(&self, year: i32) -> Vec<&FatalityRow> {
        let mut rows = self.for_year(year);
        rows.sort_by(|a, b| b.fatalities.cmp(&a.fatalities));
        rows
    }

    pub fn get(&self, year: i32, state_code: &str) -> Option<i64> {
        self.rows
            .iter()
            .find(|r| r.year == year && r.state_code == state_code)
            .map(|r| r.fatalities)
    }

    pub fn total_for_year(&self, year: i32) -> i64 {
        self.rows
            .iter()
            .filter(|r| r.year == year)
            .map(|r| r.fatalities)
            .sum()
    }

    /// Largest cell in the whole table, for the heatmap color range.
    pub fn max_fatalities(&self) -> i64 {
        self.rows.iter().map(|r| r.fatalities).max().unwrap_or(0)
    }

    /// Largest cell in one year, for the map color range.
    pub fn max_for_year(&self, year: i32) -> i64 {
        self.rows
            .iter()
            .filter(|r| r.year == year)
            .map(|r| r.fatalities)
            .max()
            .unwrap_or(0)
    }

    /// Output columns: ["year", "state_code", "fatalities"]
    pub fn to_frame(&self) -> Result<DataFrame, AggregateError> {
        let years: Vec<i32> = self.rows.iter().map(|r| r.year).collect();
        let states: Vec<&str> = self.rows.iter().map(|r| r.state_code.as_str()).collect();
        let fatalities: Vec<i64> = self.rows.iter().map(|r| r.fatalities).collect();
        let df = DataFrame::new(vec![
            Column::new("year".into(), years),
            Column::new("state_code".into(), states),
            Column::new("fatalities".into(), fatalities),
        ])?;
        Ok(df)
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), AggregateError> {
        let mut df = self.to_frame()?;
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
        info!(path = %path.display(), rows = df.height(), "wrote aggregated csv");
        Ok(())
    }

    pub fn write_json(&self, path: &Path) -> Result<(), AggregateError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        info!(path = %path.display(), rows = self.len(), "wrote aggregated json");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::Incident;
    use crate::data::processor::{DataProcessor, DerivedRecord};
    use std::collections::{BTreeMap, HashSet};

    fn incident(location: &str, year: i32, fatalities: u32) -> Incident {
        Incident {
            location: location.into(),
            year,
            fatalities,
        }
    }

    fn derive(incidents: &[Incident]) -> Vec<DerivedRecord> {
        DataProcessor::derive(incidents).0
    }

    fn aggregate(records: &[DerivedRecord]) -> FatalityTable {
        let df = DataProcessor::to_frame(records).unwrap();
        Aggregator::aggregate(&df).unwrap()
    }

    fn sample() -> Vec<Incident> {
        vec![
            incident("Las Vegas, NV", 2017, 58),
            incident("Sutherland Springs, Texas", 2017, 26),
            incident("Plano, TX", 2017, 8),
            incident("Orlando, Florida", 2016, 49),
            incident("Dallas, Texas", 2016, 5),
            incident("Lafayette, Lousiana", 2015, 2),
            incident("Washington, D.C.", 2013, 12),
            incident("Poseidonis, Atlantis", 2016, 7),
            incident("Nowhere", 2016, 3),
        ]
    }

    #[test]
    fn reno_rows_merge_into_one_group() {
        let table = aggregate(&derive(&[
            incident("Reno, Nevada", 2017, 5),
            incident("Reno, NV", 2017, 3),
        ]));
        assert_eq!(
            table.rows(),
            &[FatalityRow {
                year: 2017,
                state_code: "NV".into(),
                fatalities: 8,
            }]
        );
    }

    #[test]
    fn unknown_state_is_excluded_without_error() {
        let table = aggregate(&derive(&[incident("Poseidonis, Atlantis", 2016, 7)]));
        assert!(table.is_empty());
    }

    #[test]
    fn yearly_sums_match_derived_records() {
        let records = derive(&sample());
        let table = aggregate(&records);

        let mut expected: BTreeMap<i32, i64> = BTreeMap::new();
        for r in records.iter().filter(|r| r.state_code.is_some()) {
            *expected.entry(r.year).or_default() += i64::from(r.fatalities);
        }
        for (year, total) in expected {
            assert_eq!(table.total_for_year(year), total, "year {year}");
        }
        assert_eq!(table.total_for_year(2016), 54);
    }

    #[test]
    fn no_duplicate_keys() {
        let table = aggregate(&derive(&sample()));
        let mut seen = HashSet::new();
        for row in table.rows() {
            assert!(seen.insert((row.year, row.state_code.clone())));
        }
        assert_eq!(table.get(2017, "TX"), Some(34));
    }

    #[test]
    fn years_newest_first_and_year_filter() {
        let table = aggregate(&derive(&sample()));
        assert_eq!(table.years(), vec![2017, 2016, 2015, 2013]);
        assert_eq!(table.latest_year(), Some(2017));

        let ranked: Vec<_> = table
            .ranked_for_year(2017)
            .iter()
            .map(|r| (r.state_code.as_str(), r.fatalities))
            .collect();
        assert_eq!(ranked, vec![("NV", 58), ("TX", 34)]);
        assert!(table.for_year(2017).iter().all(|r| r.year == 2017));
        assert_eq!(table.max_for_year(2016), 49);
        assert_eq!(table.max_fatalities(), 58);
        assert_eq!(table.states(), vec!["DC", "FL", "LA", "NV", "TX"]);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let records = derive(&sample());
        assert_eq!(aggregate(&records), aggregate(&records));
    }

    #[test]
    fn frame_round_trip_and_exports() {
        let table = aggregate(&derive(&sample()));
        let df = table.to_frame().unwrap();
        assert_eq!(FatalityTable::from_frame(&df).unwrap(), table);

        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("fatalities.json");
        table.write_json(&json_path).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(parsed, serde_json::to_value(table.rows()).unwrap());
        assert_eq!(parsed[0]["state_code"], "DC");
        assert_eq!(parsed[0]["year"], 2013);

        let csv_path = dir.path().join("fatalities.csv");
        table.write_csv(&csv_path).unwrap();
        let csv = std::fs::read_to_string(&csv_path).unwrap();
        assert!(csv.starts_with("year,state_code,fatalities"));
    }
}
