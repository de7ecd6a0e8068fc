//! Incident Loader Module
//! Reads the incident CSV with Polars and extracts typed incident rows.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Columns the pipeline reads. Anything else in the file is ignored.
pub const REQUIRED_COLUMNS: [&str; 3] = ["location", "year", "fatalities"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("No data loaded")]
    NoData,
}

/// One row of the source dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incident {
    pub location: String,
    pub year: i32,
    pub fatalities: u32,
}

/// Typed rows pulled out of a loaded frame.
#[derive(Debug, Clone, Default)]
pub struct IncidentBatch {
    pub incidents: Vec<Incident>,
    pub rows_read: usize,
    /// Rows with a null or unusable location, year or fatality count.
    pub rows_skipped: usize,
}

/// Handles CSV file loading with Polars.
pub struct IncidentLoader {
    df: Option<DataFrame>,
}

impl Default for IncidentLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl IncidentLoader {
    pub fn new() -> Self {
        Self { df: None }
    }

    /// Load a CSV file and check that the required columns are present.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;
        check_columns(&df)?;

        info!(
            path = %file_path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded incident csv"
        );
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Extract typed incidents from the loaded DataFrame.
    pub fn incidents(&self) -> Result<IncidentBatch, LoaderError> {
        let df = self.df.as_ref().ok_or(LoaderError::NoData)?;
        extract_incidents(df)
    }
}

fn check_columns(df: &DataFrame) -> Result<(), LoaderError> {
    let names = df.get_column_names();
    for required in REQUIRED_COLUMNS {
        if !names.iter().any(|name| name.as_str() == required) {
            return Err(LoaderError::MissingColumn(required));
        }
    }
    Ok(())
}

/// Pull `(location, year, fatalities)` out of every row.
///
/// Year and fatalities are read as floats and must hold whole numbers, so
/// `2017.0` is accepted while `2.7` is not. Values Polars could not parse
/// arrive as nulls. Rows with nulls, fractional values, negative counts or
/// years outside the `i32` range are skipped.
pub fn extract_incidents(df: &DataFrame) -> Result<IncidentBatch, LoaderError> {
    check_columns(df)?;

    let location = df.column("location")?.cast(&DataType::String)?;
    let location = location.str()?;
    let year = df.column("year")?.cast(&DataType::Float64)?;
    let year = year.f64()?;
    let fatalities = df.column("fatalities")?.cast(&DataType::Float64)?;
    let fatalities = fatalities.f64()?;

    let mut batch = IncidentBatch {
        incidents: Vec::with_capacity(df.height()),
        rows_read: df.height(),
        rows_skipped: 0,
    };

    for i in 0..df.height() {
        let row = (location.get(i), year.get(i), fatalities.get(i));
        let incident = match row {
            (Some(loc), Some(y), Some(f)) => whole::<i32>(y)
                .zip(whole::<u32>(f))
                .map(|(year, fatalities)| Incident {
                    location: loc.to_string(),
                    year,
                    fatalities,
                }),
            _ => None,
        };

        match incident {
            Some(incident) => batch.incidents.push(incident),
            None => {
                debug!(index = i, ?row, "skipping row with unusable fields");
                batch.rows_skipped += 1;
            }
        }
    }

    if batch.rows_skipped > 0 {
        warn!(
            skipped = batch.rows_skipped,
            total = batch.rows_read,
            "rows dropped during extraction"
        );
    }
    Ok(batch)
}

/// `Some` when `value` is a whole number that fits in `T`.
fn whole<T: TryFrom<i64>>(value: f64) -> Option<T> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return None;
    }
    T::try_from(value as i64).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut tmp = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("temp file");
        tmp.write_all(content.as_bytes()).expect("write csv");
        tmp
    }

    #[test]
    fn loads_required_columns_and_ignores_the_rest() {
        let tmp = write_csv(
            "case,location,date,fatalities,injured,year\n\
             Vegas Strip,\"Las Vegas, NV\",10/1/17,58,546,2017\n\
             Church,\"Sutherland Springs, Texas\",11/5/17,26,20,2017\n\
             Club,\"Orlando, Florida\",6/12/16,49,53,2016\n",
        );
        let mut loader = IncidentLoader::new();
        assert_eq!(loader.load_csv(tmp.path()).unwrap().height(), 3);

        let batch = loader.incidents().unwrap();
        assert_eq!(batch.rows_read, 3);
        assert_eq!(batch.rows_skipped, 0);
        assert_eq!(
            batch.incidents[0],
            Incident {
                location: "Las Vegas, NV".into(),
                year: 2017,
                fatalities: 58,
            }
        );
        assert_eq!(batch.incidents[2].year, 2016);
    }

    #[test]
    fn missing_column_is_an_error() {
        let tmp = write_csv("location,year\n\"Reno, NV\",2017\n");
        let err = IncidentLoader::new().load_csv(tmp.path()).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn("fatalities")));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = IncidentLoader::new()
            .load_csv(Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }

    #[test]
    fn rows_with_null_or_negative_fields_are_skipped() {
        let df = df!(
            "location" => [Some("Reno, NV"), None, Some("Reno, NV"), Some("Reno, NV")],
            "year" => [Some(2017i64), Some(2017), None, Some(2018)],
            "fatalities" => [Some(3i64), Some(4), Some(5), Some(-1)]
        )
        .unwrap();
        let batch = extract_incidents(&df).unwrap();
        assert_eq!(batch.rows_read, 4);
        assert_eq!(batch.rows_skipped, 3);
        assert_eq!(batch.incidents.len(), 1);
        assert_eq!(batch.incidents[0].fatalities, 3);
    }

    #[test]
    fn fractional_counts_are_skipped_not_truncated() {
        let tmp = write_csv(
            "location,year,fatalities\n\
             \"Reno, NV\",2017,2.7\n\
             \"Reno, NV\",2017.0,3\n",
        );
        let mut loader = IncidentLoader::new();
        loader.load_csv(tmp.path()).unwrap();
        let batch = loader.incidents().unwrap();
        assert_eq!(batch.rows_read, 2);
        assert_eq!(batch.rows_skipped, 1);
        assert_eq!(
            batch.incidents,
            vec![Incident {
                location: "Reno, NV".into(),
                year: 2017,
                fatalities: 3,
            }]
        );
    }

    #[test]
    fn whole_rejects_fractions_and_out_of_range() {
        assert_eq!(whole::<u32>(3.0), Some(3));
        assert_eq!(whole::<u32>(2.7), None);
        assert_eq!(whole::<u32>(-1.0), None);
        assert_eq!(whole::<u32>(f64::NAN), None);
        assert_eq!(whole::<i32>(1e12), None);
    }

    #[test]
    fn incidents_before_load_is_no_data() {
        assert!(matches!(
            IncidentLoader::new().incidents(),
            Err(LoaderError::NoData)
        ));
    }
}
