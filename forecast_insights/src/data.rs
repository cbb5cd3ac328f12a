//! Time series data handling and table input

use crate::error::{ForecastError, Result};
use crate::normalize::normalize_columns;
use chrono::NaiveDateTime;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A single observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Timezone-naive instant
    pub timestamp: NaiveDateTime,
    /// Observed value
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Historical observations ordered by timestamp
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    points: Vec<TimeSeriesPoint>,
}

impl TimeSeries {
    /// Create a series from points in any order. Points are stably sorted
    /// by timestamp.
    pub fn new(mut points: Vec<TimeSeriesPoint>) -> Self {
        points.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Self { points }
    }

    /// Create a series from parallel timestamp and value vectors
    pub fn from_parts(timestamps: Vec<NaiveDateTime>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::InvalidTable(format!(
                "Timestamps length ({}) doesn't match values length ({})",
                timestamps.len(),
                values.len()
            )));
        }

        Ok(Self::new(
            timestamps
                .into_iter()
                .zip(values)
                .map(|(timestamp, value)| TimeSeriesPoint { timestamp, value })
                .collect(),
        ))
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Observation timestamps
    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// Observation values
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Timestamps with duplicates removed, ascending
    pub fn unique_timestamps(&self) -> Vec<NaiveDateTime> {
        let mut timestamps = self.timestamps();
        timestamps.dedup();
        timestamps
    }

    pub fn first(&self) -> Option<&TimeSeriesPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TimeSeriesPoint> {
        self.points.last()
    }
}

/// Data loader for header-row tabular data
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a table from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ForecastError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Data file not found at {}", path.display()),
            )));
        }
        let bytes = fs::read(path)?;
        Self::from_csv_bytes(&bytes)
    }

    /// Load a table from in-memory CSV bytes.
    ///
    /// A failed strict UTF-8 read is retried once with lossy decoding.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<DataFrame> {
        match Self::read_csv(bytes, CsvEncoding::Utf8) {
            Ok(df) => Ok(df),
            Err(first) => {
                warn!("CSV read failed ({}), retrying with lossy decoding", first);
                Self::read_csv(bytes, CsvEncoding::LossyUtf8).map_err(|e| {
                    ForecastError::InvalidTable(format!("Invalid CSV file. Could not parse: {}", e))
                })
            }
        }
    }

    fn read_csv(bytes: &[u8], encoding: CsvEncoding) -> PolarsResult<DataFrame> {
        let df = CsvReader::new(Cursor::new(bytes.to_vec()))
            .infer_schema(None)
            .has_header(true)
            .with_encoding(encoding)
            .finish()?;
        debug!(
            "Read CSV table with {} rows and columns {:?}",
            df.height(),
            df.get_column_names()
        );
        Ok(df)
    }
}

/// Where the input table of an analysis comes from
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Name of a file inside the configured data directory
    Stored(String),
    /// A table already in memory
    Loaded(DataFrame),
}

impl DataSource {
    /// Materialize the table, reading stored files through `store`
    pub fn load(self, store: &DataStore) -> Result<DataFrame> {
        match self {
            DataSource::Stored(name) => store.load(&name),
            DataSource::Loaded(df) => Ok(df),
        }
    }
}

/// File storage rooted at an explicit data directory
#[derive(Debug, Clone)]
pub struct DataStore {
    data_dir: PathBuf,
}

impl DataStore {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of a stored file. Only the file name component of `name` is used.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let file_name = Path::new(name)
            .file_name()
            .ok_or_else(|| ForecastError::InvalidParameter(format!("Invalid file name '{}'", name)))?;
        Ok(self.data_dir.join(file_name))
    }

    /// Read a stored table
    pub fn load(&self, name: &str) -> Result<DataFrame> {
        let path = self.resolve(name)?;
        debug!("Loading stored table from {}", path.display());
        DataLoader::from_csv(path)
    }

    /// Normalize a table and persist it as `clean_<name>`
    pub fn save_normalized(&self, name: &str, df: &DataFrame) -> Result<PathBuf> {
        let mut normalized = normalize_columns(df)?;
        fs::create_dir_all(&self.data_dir)?;

        let file_name = Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ForecastError::InvalidParameter(format!("Invalid file name '{}'", name)))?;
        let path = self.data_dir.join(format!("clean_{}", file_name));

        let mut file = File::create(&path)?;
        CsvWriter::new(&mut file)
            .has_header(true)
            .finish(&mut normalized)?;

        info!(
            "Saved {} normalized rows to {}",
            normalized.height(),
            path.display()
        );
        Ok(path)
    }
}
