//! Column normalization: map an arbitrary table onto `ds` / `y`

use crate::error::{ForecastError, Result};
use polars::prelude::*;
use tracing::{debug, info};

/// Canonical timestamp column name
pub const DATE_COLUMN: &str = "ds";
/// Canonical numeric target column name
pub const VALUE_COLUMN: &str = "y";

/// Lower-cased names accepted for the timestamp column
const DATE_ALIASES: [&str; 4] = ["date", "ds", "timestamp", "time"];

/// Lower-cased names accepted for the target column, in priority order
const TARGET_ALIASES: [&str; 7] = [
    "value", "sales", "revenue", "quantity", "amount", "close", "price",
];

/// Find the timestamp column.
///
/// A column literally named `ds` wins; otherwise the first column whose
/// lower-cased name is a known date alias.
pub fn detect_date_column(df: &DataFrame) -> Result<String> {
    let names = df.get_column_names();

    if names.iter().any(|name| *name == DATE_COLUMN) {
        return Ok(DATE_COLUMN.to_string());
    }

    names
        .iter()
        .find(|name| DATE_ALIASES.contains(&name.to_lowercase().as_str()))
        .map(|name| name.to_string())
        .ok_or(ForecastError::NoDateColumn)
}

/// Find the numeric target column among the columns other than `date_column`.
///
/// Priority: exactly `y`, then case-insensitive `y`, then the first column
/// named after a known value alias (earlier aliases win), then the first
/// numeric-typed column.
pub fn detect_target_column(df: &DataFrame, date_column: &str) -> Result<String> {
    let candidates: Vec<&Series> = df
        .get_columns()
        .iter()
        .filter(|s| s.name() != date_column)
        .collect();

    if let Some(s) = candidates.iter().find(|s| s.name() == VALUE_COLUMN) {
        return Ok(s.name().to_string());
    }

    if let Some(s) = candidates
        .iter()
        .find(|s| s.name().to_lowercase() == VALUE_COLUMN)
    {
        return Ok(s.name().to_string());
    }

    for alias in TARGET_ALIASES {
        if let Some(s) = candidates.iter().find(|s| s.name().to_lowercase() == alias) {
            return Ok(s.name().to_string());
        }
    }

    candidates
        .iter()
        .find(|s| s.dtype().is_numeric())
        .map(|s| s.name().to_string())
        .ok_or(ForecastError::NoTargetColumn)
}

/// Reduce a table to the two canonical columns `ds` and `y`.
///
/// The target is coerced to `Float64`; rows whose value cannot be coerced
/// (or is missing) are dropped. Row order is preserved. Normalizing an
/// already-normalized table returns an identical table.
pub fn normalize_columns(df: &DataFrame) -> Result<DataFrame> {
    let date_column = detect_date_column(df)?;
    let target_column = detect_target_column(df, &date_column)?;
    debug!(
        "Selected date column '{}' and target column '{}'",
        date_column, target_column
    );

    let mut ds = df.column(&date_column)?.clone();
    ds.rename(DATE_COLUMN);

    let mut y = df.column(&target_column)?.cast(&DataType::Float64)?;
    y.rename(VALUE_COLUMN);

    let keep: BooleanChunked = y
        .f64()?
        .into_iter()
        .map(|v| matches!(v, Some(v) if !v.is_nan()))
        .collect();

    let normalized = DataFrame::new(vec![ds, y])?.filter(&keep)?;

    let dropped = df.height() - normalized.height();
    if dropped > 0 {
        info!(
            "Dropped {} rows with non-numeric '{}' values",
            dropped, target_column
        );
    }

    Ok(normalized)
}
