//! Reference dataset loading

use crate::error::{PrediksiError, Result};
use polars::prelude::*;
use std::path::Path;

/// Load a reference dataset from disk, dispatching on the file extension.
/// CSV is the format the deployed datasets use; JSON is accepted for
/// fixtures and ad-hoc inputs.
pub fn load_dataframe(path: &Path) -> Result<DataFrame> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let df = match ext {
        "csv" => CsvReadOptions::default()
            .with_infer_schema_length(Some(1000))
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?,
        "json" => JsonReader::new(std::fs::File::open(path)?).finish()?,
        _ => {
            return Err(PrediksiError::DataError(format!(
                "Unsupported file format: {ext:?} (expected csv or json)"
            )))
        }
    };

    if df.height() == 0 {
        return Err(PrediksiError::DataError(format!(
            "Reference dataset {} is empty",
            path.display()
        )));
    }

    Ok(df)
}

/// Restrict a frame to the named columns, in the given order.
/// Errors name the first missing column so startup failures point at the
/// mismatched field.
pub fn select_columns(df: &DataFrame, names: &[&str]) -> Result<DataFrame> {
    for name in names {
        if df.column(name).is_err() {
            return Err(PrediksiError::FeatureNotFound((*name).to_string()));
        }
    }
    Ok(df.select(names.iter().copied())?)
}
