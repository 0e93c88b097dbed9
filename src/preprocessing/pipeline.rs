//! Feature pipeline
//!
//! Composes imputation, scaling, and encoding into the one contract the
//! classifier depends on: a raw record in, a numeric row out, with the same
//! column set, order, and ranges as the reference data the transforms were
//! fitted on.

use super::{
    config::PreprocessingConfig, encoder::LabelEncoder, imputer::Imputer, scaler::Scaler,
    FeatureStats,
};
use crate::error::{PrediksiError, Result};
use crate::schema::{FieldValue, InputRecord};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fit-once feature pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturePipeline {
    config: PreprocessingConfig,
    column_order: Vec<String>,
    numeric_columns: Vec<String>,
    categorical_columns: Vec<String>,
    numeric_imputer: Option<Imputer>,
    categorical_imputer: Option<Imputer>,
    scaler: Option<Scaler>,
    encoder: Option<LabelEncoder>,
    feature_stats: HashMap<String, FeatureStats>,
    is_fitted: bool,
}

impl FeaturePipeline {
    /// Create a new pipeline with default configuration
    pub fn new() -> Self {
        Self::with_config(PreprocessingConfig::default())
    }

    /// Create a new pipeline with custom configuration
    pub fn with_config(config: PreprocessingConfig) -> Self {
        Self {
            config,
            column_order: Vec::new(),
            numeric_columns: Vec::new(),
            categorical_columns: Vec::new(),
            numeric_imputer: None,
            categorical_imputer: None,
            scaler: None,
            encoder: None,
            feature_stats: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Cast all integer and f32 columns to Float64 for consistent processing
    fn cast_numeric_to_f64(df: &DataFrame) -> Result<DataFrame> {
        let mut result = df.clone();
        for col in df.get_columns() {
            match col.dtype() {
                DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
                | DataType::Float32 => {
                    let casted = col.cast(&DataType::Float64)?;
                    result = result.with_column(casted)?.clone();
                }
                _ => {}
            }
        }
        Ok(result)
    }

    /// Fit the pipeline to the reference data.
    ///
    /// Column order is captured here and enforced on every transform; the
    /// classifier was trained against this exact layout.
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        let df = &Self::cast_numeric_to_f64(df)?;

        self.detect_column_types(df)?;
        self.compute_statistics(df)?;

        if !self.numeric_columns.is_empty() {
            let mut imputer = Imputer::new(self.config.numeric_impute_strategy.clone());
            let cols: Vec<&str> = self.numeric_columns.iter().map(|s| s.as_str()).collect();
            imputer.fit(df, &cols)?;
            self.numeric_imputer = Some(imputer);
        }

        if !self.categorical_columns.is_empty() {
            let mut imputer = Imputer::new(self.config.categorical_impute_strategy.clone());
            let cols: Vec<&str> = self.categorical_columns.iter().map(|s| s.as_str()).collect();
            imputer.fit(df, &cols)?;
            self.categorical_imputer = Some(imputer);
        }

        // Scaler and encoder are fitted on imputed data so reference nulls
        // don't skew the fitted parameters.
        if !self.numeric_columns.is_empty() {
            let mut scaler = Scaler::new(self.config.scaler.clone());
            let cols: Vec<&str> = self.numeric_columns.iter().map(|s| s.as_str()).collect();
            let imputed = match &self.numeric_imputer {
                Some(imputer) => imputer.transform(df)?,
                None => df.clone(),
            };
            scaler.fit(&imputed, &cols)?;
            self.scaler = Some(scaler);
        }

        if !self.categorical_columns.is_empty() {
            let mut encoder = LabelEncoder::new(self.config.unseen_code);
            let cols: Vec<&str> = self.categorical_columns.iter().map(|s| s.as_str()).collect();
            let imputed = match &self.categorical_imputer {
                Some(imputer) => imputer.transform(df)?,
                None => df.clone(),
            };
            encoder.fit(&imputed, &cols)?;
            self.encoder = Some(encoder);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Transform a frame into the fitted feature layout
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PrediksiError::NotFitted);
        }

        let mut result = Self::cast_numeric_to_f64(df)?;

        if let Some(ref imputer) = self.numeric_imputer {
            result = imputer.transform(&result)?;
        }
        if let Some(ref imputer) = self.categorical_imputer {
            result = imputer.transform(&result)?;
        }
        if let Some(ref scaler) = self.scaler {
            result = scaler.transform(&result)?;
        }
        if let Some(ref encoder) = self.encoder {
            result = encoder.transform(&result)?;
        }

        // Re-select into the fitted order; transforms preserve input order,
        // which may differ from the order the classifier expects.
        let order: Vec<&str> = self
            .column_order
            .iter()
            .filter(|name| result.column(name).is_ok())
            .map(|s| s.as_str())
            .collect();
        Ok(result.select(order)?)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Transform one raw submitted record into a single processed row.
    ///
    /// Missing categorical fields take the configured sentinel and flow
    /// through the encoder like any other value; missing numeric fields
    /// become nulls and take the fitted fill value. Extra fields not seen
    /// at fit time are ignored. Nothing about a record is rejected here.
    pub fn transform_record(&self, record: &InputRecord) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PrediksiError::NotFitted);
        }

        let mut columns: Vec<Column> = Vec::with_capacity(self.column_order.len());
        for name in &self.column_order {
            let value = record.get(name.as_str());
            if self.numeric_columns.contains(name) {
                let v: Option<f64> = value.and_then(FieldValue::as_f64);
                let ca: Float64Chunked = std::iter::once(v).collect();
                columns.push(ca.with_name(name.as_str().into()).into_series().into());
            } else {
                let text = value
                    .map(FieldValue::as_text)
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| self.config.missing_category.clone());
                let ca: StringChunked = std::iter::once(Some(text.as_str())).collect();
                columns.push(ca.with_name(name.as_str().into()).into_series().into());
            }
        }

        let df = DataFrame::new(columns)?;
        self.transform(&df)
    }

    /// Get feature statistics captured at fit time
    pub fn feature_stats(&self) -> &HashMap<String, FeatureStats> {
        &self.feature_stats
    }

    /// Observed categories of a fitted categorical column, in code order
    pub fn categories(&self, column: &str) -> Option<Vec<String>> {
        self.encoder.as_ref().and_then(|e| e.classes(column))
    }

    /// Column names in the fitted order
    pub fn column_order(&self) -> &[String] {
        &self.column_order
    }

    /// Get numeric column names
    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    /// Get categorical column names
    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical_columns
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Save the fitted pipeline to a file
    pub fn save(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a fitted pipeline from a file
    pub fn load(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let pipeline: Self = serde_json::from_str(&json)?;
        Ok(pipeline)
    }

    fn detect_column_types(&mut self, df: &DataFrame) -> Result<()> {
        self.column_order.clear();
        self.numeric_columns.clear();
        self.categorical_columns.clear();

        for col in df.get_columns() {
            let name = col.name().to_string();
            self.column_order.push(name.clone());

            match col.dtype() {
                DataType::Float64 => self.numeric_columns.push(name),
                DataType::String => self.categorical_columns.push(name),
                dtype => {
                    if col.as_materialized_series().str().is_ok() {
                        self.categorical_columns.push(name);
                    } else {
                        return Err(PrediksiError::DataError(format!(
                            "Column {name:?} has unsupported dtype {dtype:?}"
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    fn compute_statistics(&mut self, df: &DataFrame) -> Result<()> {
        self.feature_stats.clear();

        for col_name in &self.numeric_columns {
            if let Ok(column) = df.column(col_name) {
                let stats =
                    FeatureStats::from_numeric_series(col_name, column.as_materialized_series())?;
                self.feature_stats.insert(col_name.clone(), stats);
            }
        }

        for col_name in &self.categorical_columns {
            if let Ok(column) = df.column(col_name) {
                let stats = FeatureStats::from_categorical_series(
                    col_name,
                    column.as_materialized_series(),
                )?;
                self.feature_stats.insert(col_name.clone(), stats);
            }
        }

        Ok(())
    }
}

impl Default for FeaturePipeline {
    fn default() -> Self {
        Self::new()
    }
}
