//! Missing value imputation

use crate::error::{PrediksiError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Strategy for imputing missing values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace with the column mean (numeric only)
    Mean,
    /// Replace with the column median (numeric only)
    Median,
    /// Replace with the most frequent value (categorical only)
    MostFrequent,
    /// Replace with a constant string (categorical only)
    ConstantString(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum FillValue {
    Numeric(f64),
    Text(String),
}

/// Imputer with per-column fill values fitted from the reference data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Imputer {
    strategy: ImputeStrategy,
    fill_values: HashMap<String, FillValue>,
    is_fitted: bool,
}

impl Imputer {
    /// Create a new imputer with the specified strategy
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            strategy,
            fill_values: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Fit the imputer to the data
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| PrediksiError::FeatureNotFound(col_name.to_string()))?;
            let fill_value = self.compute_fill_value(column.as_materialized_series())?;
            self.fill_values.insert(col_name.to_string(), fill_value);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Transform the data by imputing missing values
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PrediksiError::NotFitted);
        }

        let mut result = df.clone();
        for (col_name, fill_value) in &self.fill_values {
            if let Ok(column) = df.column(col_name) {
                let filled = Self::fill_series(column.as_materialized_series(), fill_value)?;
                result = result.with_column(filled)?.clone();
            }
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    fn compute_fill_value(&self, series: &Series) -> Result<FillValue> {
        match &self.strategy {
            ImputeStrategy::Mean => {
                let ca = series.cast(&DataType::Float64)?;
                Ok(FillValue::Numeric(ca.f64()?.mean().unwrap_or(0.0)))
            }
            ImputeStrategy::Median => {
                let ca = series.cast(&DataType::Float64)?;
                Ok(FillValue::Numeric(ca.f64()?.median().unwrap_or(0.0)))
            }
            ImputeStrategy::MostFrequent => {
                let ca = series
                    .str()
                    .map_err(|e| PrediksiError::DataError(e.to_string()))?;
                let mut counts: HashMap<&str, usize> = HashMap::new();
                for val in ca.into_iter().flatten() {
                    *counts.entry(val).or_insert(0) += 1;
                }
                // Ties break toward the lexicographically smaller value so
                // repeated fits are deterministic.
                let mode = counts
                    .into_iter()
                    .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(a.0)))
                    .map(|(v, _)| v.to_string())
                    .unwrap_or_default();
                Ok(FillValue::Text(mode))
            }
            ImputeStrategy::ConstantString(s) => Ok(FillValue::Text(s.clone())),
        }
    }

    fn fill_series(series: &Series, fill_value: &FillValue) -> Result<Series> {
        match fill_value {
            FillValue::Numeric(fill) => {
                let ca = series.cast(&DataType::Float64)?;
                let filled: Float64Chunked = ca
                    .f64()?
                    .into_iter()
                    .map(|opt| Some(opt.unwrap_or(*fill)))
                    .collect();
                Ok(filled.with_name(series.name().clone()).into_series())
            }
            FillValue::Text(fill) => {
                let ca = series
                    .str()
                    .map_err(|e| PrediksiError::DataError(e.to_string()))?;
                let filled: Vec<String> = ca
                    .into_iter()
                    .map(|opt| opt.unwrap_or(fill).to_string())
                    .collect();
                Ok(Series::new(series.name().clone(), filled))
            }
        }
    }
}
