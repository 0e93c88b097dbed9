//! Feature preprocessing
//!
//! Everything the service fits once at startup from the reference dataset:
//! - Missing value imputation
//! - Standard scaling of numeric columns
//! - Label encoding of categorical columns
//! - The pipeline composing them into the feature contract the classifier expects

mod config;
mod encoder;
mod imputer;
mod pipeline;
mod scaler;

pub use config::PreprocessingConfig;
pub use encoder::LabelEncoder;
pub use imputer::{ImputeStrategy, Imputer};
pub use pipeline::FeaturePipeline;
pub use scaler::{Scaler, ScalerKind};

use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column data type for preprocessing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnType {
    Numeric,
    Categorical,
    Unknown,
}

/// Feature statistics computed during fit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureStats {
    pub name: String,
    pub dtype: ColumnType,
    pub count: usize,
    pub null_count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub unique_count: Option<usize>,
    pub categories: Option<Vec<String>>,
}

impl FeatureStats {
    /// Create new feature statistics
    pub fn new(name: impl Into<String>, dtype: ColumnType) -> Self {
        Self {
            name: name.into(),
            dtype,
            count: 0,
            null_count: 0,
            mean: None,
            std: None,
            min: None,
            max: None,
            unique_count: None,
            categories: None,
        }
    }

    /// Compute statistics from a numeric series
    pub fn from_numeric_series(name: &str, series: &Series) -> Result<Self> {
        let mut stats = Self::new(name, ColumnType::Numeric);
        stats.count = series.len();
        stats.null_count = series.null_count();

        let ca = series.cast(&DataType::Float64)?;
        let ca = ca.f64()?;
        stats.mean = ca.mean();
        stats.std = ca.std(1);
        stats.min = ca.min();
        stats.max = ca.max();

        Ok(stats)
    }

    /// Compute statistics from a categorical series
    pub fn from_categorical_series(name: &str, series: &Series) -> Result<Self> {
        let mut stats = Self::new(name, ColumnType::Categorical);
        stats.count = series.len();
        stats.null_count = series.null_count();
        stats.unique_count = Some(series.n_unique().unwrap_or(0));

        if let Ok(ca) = series.str() {
            let mut categories: Vec<String> = ca
                .into_iter()
                .flatten()
                .map(|s| s.to_string())
                .collect::<std::collections::HashSet<_>>()
                .into_iter()
                .collect();
            categories.sort();
            stats.categories = Some(categories);
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_stats_new() {
        let stats = FeatureStats::new("age", ColumnType::Numeric);
        assert_eq!(stats.name, "age");
        assert_eq!(stats.dtype, ColumnType::Numeric);
        assert_eq!(stats.count, 0);
    }

    #[test]
    fn test_categorical_stats_sorted() {
        let series = Series::new("city".into(), &["NYC", "LA", "NYC", "SF"]);
        let stats = FeatureStats::from_categorical_series("city", &series).unwrap();
        assert_eq!(
            stats.categories,
            Some(vec!["LA".to_string(), "NYC".to_string(), "SF".to_string()])
        );
        assert_eq!(stats.unique_count, Some(3));
    }
}
