//! Categorical label encoding

use crate::error::{PrediksiError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-column label encoder.
///
/// Each fitted column gets a table mapping its observed category strings,
/// sorted lexicographically, to codes `0..k-1`. Values not present at fit
/// time encode to the configured fallback code instead of raising.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    tables: HashMap<String, HashMap<String, i64>>,
    unseen_code: i64,
    is_fitted: bool,
}

impl LabelEncoder {
    /// Create a new encoder with the given fallback code for unseen values
    pub fn new(unseen_code: i64) -> Self {
        Self {
            tables: HashMap::new(),
            unseen_code,
            is_fitted: false,
        }
    }

    /// Fit one encoding table per column
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| PrediksiError::FeatureNotFound(col_name.to_string()))?;
            let table = Self::build_table(column.as_materialized_series())?;
            self.tables.insert(col_name.to_string(), table);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Replace every fitted column with its integer codes
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PrediksiError::NotFitted);
        }

        let mut result = df.clone();
        for (col_name, table) in &self.tables {
            if let Ok(column) = df.column(col_name) {
                let ca = column
                    .as_materialized_series()
                    .str()
                    .map_err(|e| PrediksiError::DataError(e.to_string()))?;

                let values: Vec<i64> = ca
                    .into_iter()
                    .map(|opt| {
                        opt.and_then(|s| table.get(s).copied())
                            .unwrap_or(self.unseen_code)
                    })
                    .collect();

                let encoded = Series::new(col_name.as_str().into(), values);
                result = result.with_column(encoded)?.clone();
            }
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Encode a single value against a fitted column table.
    ///
    /// The fallback code (-1 by default) is returned for any value absent
    /// from the table. Fitted codes occupy `0..k-1`, so the fallback stays
    /// outside that range; callers substituting a different code must keep
    /// it clear of the fitted range or unseen values alias a real class.
    pub fn encode_value(&self, column: &str, value: &str) -> Result<i64> {
        let table = self
            .tables
            .get(column)
            .ok_or_else(|| PrediksiError::FeatureNotFound(column.to_string()))?;
        Ok(table.get(value).copied().unwrap_or(self.unseen_code))
    }

    /// Observed categories of a fitted column, in code order
    pub fn classes(&self, column: &str) -> Option<Vec<String>> {
        self.tables.get(column).map(|table| {
            let mut pairs: Vec<(&String, &i64)> = table.iter().collect();
            pairs.sort_by_key(|(_, code)| **code);
            pairs.into_iter().map(|(name, _)| name.clone()).collect()
        })
    }

    /// Columns with fitted tables
    pub fn columns(&self) -> Vec<&str> {
        self.tables.keys().map(|s| s.as_str()).collect()
    }

    fn build_table(series: &Series) -> Result<HashMap<String, i64>> {
        let ca = series
            .str()
            .map_err(|e| PrediksiError::DataError(e.to_string()))?;

        let mut categories: Vec<&str> = ca
            .into_iter()
            .flatten()
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        categories.sort_unstable();

        Ok(categories
            .into_iter()
            .enumerate()
            .map(|(code, cat)| (cat.to_string(), code as i64))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted() -> LabelEncoder {
        let df = df!("city" => &["NYC", "LA", "NYC", "SF", "LA"]).unwrap();
        let mut encoder = LabelEncoder::new(-1);
        encoder.fit(&df, &["city"]).unwrap();
        encoder
    }

    #[test]
    fn test_codes_follow_sorted_order() {
        let encoder = fitted();
        assert_eq!(encoder.encode_value("city", "LA").unwrap(), 0);
        assert_eq!(encoder.encode_value("city", "NYC").unwrap(), 1);
        assert_eq!(encoder.encode_value("city", "SF").unwrap(), 2);
    }

    #[test]
    fn test_unseen_category_encodes_to_fallback() {
        let encoder = fitted();
        assert_eq!(encoder.encode_value("city", "Boston").unwrap(), -1);
        assert_eq!(encoder.encode_value("city", "Unknown").unwrap(), -1);
    }

    #[test]
    fn test_transform_replaces_with_codes() {
        let encoder = fitted();
        let df = df!("city" => &["SF", "Boston"]).unwrap();
        let result = encoder.transform(&df).unwrap();

        let col = result.column("city").unwrap().i64().unwrap().clone();
        assert_eq!(col.get(0), Some(2));
        assert_eq!(col.get(1), Some(-1));
    }

    #[test]
    fn test_classes_in_code_order() {
        let encoder = fitted();
        assert_eq!(
            encoder.classes("city"),
            Some(vec!["LA".to_string(), "NYC".to_string(), "SF".to_string()])
        );
    }

    #[test]
    fn test_unfitted_column_errors() {
        let encoder = fitted();
        assert!(matches!(
            encoder.encode_value("state", "CA"),
            Err(PrediksiError::FeatureNotFound(_))
        ));
    }
}
