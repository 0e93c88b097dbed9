//! Numeric feature scaling

use crate::error::{PrediksiError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Scaling applied to numeric columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalerKind {
    /// Standard scaling (z-score normalization): (x - mean) / std
    Standard,
    /// No scaling
    None,
}

/// Parameters for a fitted scaler column
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalerParams {
    center: f64,
    scale: f64,
}

/// Numeric scaler with per-column fitted parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    kind: ScalerKind,
    params: HashMap<String, ScalerParams>,
    is_fitted: bool,
}

impl Scaler {
    /// Create a new scaler
    pub fn new(kind: ScalerKind) -> Self {
        Self {
            kind,
            params: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Fit the scaler to the data
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| PrediksiError::FeatureNotFound(col_name.to_string()))?;
            let params = self.compute_params(column.as_materialized_series())?;
            self.params.insert(col_name.to_string(), params);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Transform the data.
    /// Builds all replacement columns first, then applies them in a single
    /// pass (avoids N DataFrame clones for N columns).
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PrediksiError::NotFitted);
        }

        let replacements: Vec<Series> = self
            .params
            .iter()
            .filter_map(|(col_name, params)| {
                df.column(col_name).ok().map(|column| {
                    Self::scale_series(column.as_materialized_series(), params)
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut result = df.clone();
        for scaled in replacements {
            result = result.with_column(scaled)?.clone();
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    fn compute_params(&self, series: &Series) -> Result<ScalerParams> {
        let ca = series.cast(&DataType::Float64)?;
        let ca = ca.f64()?;

        match self.kind {
            ScalerKind::Standard => {
                let mean = ca.mean().unwrap_or(0.0);
                let std = ca.std(1).unwrap_or(1.0);
                Ok(ScalerParams {
                    center: mean,
                    // Constant columns pass through centered
                    scale: if std == 0.0 { 1.0 } else { std },
                })
            }
            ScalerKind::None => Ok(ScalerParams {
                center: 0.0,
                scale: 1.0,
            }),
        }
    }

    fn scale_series(series: &Series, params: &ScalerParams) -> Result<Series> {
        let ca = series.cast(&DataType::Float64)?;
        let scaled: Float64Chunked = ca
            .f64()?
            .into_iter()
            .map(|opt| opt.map(|v| (v - params.center) / params.scale))
            .collect();

        Ok(scaled.with_name(series.name().clone()).into_series())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_scaler_zero_mean() {
        let df = df!("a" => &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let mut scaler = Scaler::new(ScalerKind::Standard);
        let result = scaler.fit_transform(&df, &["a"]).unwrap();

        let col = result.column("a").unwrap().f64().unwrap().clone();
        let mean: f64 = col.mean().unwrap();
        assert!(mean.abs() < 1e-10);
    }

    #[test]
    fn test_value_at_mean_scales_to_zero() {
        let df = df!("a" => &[10.0, 20.0, 30.0]).unwrap();
        let mut scaler = Scaler::new(ScalerKind::Standard);
        scaler.fit(&df, &["a"]).unwrap();

        let probe = df!("a" => &[20.0]).unwrap();
        let result = scaler.transform(&probe).unwrap();
        let v = result.column("a").unwrap().f64().unwrap().get(0).unwrap();
        assert!(v.abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_passes_through_centered() {
        let df = df!("a" => &[7.0, 7.0, 7.0]).unwrap();
        let mut scaler = Scaler::new(ScalerKind::Standard);
        let result = scaler.fit_transform(&df, &["a"]).unwrap();

        let col = result.column("a").unwrap().f64().unwrap().clone();
        for v in col.into_no_null_iter() {
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn test_none_scaler_is_identity() {
        let df = df!("a" => &[1.0, 2.0, 3.0]).unwrap();
        let mut scaler = Scaler::new(ScalerKind::None);
        let result = scaler.fit_transform(&df, &["a"]).unwrap();

        let col = result.column("a").unwrap().f64().unwrap().clone();
        assert_eq!(col.get(2), Some(3.0));
    }
}
