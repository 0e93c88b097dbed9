//! Pre-trained classifier artifact
//!
//! The classifier is an opaque serialized artifact produced elsewhere and
//! loaded read-only at startup. It carries its own feature-name order and
//! class labels; prediction extracts columns by name from a processed frame,
//! so a layout mismatch surfaces as an error instead of a silent garbage
//! prediction. There is no fitting API in this crate.

use crate::error::{PrediksiError, Result};
use ndarray::{Array2, ArrayView1};
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

fn default_threshold() -> f64 {
    0.5
}

/// Loaded classifier artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classifier {
    /// Display name of the artifact
    pub name: String,
    /// Feature columns, in the order the decision weights expect
    feature_names: Vec<String>,
    /// Class labels; the prediction output is an index into this list
    classes: Vec<String>,
    /// Decision weights: one row for binary artifacts, one row per class
    /// for multiclass artifacts
    weights: Vec<Vec<f64>>,
    /// Per-row intercepts
    intercepts: Vec<f64>,
    /// Sigmoid cutoff for binary artifacts
    #[serde(default = "default_threshold")]
    threshold: f64,
}

impl Classifier {
    /// Load an artifact from a JSON file
    pub fn load(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let classifier: Self = serde_json::from_str(&json)?;
        classifier.validate()?;
        Ok(classifier)
    }

    /// Feature columns the artifact was trained on, in training order
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Ordered class labels
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn is_binary(&self) -> bool {
        self.weights.len() == 1
    }

    /// Predict class indices for every row of a processed frame
    pub fn predict(&self, df: &DataFrame) -> Result<Vec<usize>> {
        let x = self.extract_features(df)?;
        let indices: Vec<usize> = (0..x.nrows())
            .into_par_iter()
            .map(|i| self.decide(x.row(i)))
            .collect();
        Ok(indices)
    }

    /// Predict display labels for every row of a processed frame
    pub fn predict_labels(&self, df: &DataFrame) -> Result<Vec<String>> {
        Ok(self
            .predict(df)?
            .into_iter()
            .map(|i| self.classes[i].clone())
            .collect())
    }

    fn decide(&self, x: ArrayView1<f64>) -> usize {
        if self.is_binary() {
            let score = x.dot(&ArrayView1::from(&self.weights[0])) + self.intercepts[0];
            let prob = 1.0 / (1.0 + (-score).exp());
            usize::from(prob > self.threshold)
        } else {
            self.weights
                .iter()
                .zip(&self.intercepts)
                .map(|(w, b)| x.dot(&ArrayView1::from(w.as_slice())) + b)
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(i, _)| i)
                .unwrap_or(0)
        }
    }

    /// Extract the artifact's feature columns into a row-major matrix,
    /// erroring on any column the frame doesn't carry.
    fn extract_features(&self, df: &DataFrame) -> Result<Array2<f64>> {
        let n_rows = df.height();
        let n_cols = self.feature_names.len();

        let col_data: Vec<Vec<f64>> = self
            .feature_names
            .iter()
            .map(|col_name| {
                let column = df
                    .column(col_name)
                    .map_err(|_| PrediksiError::FeatureNotFound(col_name.clone()))?;
                let casted = column.cast(&DataType::Float64)?;
                let values: Vec<f64> = casted
                    .f64()?
                    .into_iter()
                    .map(|v| v.unwrap_or(0.0))
                    .collect();
                Ok(values)
            })
            .collect::<Result<Vec<Vec<f64>>>>()?;

        let col_refs: Vec<&[f64]> = col_data.iter().map(|c| c.as_slice()).collect();
        Ok(Array2::from_shape_fn((n_rows, n_cols), |(r, c)| {
            col_refs[c][r]
        }))
    }

    fn validate(&self) -> Result<()> {
        if self.feature_names.is_empty() {
            return Err(PrediksiError::InvalidInput(
                "Classifier artifact has no feature names".to_string(),
            ));
        }
        if self.classes.len() < 2 {
            return Err(PrediksiError::InvalidInput(
                "Classifier artifact needs at least two classes".to_string(),
            ));
        }
        let expected_rows = if self.weights.len() == 1 {
            if self.classes.len() != 2 {
                return Err(PrediksiError::ShapeError {
                    expected: "2 classes for a single weight row".to_string(),
                    actual: format!("{} classes", self.classes.len()),
                });
            }
            1
        } else {
            self.classes.len()
        };
        if self.weights.len() != expected_rows || self.intercepts.len() != expected_rows {
            return Err(PrediksiError::ShapeError {
                expected: format!("{expected_rows} weight rows and intercepts"),
                actual: format!(
                    "{} weight rows, {} intercepts",
                    self.weights.len(),
                    self.intercepts.len()
                ),
            });
        }
        for row in &self.weights {
            if row.len() != self.feature_names.len() {
                return Err(PrediksiError::ShapeError {
                    expected: format!("{} weights per row", self.feature_names.len()),
                    actual: format!("{}", row.len()),
                });
            }
        }
        Ok(())
    }
}
