//! Prediksi - tabular form prediction service
//!
//! Fits a preprocessing pipeline (label encoding + standard scaling) over a
//! reference dataset at startup, loads a pre-trained classifier artifact,
//! and classifies user-submitted form records.
//!
//! # Modules
//!
//! - [`preprocessing`] - Fitted encoders, scaler, and the feature pipeline
//! - [`model`] - Pre-trained classifier artifact loading and prediction
//! - [`inference`] - Inference engine tying pipeline and classifier together
//! - [`schema`] - Form variants and raw input records
//! - [`server`] - HTTP server with the form UI and REST API
//! - [`cli`] - Command-line interface

pub mod error;

pub mod data;
pub mod model;
pub mod monitoring;
pub mod preprocessing;
pub mod schema;

pub mod inference;

pub mod cli;
pub mod server;

pub use error::{PrediksiError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{PrediksiError, Result};

    pub use crate::preprocessing::{
        FeaturePipeline, ImputeStrategy, Imputer, LabelEncoder, PreprocessingConfig, Scaler,
        ScalerKind,
    };

    pub use crate::inference::{InferenceConfig, InferenceEngine, InferenceStats, Prediction};

    pub use crate::model::Classifier;

    pub use crate::schema::{FieldKind, FieldSpec, FieldValue, FormSchema, InputRecord};
}
