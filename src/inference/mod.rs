//! Inference engine
//!
//! Ties the fitted feature pipeline to the loaded classifier and owns the
//! per-process prediction path.

mod config;
mod engine;

pub use config::InferenceConfig;
pub use engine::{InferenceEngine, InferenceStats, Prediction};
