//! Inference engine implementation

use super::InferenceConfig;
use crate::data;
use crate::error::{PrediksiError, Result};
use crate::model::Classifier;
use crate::monitoring::PerformanceMetrics;
use crate::preprocessing::FeaturePipeline;
use crate::schema::{FormSchema, InputRecord};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// One classified record
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub label: String,
    pub class_index: usize,
}

/// Inference statistics snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceStats {
    pub total_predictions: u64,
    pub error_count: u64,
    pub avg_latency_ms: f64,
    pub p50_latency_ms: f64,
    pub p95_latency_ms: f64,
    pub p99_latency_ms: f64,
    pub uptime_secs: f64,
}

/// Inference engine: fitted pipeline + loaded classifier, read-only after
/// construction.
pub struct InferenceEngine {
    config: InferenceConfig,
    pipeline: Arc<FeaturePipeline>,
    classifier: Arc<Classifier>,
    metrics: Arc<PerformanceMetrics>,
    is_warmed_up: bool,
}

impl std::fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("config", &self.config)
            .field("classifier", &self.classifier.name)
            .field("is_warmed_up", &self.is_warmed_up)
            .finish()
    }
}

impl InferenceEngine {
    /// Create an engine from an already-fitted pipeline and loaded classifier
    pub fn new(
        config: InferenceConfig,
        pipeline: FeaturePipeline,
        classifier: Classifier,
    ) -> Result<Self> {
        if !pipeline.is_fitted() {
            return Err(PrediksiError::NotFitted);
        }
        Self::check_layout(&pipeline, &classifier)?;

        let latency_window = config.latency_window;
        let mut engine = Self {
            config,
            pipeline: Arc::new(pipeline),
            classifier: Arc::new(classifier),
            metrics: Arc::new(PerformanceMetrics::new(latency_window)),
            is_warmed_up: false,
        };
        if engine.config.warmup_on_load {
            engine.warmup()?;
        }
        Ok(engine)
    }

    /// Startup path: load the reference dataset, fit the pipeline over the
    /// schema's fields, load the classifier artifact.
    pub fn from_paths(
        config: InferenceConfig,
        dataset_path: &Path,
        model_path: &Path,
        schema: &FormSchema,
    ) -> Result<Self> {
        let started = Instant::now();

        let df = data::load_dataframe(dataset_path)?;
        let features = data::select_columns(&df, &schema.field_names())?;

        let mut pipeline = FeaturePipeline::new();
        pipeline.fit(&features)?;
        info!(
            dataset = %dataset_path.display(),
            rows = features.height(),
            numeric = pipeline.numeric_columns().len(),
            categorical = pipeline.categorical_columns().len(),
            "Fitted feature pipeline"
        );

        let model_path = model_path
            .to_str()
            .ok_or_else(|| PrediksiError::ConfigError("Invalid model path".to_string()))?;
        let classifier = Classifier::load(model_path)?;
        info!(
            model = %model_path,
            classes = ?classifier.classes(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Loaded classifier artifact"
        );

        Self::new(config, pipeline, classifier)
    }

    /// Classify one raw submitted record.
    ///
    /// Any failure in transform or predict surfaces as a single inference
    /// error carrying the cause; nothing is retried.
    pub fn predict_record(&self, record: &InputRecord) -> Result<Prediction> {
        let start = Instant::now();

        let result = self
            .pipeline
            .transform_record(record)
            .and_then(|row| self.classifier.predict(&row));

        match result {
            Ok(indices) => {
                let class_index = indices[0];
                let label = self.classifier.classes()[class_index].clone();
                let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
                self.metrics.record_latency(elapsed_ms);
                debug!(label = %label, elapsed_ms, "Classified record");
                Ok(Prediction { label, class_index })
            }
            Err(e) => {
                self.metrics.record_error();
                Err(PrediksiError::InferenceError(e.to_string()))
            }
        }
    }

    /// Classify every row of a raw frame, chunked to bound peak memory
    pub fn predict_frame(&self, df: &DataFrame) -> Result<Vec<String>> {
        let mut labels = Vec::with_capacity(df.height());
        let batch = self.config.batch_size;

        let mut offset = 0usize;
        while offset < df.height() {
            let chunk = df.slice(offset as i64, batch);
            let start = Instant::now();
            let result = self
                .pipeline
                .transform(&chunk)
                .and_then(|processed| self.classifier.predict_labels(&processed));
            match result {
                Ok(chunk_labels) => {
                    self.metrics
                        .record_latency(start.elapsed().as_secs_f64() * 1000.0);
                    labels.extend(chunk_labels);
                }
                Err(e) => {
                    self.metrics.record_error();
                    return Err(PrediksiError::InferenceError(e.to_string()));
                }
            }
            offset += batch;
        }

        Ok(labels)
    }

    /// Run one throwaway prediction so first-request latency is honest.
    /// An empty record exercises every default path; a failure here means
    /// the pipeline and artifact disagree and the process should not serve.
    pub fn warmup(&mut self) -> Result<()> {
        let record = InputRecord::new();
        let row = self.pipeline.transform_record(&record)?;
        self.classifier.predict(&row)?;
        self.is_warmed_up = true;
        Ok(())
    }

    pub fn is_warmed_up(&self) -> bool {
        self.is_warmed_up
    }

    /// Get inference statistics snapshot
    pub fn stats(&self) -> InferenceStats {
        InferenceStats {
            total_predictions: self.metrics.total_requests(),
            error_count: self.metrics.total_errors(),
            avg_latency_ms: self.metrics.avg_latency(),
            p50_latency_ms: self.metrics.p50_latency(),
            p95_latency_ms: self.metrics.p95_latency(),
            p99_latency_ms: self.metrics.p99_latency(),
            uptime_secs: self.metrics.uptime_secs(),
        }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &FeaturePipeline {
        &self.pipeline
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// The classifier must not expect a column the pipeline doesn't produce;
    /// catching this at startup beats a garbage prediction later.
    fn check_layout(pipeline: &FeaturePipeline, classifier: &Classifier) -> Result<()> {
        for name in classifier.feature_names() {
            if !pipeline.column_order().contains(name) {
                return Err(PrediksiError::ConfigError(format!(
                    "Classifier expects feature {name:?} which the pipeline does not produce"
                )));
            }
        }
        Ok(())
    }
}
