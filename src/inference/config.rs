//! Inference configuration

use serde::{Deserialize, Serialize};

/// Configuration for the inference engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Rows per chunk when scoring whole files
    pub batch_size: usize,

    /// Rolling window size for latency metrics
    pub latency_window: usize,

    /// Run a throwaway prediction after load so the first real request
    /// doesn't pay first-touch costs
    pub warmup_on_load: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            batch_size: 1024,
            latency_window: 1000,
            warmup_on_load: true,
        }
    }
}

impl InferenceConfig {
    /// Create a new inference configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the batch size
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Builder method to set the latency window
    pub fn with_latency_window(mut self, window: usize) -> Self {
        self.latency_window = window.max(1);
        self
    }

    /// Builder method to disable warmup
    pub fn without_warmup(mut self) -> Self {
        self.warmup_on_load = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InferenceConfig::default();
        assert_eq!(config.batch_size, 1024);
        assert!(config.warmup_on_load);
    }

    #[test]
    fn test_builder_pattern() {
        let config = InferenceConfig::new()
            .with_batch_size(0)
            .with_latency_window(50)
            .without_warmup();

        assert_eq!(config.batch_size, 1);
        assert_eq!(config.latency_window, 50);
        assert!(!config.warmup_on_load);
    }
}
