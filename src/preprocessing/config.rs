//! Preprocessing configuration

use super::{ImputeStrategy, ScalerKind};
use serde::{Deserialize, Serialize};

/// Configuration for the feature pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    /// Strategy for missing numeric values in the reference data and in
    /// submitted records
    pub numeric_impute_strategy: ImputeStrategy,

    /// Strategy for missing categorical values. The default substitutes the
    /// sentinel string, so absent form fields flow through the encoder
    /// rather than rejecting the record.
    pub categorical_impute_strategy: ImputeStrategy,

    /// Scaling applied to numeric columns
    pub scaler: ScalerKind,

    /// Sentinel substituted for a missing categorical field
    pub missing_category: String,

    /// Code emitted for a category the encoder never saw at fit time
    pub unseen_code: i64,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            numeric_impute_strategy: ImputeStrategy::Mean,
            categorical_impute_strategy: ImputeStrategy::ConstantString("Unknown".to_string()),
            scaler: ScalerKind::Standard,
            missing_category: "Unknown".to_string(),
            unseen_code: -1,
        }
    }
}

impl PreprocessingConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the numeric impute strategy
    pub fn with_numeric_impute(mut self, strategy: ImputeStrategy) -> Self {
        self.numeric_impute_strategy = strategy;
        self
    }

    /// Builder method to set the scaler
    pub fn with_scaler(mut self, scaler: ScalerKind) -> Self {
        self.scaler = scaler;
        self
    }

    /// Builder method to set the missing-category sentinel
    pub fn with_missing_category(mut self, sentinel: &str) -> Self {
        self.missing_category = sentinel.to_string();
        self.categorical_impute_strategy = ImputeStrategy::ConstantString(sentinel.to_string());
        self
    }

    /// Builder method to set the unseen-category code
    pub fn with_unseen_code(mut self, code: i64) -> Self {
        self.unseen_code = code;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PreprocessingConfig::default();
        assert_eq!(config.missing_category, "Unknown");
        assert_eq!(config.unseen_code, -1);
        assert!(matches!(config.scaler, ScalerKind::Standard));
    }

    #[test]
    fn test_builder_pattern() {
        let config = PreprocessingConfig::new()
            .with_scaler(ScalerKind::None)
            .with_missing_category("N/A")
            .with_unseen_code(-99);

        assert!(matches!(config.scaler, ScalerKind::None));
        assert_eq!(config.missing_category, "N/A");
        assert_eq!(config.unseen_code, -99);
        assert!(matches!(
            config.categorical_impute_strategy,
            ImputeStrategy::ConstantString(ref s) if s == "N/A"
        ));
    }
}
