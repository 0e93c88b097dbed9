//! Integration test: inference engine end-to-end over the bundled artifacts

use prediksi::data::{load_dataframe, select_columns};
use prediksi::error::PrediksiError;
use prediksi::inference::{InferenceConfig, InferenceEngine};
use prediksi::schema::{FieldValue, FormSchema, InputRecord};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(name)
}

fn delivery_engine() -> InferenceEngine {
    InferenceEngine::from_paths(
        InferenceConfig::default(),
        &fixture("data/onlinefoods.csv"),
        &fixture("models/feedback.json"),
        &FormSchema::delivery_feedback(),
    )
    .unwrap()
}

fn delivery_record() -> InputRecord {
    let mut record = InputRecord::new();
    record.insert("Age".to_string(), FieldValue::Number(24.0));
    record.insert("Gender".to_string(), FieldValue::Text("Female".to_string()));
    record.insert(
        "Marital Status".to_string(),
        FieldValue::Text("Single".to_string()),
    );
    record.insert(
        "Occupation".to_string(),
        FieldValue::Text("Student".to_string()),
    );
    record.insert(
        "Monthly Income".to_string(),
        FieldValue::Text("No Income".to_string()),
    );
    record.insert(
        "Educational Qualifications".to_string(),
        FieldValue::Text("Graduate".to_string()),
    );
    record.insert("Family size".to_string(), FieldValue::Number(3.0));
    record.insert("latitude".to_string(), FieldValue::Number(12.977));
    record.insert("longitude".to_string(), FieldValue::Number(77.5773));
    record.insert("Pin code".to_string(), FieldValue::Number(560009.0));
    record
}

#[test]
fn test_engine_loads_and_warms_up() {
    let engine = delivery_engine();
    assert!(engine.is_warmed_up());
    assert_eq!(engine.classifier().classes(), &["No", "Yes"]);
}

#[test]
fn test_predict_record_returns_known_label() {
    let engine = delivery_engine();
    let prediction = engine.predict_record(&delivery_record()).unwrap();

    assert!(engine
        .classifier()
        .classes()
        .contains(&prediction.label));
    assert!(prediction.class_index < 2);
}

#[test]
fn test_predict_is_deterministic() {
    let engine = delivery_engine();
    let record = delivery_record();

    let first = engine.predict_record(&record).unwrap();
    let second = engine.predict_record(&record).unwrap();
    assert_eq!(first.label, second.label);
    assert_eq!(first.class_index, second.class_index);
}

#[test]
fn test_empty_record_is_never_rejected() {
    let engine = delivery_engine();
    // Every field missing: sentinel and mean defaults carry the record
    // through to a real prediction
    let prediction = engine.predict_record(&InputRecord::new()).unwrap();
    assert!(engine.classifier().classes().contains(&prediction.label));
}

#[test]
fn test_stats_count_predictions() {
    let engine = delivery_engine();
    let before = engine.stats().total_predictions;

    engine.predict_record(&delivery_record()).unwrap();
    engine.predict_record(&delivery_record()).unwrap();

    let stats = engine.stats();
    assert_eq!(stats.total_predictions, before + 2);
    assert_eq!(stats.error_count, 0);
}

#[test]
fn test_ride_fare_batch_prediction() {
    let schema = FormSchema::ride_fare();
    let engine = InferenceEngine::from_paths(
        InferenceConfig::default().with_batch_size(8),
        &fixture("data/uber_fares.csv"),
        &fixture("models/fare.json"),
        &schema,
    )
    .unwrap();
    assert_eq!(engine.config().batch_size, 8);

    let df = load_dataframe(&fixture("data/uber_fares.csv")).unwrap();
    let features = select_columns(&df, &schema.field_names()).unwrap();

    let labels = engine.predict_frame(&features).unwrap();
    assert_eq!(labels.len(), features.height());
    assert!(labels
        .iter()
        .all(|l| l == "tinggi" || l == "rendah"));
}

#[test]
fn test_artifact_pipeline_mismatch_fails_at_startup() {
    // Artifact expecting a feature the delivery pipeline never produces
    let artifact = serde_json::json!({
        "name": "mismatched",
        "feature_names": ["Age", "Vehicle Type"],
        "classes": ["No", "Yes"],
        "weights": [[0.1, 0.2]],
        "intercepts": [0.0],
    });
    let path = std::env::temp_dir().join("prediksi-mismatched-artifact.json");
    std::fs::write(&path, artifact.to_string()).unwrap();

    let result = InferenceEngine::from_paths(
        InferenceConfig::default(),
        &fixture("data/onlinefoods.csv"),
        &path,
        &FormSchema::delivery_feedback(),
    );
    std::fs::remove_file(&path).ok();

    assert!(matches!(result, Err(PrediksiError::ConfigError(_))));
}
