//! Integration test: feature pipeline against the bundled reference dataset

use prediksi::data::{load_dataframe, select_columns};
use prediksi::preprocessing::FeaturePipeline;
use prediksi::schema::{FieldValue, FormSchema, InputRecord};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(name)
}

fn fitted_pipeline() -> FeaturePipeline {
    let df = load_dataframe(&fixture("data/onlinefoods.csv")).unwrap();
    let schema = FormSchema::delivery_feedback();
    let features = select_columns(&df, &schema.field_names()).unwrap();

    let mut pipeline = FeaturePipeline::new();
    pipeline.fit(&features).unwrap();
    pipeline
}

fn record(fields: &[(&str, FieldValue)]) -> InputRecord {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn test_fit_detects_column_kinds() {
    let pipeline = fitted_pipeline();

    assert_eq!(pipeline.column_order().len(), 10);
    assert!(pipeline.numeric_columns().contains(&"Age".to_string()));
    assert!(pipeline.numeric_columns().contains(&"Pin code".to_string()));
    assert!(pipeline
        .categorical_columns()
        .contains(&"Monthly Income".to_string()));
}

#[test]
fn test_known_category_encodes_to_table_lookup() {
    let pipeline = fitted_pipeline();

    // Occupations observed in the reference data, sorted:
    // Employee, House wife, Self Employeed, Student
    let rec = record(&[(
        "Occupation",
        FieldValue::Text("Self Employeed".to_string()),
    )]);
    let row = pipeline.transform_record(&rec).unwrap();
    assert_eq!(
        row.column("Occupation").unwrap().i64().unwrap().get(0),
        Some(2)
    );

    let rec = record(&[("Occupation", FieldValue::Text("Employee".to_string()))]);
    let row = pipeline.transform_record(&rec).unwrap();
    assert_eq!(
        row.column("Occupation").unwrap().i64().unwrap().get(0),
        Some(0)
    );
}

#[test]
fn test_unseen_category_encodes_to_minus_one() {
    let pipeline = fitted_pipeline();

    let rec = record(&[("Occupation", FieldValue::Text("Retired".to_string()))]);
    let row = pipeline.transform_record(&rec).unwrap();
    assert_eq!(
        row.column("Occupation").unwrap().i64().unwrap().get(0),
        Some(-1)
    );
}

#[test]
fn test_missing_field_defaults_to_sentinel() {
    let pipeline = fitted_pipeline();

    // No Gender at all: sentinel "Unknown" is not in the reference data,
    // so the encoded value is the fallback code
    let rec = record(&[("Age", FieldValue::Number(25.0))]);
    let row = pipeline.transform_record(&rec).unwrap();
    assert_eq!(row.column("Gender").unwrap().i64().unwrap().get(0), Some(-1));
}

#[test]
fn test_value_at_reference_mean_scales_to_zero() {
    let pipeline = fitted_pipeline();
    let mean_age = pipeline.feature_stats().get("Age").unwrap().mean.unwrap();

    let rec = record(&[("Age", FieldValue::Number(mean_age))]);
    let row = pipeline.transform_record(&rec).unwrap();
    let scaled = row.column("Age").unwrap().f64().unwrap().get(0).unwrap();
    assert!(scaled.abs() < 1e-9);
}

#[test]
fn test_preprocessing_is_deterministic() {
    let pipeline = fitted_pipeline();

    let rec = record(&[
        ("Age", FieldValue::Number(24.0)),
        ("Gender", FieldValue::Text("Female".to_string())),
        ("Marital Status", FieldValue::Text("Single".to_string())),
        ("Occupation", FieldValue::Text("Student".to_string())),
        ("Monthly Income", FieldValue::Text("No Income".to_string())),
        (
            "Educational Qualifications",
            FieldValue::Text("Graduate".to_string()),
        ),
        ("Family size", FieldValue::Number(3.0)),
        ("latitude", FieldValue::Number(12.977)),
        ("longitude", FieldValue::Number(77.5773)),
        ("Pin code", FieldValue::Number(560009.0)),
    ]);

    let first = pipeline.transform_record(&rec).unwrap();
    let second = pipeline.transform_record(&rec).unwrap();
    assert!(first.equals(&second));
}

#[test]
fn test_processed_row_keeps_schema_order() {
    let pipeline = fitted_pipeline();
    let rec = record(&[("Age", FieldValue::Number(24.0))]);
    let row = pipeline.transform_record(&rec).unwrap();

    let names: Vec<String> = row
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let expected: Vec<String> = FormSchema::delivery_feedback()
        .field_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names, expected);
}

#[test]
fn test_pipeline_save_load_roundtrip() {
    let pipeline = fitted_pipeline();
    let path = std::env::temp_dir().join("prediksi-it-pipeline.json");
    let path_str = path.to_str().unwrap();

    pipeline.save(path_str).unwrap();
    let restored = FeaturePipeline::load(path_str).unwrap();
    std::fs::remove_file(&path).ok();

    let rec = record(&[
        ("Age", FieldValue::Number(30.0)),
        ("Gender", FieldValue::Text("Male".to_string())),
    ]);
    assert!(restored
        .transform_record(&rec)
        .unwrap()
        .equals(&pipeline.transform_record(&rec).unwrap()));
}
