//! Integration test: server API endpoints

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use prediksi::inference::{InferenceConfig, InferenceEngine};
use prediksi::schema::FormSchema;
use prediksi::server::{create_router, AppState, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(name)
}

fn test_app() -> axum::Router {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        data_path: fixture("data/onlinefoods.csv"),
        model_path: fixture("models/feedback.json"),
        variant: "delivery-feedback".to_string(),
    };
    let schema = FormSchema::by_name(&config.variant).unwrap();
    let engine = InferenceEngine::from_paths(
        InferenceConfig::default(),
        &config.data_path,
        &config.model_path,
        &schema,
    )
    .unwrap();
    let state = Arc::new(AppState::new(config, schema, engine, chrono::Utc::now()));
    create_router(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_schema_endpoint_lists_fields() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/schema")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["variant"], "delivery-feedback");
    assert_eq!(body["fields"].as_array().unwrap().len(), 10);
    // Categorical fields carry their observed options for the form dropdowns
    let gender = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["name"] == "Gender")
        .unwrap();
    assert!(gender["options"]
        .as_array()
        .unwrap()
        .iter()
        .any(|o| o == "Female"));
}

#[tokio::test]
async fn test_predict_endpoint_returns_label() {
    let app = test_app();
    let payload = serde_json::json!({
        "record": {
            "Age": 24,
            "Gender": "Female",
            "Marital Status": "Single",
            "Occupation": "Student",
            "Monthly Income": "No Income",
            "Educational Qualifications": "Graduate",
            "Family size": 3,
            "latitude": 12.977,
            "longitude": 77.5773,
            "Pin code": 560009
        }
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let label = body["label"].as_str().unwrap();
    assert!(label == "Yes" || label == "No");
}

#[tokio::test]
async fn test_predict_endpoint_defaults_unknown_fields() {
    let app = test_app();
    // A sparse record with an unseen category still gets an answer
    let payload = serde_json::json!({
        "record": { "Occupation": "Retired" }
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_predict_rejects_malformed_body() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"no_record_field\": 1}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_batch_predict_rejects_empty() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/predict/batch")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"records\": []}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_root_serves_form() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/train")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
