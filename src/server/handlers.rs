//! HTTP request handlers

use std::sync::Arc;
use axum::{
    extract::State,
    response::Html,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::schema::{FieldKind, InputRecord};

use super::error::{Result, ServerError};
use super::state::AppState;

// ============================================================================
// Prediction Handlers
// ============================================================================

#[derive(Deserialize)]
pub struct PredictRequest {
    record: InputRecord,
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<serde_json::Value>> {
    let prediction = state.engine.predict_record(&request.record)?;

    info!(label = %prediction.label, "Prediction served");
    Ok(Json(json!({
        "success": true,
        "label": prediction.label,
        "class_index": prediction.class_index,
    })))
}

#[derive(Deserialize)]
pub struct BatchPredictRequest {
    records: Vec<InputRecord>,
}

pub async fn predict_batch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchPredictRequest>,
) -> Result<Json<serde_json::Value>> {
    if request.records.is_empty() {
        return Err(ServerError::BadRequest(
            "Records array is empty".to_string(),
        ));
    }

    let mut labels = Vec::with_capacity(request.records.len());
    for record in &request.records {
        labels.push(state.engine.predict_record(record)?.label);
    }

    Ok(Json(json!({
        "success": true,
        "labels": labels,
        "count": labels.len(),
    })))
}

pub async fn get_inference_stats(
    State(state): State<Arc<AppState>>,
) -> Json<serde_json::Value> {
    let stats = state.engine.stats();
    Json(json!({ "stats": stats }))
}

// ============================================================================
// Form Metadata Handlers
// ============================================================================

/// The form schema, enriched with what the fitted pipeline observed: category
/// options for dropdowns and numeric ranges for input hints.
pub async fn get_schema(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let pipeline = state.engine.pipeline();
    let stats = pipeline.feature_stats();

    let fields: Vec<serde_json::Value> = state
        .schema
        .fields
        .iter()
        .map(|field| match field.kind {
            FieldKind::Categorical => json!({
                "name": field.name,
                "kind": "categorical",
                "options": pipeline.categories(&field.name).unwrap_or_default(),
            }),
            FieldKind::Numeric => {
                let s = stats.get(&field.name);
                json!({
                    "name": field.name,
                    "kind": "numeric",
                    "min": s.and_then(|s| s.min),
                    "max": s.and_then(|s| s.max),
                    "mean": s.and_then(|s| s.mean),
                })
            }
        })
        .collect();

    Json(json!({
        "variant": state.schema.variant,
        "title": state.schema.title,
        "description": state.schema.description,
        "labels": state.engine.classifier().classes(),
        "fields": fields,
    }))
}

pub async fn get_dataset_info(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let pipeline = state.engine.pipeline();
    let stats = pipeline.feature_stats();
    let rows = stats.values().map(|s| s.count).max().unwrap_or(0);

    Json(json!({
        "path": state.config.data_path.display().to_string(),
        "rows": rows,
        "columns": pipeline.column_order().len(),
        "column_names": pipeline.column_order(),
        "numeric_columns": pipeline.numeric_columns(),
        "categorical_columns": pipeline.categorical_columns(),
        "feature_stats": stats,
    }))
}

// ============================================================================
// System Handlers
// ============================================================================

pub async fn get_system_status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let stats = state.engine.stats();
    Json(json!({
        "system": state.get_system_info(),
        "variant": state.schema.variant,
        "started_at": state.started_at.to_rfc3339(),
        "total_predictions": stats.total_predictions,
        "error_count": stats.error_count,
        "status": "healthy",
    }))
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ============================================================================
// UI Handler
// ============================================================================

pub async fn serve_index() -> Html<String> {
    // Embedded HTML for portability; the page builds its inputs from /api/schema
    Html(EMBEDDED_INDEX_HTML.to_string())
}

const EMBEDDED_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Prediksi</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-900 text-gray-100 min-h-screen">
    <main class="max-w-xl mx-auto px-6 py-10">
        <h1 id="title" class="text-2xl font-bold">Prediksi</h1>
        <p id="description" class="text-sm text-gray-400 mt-2"></p>
        <form id="form" class="mt-8 space-y-4"></form>
        <button id="submit" class="mt-6 w-full bg-blue-600 hover:bg-blue-500 rounded-md py-2 font-semibold">Predict</button>
        <div id="result" class="mt-6 hidden rounded-md border border-gray-700 bg-gray-800 p-4 text-center text-lg"></div>
    </main>
    <script>
        let schema = null;

        async function loadSchema() {
            const res = await fetch('/api/schema');
            schema = await res.json();
            document.getElementById('title').textContent = schema.title;
            document.getElementById('description').textContent = schema.description;

            const form = document.getElementById('form');
            for (const field of schema.fields) {
                const wrap = document.createElement('div');
                const label = document.createElement('label');
                label.className = 'block text-sm text-gray-300 mb-1';
                label.textContent = field.name;
                wrap.appendChild(label);

                let input;
                if (field.kind === 'categorical') {
                    input = document.createElement('select');
                    for (const option of field.options) {
                        const opt = document.createElement('option');
                        opt.value = option;
                        opt.textContent = option;
                        input.appendChild(opt);
                    }
                } else {
                    input = document.createElement('input');
                    input.type = 'number';
                    input.step = 'any';
                    if (field.mean !== null) input.value = field.mean.toFixed(4);
                }
                input.name = field.name;
                input.className = 'w-full rounded-md bg-gray-800 border border-gray-700 px-3 py-2';
                wrap.appendChild(input);
                form.appendChild(wrap);
            }
        }

        async function submit() {
            const record = {};
            for (const field of schema.fields) {
                const input = document.querySelector('[name="' + CSS.escape(field.name) + '"]');
                if (field.kind === 'numeric') {
                    const v = parseFloat(input.value);
                    if (!Number.isNaN(v)) record[field.name] = v;
                } else {
                    record[field.name] = input.value;
                }
            }

            const result = document.getElementById('result');
            result.classList.remove('hidden');
            try {
                const res = await fetch('/api/predict', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ record }),
                });
                const body = await res.json();
                if (body.success) {
                    result.className = result.className.replace('border-red-700', 'border-gray-700');
                    result.textContent = 'Result: ' + body.label;
                } else {
                    result.classList.add('border-red-700');
                    result.textContent = body.message;
                }
            } catch (e) {
                result.classList.add('border-red-700');
                result.textContent = 'Request failed: ' + e;
            }
        }

        document.getElementById('submit').addEventListener('click', submit);
        loadSchema();
    </script>
</body>
</html>
"#;
