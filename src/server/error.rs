//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),
}

impl From<crate::error::PrediksiError> for ServerError {
    fn from(err: crate::error::PrediksiError) -> Self {
        use crate::error::PrediksiError;
        match err {
            PrediksiError::IoError(_)
            | PrediksiError::ConfigError(_)
            | PrediksiError::SerializationError(_) => ServerError::Internal(err.to_string()),
            other => ServerError::Prediction(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::Internal(msg) => {
                tracing::error!(detail = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ServerError::Prediction(msg) => {
                // The one user-facing failure taxonomy: the cause is shown
                tracing::error!(detail = %msg, "Prediction error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Prediction failed: {msg}"),
                )
            }
        };

        let body = Json(json!({
            "error": true,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
