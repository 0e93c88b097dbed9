//! Prediksi HTTP server
//!
//! Serves the single-page prediction form and the REST API around the
//! inference engine. The engine is built once before the listener binds;
//! all shared state is read-only afterwards.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use state::AppState;

use crate::inference::{InferenceConfig, InferenceEngine};
use crate::schema::FormSchema;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_path: PathBuf,
    pub model_path: PathBuf,
    pub variant: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("PREDIKSI_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PREDIKSI_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            data_path: std::env::var("DATA_PATH")
                .unwrap_or_else(|_| "data/onlinefoods.csv".to_string())
                .into(),
            model_path: std::env::var("MODEL_PATH")
                .unwrap_or_else(|_| "models/feedback.json".to_string())
                .into(),
            variant: std::env::var("VARIANT").unwrap_or_else(|_| "delivery-feedback".to_string()),
        }
    }
}

/// Start the server with the given configuration
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();

    let schema = FormSchema::by_name(&config.variant).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown variant {:?} (expected one of {:?})",
            config.variant,
            FormSchema::variants()
        )
    })?;

    info!(
        variant = %config.variant,
        data = %config.data_path.display(),
        model = %config.model_path.display(),
        started_at = %start_time.to_rfc3339(),
        "Initializing inference engine"
    );

    let engine = InferenceEngine::from_paths(
        InferenceConfig::default(),
        &config.data_path,
        &config.model_path,
        &schema,
    )?;

    let state = Arc::new(AppState::new(config.clone(), schema, engine, start_time));
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(
        host = %config.host,
        port = config.port,
        "Prediksi server starting"
    );
    info!(url = %format!("http://{}", addr), "Form UI available");
    info!(url = %format!("http://{}/api/health", addr), "Health endpoint available");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening and ready to accept connections");

    // Graceful shutdown on ctrl+c
    let shutdown_signal = async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        let stop_time = chrono::Utc::now();
        let uptime = stop_time.signed_duration_since(start_time);
        info!(
            stopped_at = %stop_time.to_rfc3339(),
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
