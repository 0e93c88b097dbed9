//! Application state

use super::ServerConfig;
use crate::inference::InferenceEngine;
use crate::schema::FormSchema;

/// Shared state: fixed at startup, read-only from handlers
pub struct AppState {
    pub config: ServerConfig,
    pub schema: FormSchema,
    pub engine: InferenceEngine,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        schema: FormSchema,
        engine: InferenceEngine,
        started_at: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            config,
            schema,
            engine,
            started_at,
        }
    }

    /// Get system information
    pub fn get_system_info(&self) -> serde_json::Value {
        use sysinfo::System;

        let mut sys = System::new_all();
        sys.refresh_all();

        let cpu_usage: f32 =
            sys.cpus().iter().map(|c| c.cpu_usage()).sum::<f32>() / sys.cpus().len().max(1) as f32;

        serde_json::json!({
            "cpu_count": sys.cpus().len(),
            "cpu_usage": cpu_usage,
            "total_memory_gb": sys.total_memory() as f64 / 1024.0 / 1024.0 / 1024.0,
            "used_memory_gb": sys.used_memory() as f64 / 1024.0 / 1024.0 / 1024.0,
            "memory_usage_percent": (sys.used_memory() as f64 / sys.total_memory().max(1) as f64) * 100.0,
        })
    }
}
