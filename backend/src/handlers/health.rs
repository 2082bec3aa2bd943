//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use shared::Language;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub models_loaded: usize,
    pub supported_crops: Vec<String>,
    pub supported_languages: Vec<String>,
    pub database: String,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Check database connectivity
    let db_status = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected".to_string(),
        Err(_) => "disconnected".to_string(),
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        models_loaded: state.classifier.len(),
        supported_crops: state
            .classifier
            .loaded_crops()
            .iter()
            .map(|c| c.name().to_string())
            .collect(),
        supported_languages: Language::ALL.iter().map(|l| l.code().to_string()).collect(),
        database: db_status,
    })
}
