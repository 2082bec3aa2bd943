//! Route definitions for the Garden Advisor backend

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Photo analysis
        .route("/analyze", post(handlers::analysis::analyze))
        // Session history
        .route("/history", get(handlers::history::get_history))
        .route("/detection/:id", get(handlers::history::get_detection))
        .route("/detection/:id/status", put(handlers::history::update_status))
        // Translation
        .route("/translate", post(handlers::translate::translate))
        // Knowledge Q&A
        .nest("/knowledge", knowledge_routes())
        // Voice helpers
        .nest("/voice", voice_routes())
}

fn knowledge_routes() -> Router<AppState> {
    Router::new()
        .route("/care-guide", post(handlers::knowledge::care_guide))
        .route("/treatment", post(handlers::knowledge::treatment))
}

fn voice_routes() -> Router<AppState> {
    Router::new()
        .route("/transcribe", post(handlers::voice::transcribe))
        .route("/synthesize", post(handlers::voice::synthesize))
}
