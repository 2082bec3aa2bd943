//! Detection history HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::handlers::session_id;
use crate::services::HistoryService;
use crate::AppState;

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// Session history, newest first, with per-crop statistics
pub async fn get_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let session = session_id(&headers);
    let service = HistoryService::new(state.db.clone());

    let records = match service.history(&session, query.limit).await {
        Ok(records) => records,
        Err(e) => return e.into_response(),
    };
    let statistics = match service.statistics(Some(&session)).await {
        Ok(statistics) => statistics,
        Err(e) => return e.into_response(),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "session_id": session,
            "history": records,
            "statistics": statistics,
        })),
    )
        .into_response()
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Update a detection's lifecycle status
pub async fn update_status(
    State(state): State<AppState>,
    Path(detection_id): Path<Uuid>,
    Json(input): Json<StatusUpdate>,
) -> impl IntoResponse {
    let service = HistoryService::new(state.db.clone());

    match service.update_status(detection_id, &input.status).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "id": detection_id,
                "status": input.status,
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// One detection with its stored recommendation
pub async fn get_detection(
    State(state): State<AppState>,
    Path(detection_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = HistoryService::new(state.db.clone());

    let detection = match service.get_detection(detection_id).await {
        Ok(detection) => detection,
        Err(e) => return e.into_response(),
    };
    let recommendation = match service.get_recommendation_for(detection_id).await {
        Ok(recommendation) => recommendation,
        Err(e) => return e.into_response(),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "detection": detection,
            "recommendation": recommendation,
        })),
    )
        .into_response()
}
