//! Photo analysis HTTP handler

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Multipart, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};

use shared::Language;

use crate::error::AppError;
use crate::handlers::{client_ip, session_id};
use crate::services::AnalysisService;
use crate::AppState;

/// Analyze an uploaded leaf photo
pub async fn analyze(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut filename = None;
    let mut image_bytes = None;
    let mut crop_type = "auto".to_string();
    let mut language = "en".to_string();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return AppError::ValidationError(format!("Malformed multipart body: {}", e))
                    .into_response()
            }
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                filename = field.file_name().map(str::to_string);
                match field.bytes().await {
                    Ok(bytes) => image_bytes = Some(bytes),
                    Err(e) => {
                        return AppError::ValidationError(format!("Failed to read upload: {}", e))
                            .into_response()
                    }
                }
            }
            Some("crop_type") => {
                if let Ok(text) = field.text().await {
                    crop_type = text;
                }
            }
            Some("language") => {
                if let Ok(text) = field.text().await {
                    language = text;
                }
            }
            _ => {}
        }
    }

    let Some(image_bytes) = image_bytes else {
        return AppError::Validation {
            field: "file".to_string(),
            message: "No file provided".to_string(),
        }
        .into_response();
    };
    let filename = filename.unwrap_or_default();

    let language = match language.parse::<Language>() {
        Ok(language) => language,
        Err(e) => {
            return AppError::Validation {
                field: "language".to_string(),
                message: e.to_string(),
            }
            .into_response()
        }
    };

    let session = session_id(&headers);
    let ip = client_ip(&headers, &addr);
    let service = AnalysisService::new(state);

    match service
        .analyze(&session, Some(&ip), &filename, &image_bytes, &crop_type, language)
        .await
    {
        Ok(response) => Json(response).into_response(),
        Err(e) => e.into_response(),
    }
}
