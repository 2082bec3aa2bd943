//! Advice translation HTTP handler

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use validator::Validate;

use shared::Language;

use crate::error::AppError;
use crate::external::GeminiClient;
use crate::services::RecommendationService;
use crate::AppState;

#[derive(Deserialize, Validate)]
pub struct TranslateRequest {
    #[validate(length(min = 1, max = 10000, message = "Text must be 1-10000 characters"))]
    pub text: String,
    pub language: String,
}

/// Translate free advice text into a supported language
pub async fn translate(
    State(state): State<AppState>,
    Json(input): Json<TranslateRequest>,
) -> impl IntoResponse {
    if let Err(e) = input.validate() {
        return AppError::ValidationError(e.to_string()).into_response();
    }

    let language = match input.language.parse::<Language>() {
        Ok(language) => language,
        Err(e) => {
            return AppError::Validation {
                field: "language".to_string(),
                message: e.to_string(),
            }
            .into_response()
        }
    };

    let gemini = GeminiClient::new(
        state.config.gemini.api_key.clone(),
        state.config.gemini.model.clone(),
    );
    let service = RecommendationService::new(gemini);
    let translated = service.translate(&input.text, language).await;

    Json(serde_json::json!({
        "original": input.text,
        "translated": translated,
        "language": language.code(),
    }))
    .into_response()
}
