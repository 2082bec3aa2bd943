//! Plant knowledge Q&A HTTP handlers

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use validator::Validate;

use shared::Language;

use crate::error::AppError;
use crate::external::GeminiClient;
use crate::services::KnowledgeService;
use crate::AppState;

#[derive(Deserialize, Validate)]
pub struct CareGuideRequest {
    #[validate(length(min = 1, max = 100, message = "Plant name must be 1-100 characters"))]
    pub plant: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_climate")]
    pub climate: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Deserialize, Validate)]
pub struct TreatmentRequest {
    #[validate(length(min = 1, max = 200, message = "Disease name must be 1-200 characters"))]
    pub disease: String,
    #[serde(default = "default_plant")]
    pub plant: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_location() -> String {
    "India".to_string()
}

fn default_climate() -> String {
    "tropical".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_plant() -> String {
    "garden plant".to_string()
}

fn parse_language(code: &str) -> Result<Language, AppError> {
    code.parse::<Language>().map_err(|e| AppError::Validation {
        field: "language".to_string(),
        message: e.to_string(),
    })
}

/// Growing guide for a named plant
pub async fn care_guide(
    State(state): State<AppState>,
    Json(input): Json<CareGuideRequest>,
) -> impl IntoResponse {
    if let Err(e) = input.validate() {
        return AppError::ValidationError(e.to_string()).into_response();
    }
    let language = match parse_language(&input.language) {
        Ok(language) => language,
        Err(e) => return e.into_response(),
    };

    let service = knowledge_service(&state);
    match service
        .care_guide(&input.plant, &input.location, &input.climate, language)
        .await
    {
        Ok(guide) => Json(serde_json::json!({
            "plant": input.plant,
            "care_guide": guide,
            "language": language.code(),
        }))
        .into_response(),
        // Upstream failure comes back as a structured object, not an error status
        Err(message) => Json(serde_json::json!({
            "plant": input.plant,
            "error": message,
        }))
        .into_response(),
    }
}

/// Treatment guidance for a named disease
pub async fn treatment(
    State(state): State<AppState>,
    Json(input): Json<TreatmentRequest>,
) -> impl IntoResponse {
    if let Err(e) = input.validate() {
        return AppError::ValidationError(e.to_string()).into_response();
    }
    let language = match parse_language(&input.language) {
        Ok(language) => language,
        Err(e) => return e.into_response(),
    };

    let service = knowledge_service(&state);
    match service
        .treatment_guide(&input.disease, &input.plant, language)
        .await
    {
        Ok(guide) => Json(serde_json::json!({ "treatment": guide })).into_response(),
        Err(message) => Json(serde_json::json!({
            "disease": input.disease,
            "error": message,
        }))
        .into_response(),
    }
}

fn knowledge_service(state: &AppState) -> KnowledgeService {
    KnowledgeService::new(GeminiClient::new(
        state.config.gemini.api_key.clone(),
        state.config.gemini.model.clone(),
    ))
}
