//! Voice transcription and synthesis HTTP handlers
//!
//! Audio travels as base64 strings in JSON bodies. These endpoints surface
//! upstream speech failures to the caller instead of degrading.

use axum::{extract::State, response::IntoResponse, Json};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Deserialize;
use validator::Validate;

use shared::Language;

use crate::error::AppError;
use crate::external::SpeechClient;
use crate::AppState;

#[derive(Deserialize, Validate)]
pub struct TranscribeRequest {
    #[validate(length(min = 1, message = "Audio payload is required"))]
    pub audio: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Deserialize, Validate)]
pub struct SynthesizeRequest {
    #[validate(length(min = 1, max = 5000, message = "Text must be 1-5000 characters"))]
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

fn parse_language(code: &str) -> Result<Language, AppError> {
    code.parse::<Language>().map_err(|e| AppError::Validation {
        field: "language".to_string(),
        message: e.to_string(),
    })
}

/// Transcribe a base64 audio clip
pub async fn transcribe(
    State(_state): State<AppState>,
    Json(input): Json<TranscribeRequest>,
) -> impl IntoResponse {
    if let Err(e) = input.validate() {
        return AppError::ValidationError(e.to_string()).into_response();
    }
    let language = match parse_language(&input.language) {
        Ok(language) => language,
        Err(e) => return e.into_response(),
    };

    let audio = match BASE64.decode(&input.audio) {
        Ok(audio) => audio,
        Err(_) => {
            return AppError::Validation {
                field: "audio".to_string(),
                message: "Audio must be valid base64".to_string(),
            }
            .into_response()
        }
    };

    let client = SpeechClient::new();
    match client.speech_to_text(audio, language).await {
        Ok(transcript) => Json(serde_json::json!({
            "transcript": transcript,
            "language": language.code(),
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Synthesize speech for a short text, returning base64 MP3
pub async fn synthesize(
    State(_state): State<AppState>,
    Json(input): Json<SynthesizeRequest>,
) -> impl IntoResponse {
    if let Err(e) = input.validate() {
        return AppError::ValidationError(e.to_string()).into_response();
    }
    let language = match parse_language(&input.language) {
        Ok(language) => language,
        Err(e) => return e.into_response(),
    };

    let client = SpeechClient::new();
    match client.text_to_speech(&input.text, language).await {
        Ok(audio) => Json(serde_json::json!({
            "audio": BASE64.encode(audio),
            "format": "mp3",
            "language": language.code(),
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}
