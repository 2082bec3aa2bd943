//! End-to-end photo analysis orchestration
//!
//! Routes one uploaded leaf photo through the classifier registry, resolves
//! location and weather context, asks for generative advice, and persists
//! the detection and recommendation records. Context lookups degrade to
//! fallback values; only validation, classification, and persistence
//! failures surface as errors.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use shared::{
    validation::is_allowed_image, DetectionResult, Language, Location, WeatherOutlook,
    WeatherSnapshot,
};

use crate::error::{AppError, AppResult};
use crate::external::GeminiClient;
use crate::services::{
    HistoryService, LocationService, RecommendationService, WeatherService,
};
use crate::AppState;

/// Full analysis payload returned to the client
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub detection_id: Uuid,
    pub detection: DetectionResult,
    pub location: Location,
    pub weather: WeatherSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlook: Option<WeatherOutlook>,
    pub recommendations: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// Photo analysis orchestrator
pub struct AnalysisService {
    state: AppState,
    location: LocationService,
    weather: WeatherService,
    recommendation: RecommendationService,
    history: HistoryService,
}

impl AnalysisService {
    pub fn new(state: AppState) -> Self {
        let gemini = GeminiClient::new(
            state.config.gemini.api_key.clone(),
            state.config.gemini.model.clone(),
        );
        Self {
            location: LocationService::new(),
            weather: WeatherService::new(&state.config.weather.api_key),
            recommendation: RecommendationService::new(gemini),
            history: HistoryService::new(state.db.clone()),
            state,
        }
    }

    /// Analyze one uploaded image end to end
    pub async fn analyze(
        &self,
        session_id: &str,
        client_ip: Option<&str>,
        filename: &str,
        image_bytes: &[u8],
        crop_type: &str,
        language: Language,
    ) -> AppResult<AnalyzeResponse> {
        if !is_allowed_image(filename) {
            return Err(AppError::Validation {
                field: "file".to_string(),
                message: "File type not allowed. Use png, jpg or jpeg".to_string(),
            });
        }
        if image_bytes.is_empty() {
            return Err(AppError::Validation {
                field: "file".to_string(),
                message: "Uploaded file is empty".to_string(),
            });
        }

        let image_path = self.save_upload(filename, image_bytes).await?;

        // Context lookups never fail the request; each has its own fallback
        let location = self.location.resolve(client_ip).await;
        let weather = self.weather.current(location.lat, location.lon).await;
        let outlook = self
            .weather
            .outlook(location.lat, location.lon, &weather)
            .await;

        let detection = if crop_type.eq_ignore_ascii_case("auto") {
            self.state.classifier.detect_auto(image_bytes)
        } else {
            self.state.classifier.detect_named(image_bytes, crop_type)
        };
        if detection.is_error() {
            let message = detection
                .error
                .unwrap_or_else(|| "Classification failed".to_string());
            return Err(AppError::ModelUnavailable(message));
        }

        let recommendation = self
            .recommendation
            .generate(&detection, &weather, &location, language)
            .await;

        let record = self
            .history
            .save_detection(session_id, &image_path, &detection, &location, language.code())
            .await?;
        self.history
            .save_recommendation(record.id, &recommendation, &weather)
            .await?;

        let recommendations = serde_json::to_value(&recommendation)
            .map_err(|e| AppError::Internal(format!("Failed to encode recommendation: {}", e)))?;

        Ok(AnalyzeResponse {
            detection_id: record.id,
            detection,
            location,
            weather,
            outlook,
            recommendations,
            timestamp: record.created_at,
        })
    }

    /// Store the upload under a collision-proof name and return its path
    async fn save_upload(&self, filename: &str, bytes: &[u8]) -> AppResult<String> {
        let safe_name = sanitize_filename(filename);
        let stored_name = format!("{}_{}", Uuid::new_v4(), safe_name);
        let path = std::path::Path::new(&self.state.config.uploads.dir).join(stored_name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store upload: {}", e)))?;
        Ok(path.to_string_lossy().into_owned())
    }
}

/// Keep only path-safe characters from a client-supplied filename
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_path_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "......etcpasswd");
        assert_eq!(sanitize_filename("leaf photo.jpg"), "leafphoto.jpg");
        assert_eq!(sanitize_filename("tomato_leaf-1.png"), "tomato_leaf-1.png");
    }
}
