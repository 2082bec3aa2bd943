//! Disease detection results

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Output of running one crop's classifier on one image
///
/// Classifier failures are values, not errors: an unavailable model or a
/// broken image produces a result with `error` set and zero confidence so
/// callers can distinguish it from a genuine low-confidence prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    pub crop: String,
    pub disease: String,
    pub confidence: f32,
    pub all_predictions: BTreeMap<String, f32>,
    pub is_healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DetectionResult {
    /// Successful prediction for a crop
    pub fn predicted(
        crop: &str,
        disease: &str,
        confidence: f32,
        all_predictions: BTreeMap<String, f32>,
    ) -> Self {
        Self {
            crop: crop.to_string(),
            disease: disease.to_string(),
            confidence,
            all_predictions,
            is_healthy: disease.contains("Healthy"),
            error: None,
        }
    }

    /// The requested crop has no loaded model
    pub fn model_unavailable(crop: &str) -> Self {
        Self {
            crop: crop.to_string(),
            disease: "Unknown".to_string(),
            confidence: 0.0,
            all_predictions: BTreeMap::new(),
            is_healthy: false,
            error: Some(format!("Model not available for {crop}")),
        }
    }

    /// Inference itself failed (unreadable image, bad tensor shape, ...)
    pub fn failed(crop: &str, message: String) -> Self {
        Self {
            crop: crop.to_string(),
            disease: "Error".to_string(),
            confidence: 0.0,
            all_predictions: BTreeMap::new(),
            is_healthy: false,
            error: Some(message),
        }
    }

    /// No crop model produced any prediction during an auto scan
    pub fn undetectable() -> Self {
        Self {
            crop: "unknown".to_string(),
            disease: "Unknown".to_string(),
            confidence: 0.0,
            all_predictions: BTreeMap::new(),
            is_healthy: false,
            error: Some("Could not detect crop type".to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_flag_follows_top_label() {
        let healthy = DetectionResult::predicted("tomato", "Healthy", 0.9, BTreeMap::new());
        assert!(healthy.is_healthy);

        let sick = DetectionResult::predicted("tomato", "Late_blight", 0.8, BTreeMap::new());
        assert!(!sick.is_healthy);
    }

    #[test]
    fn model_unavailable_is_distinguishable_from_low_confidence() {
        let unavailable = DetectionResult::model_unavailable("banana");
        assert!(unavailable.is_error());
        assert_eq!(unavailable.confidence, 0.0);

        let low = DetectionResult::predicted("apple", "Black_rot", 0.01, BTreeMap::new());
        assert!(!low.is_error());
    }

    #[test]
    fn error_field_omitted_from_successful_json() {
        let ok = DetectionResult::predicted("apple", "Healthy", 0.7, BTreeMap::new());
        let json = serde_json::to_value(&ok).unwrap();
        assert!(json.get("error").is_none());
    }
}
