//! Validation utilities for the Garden Advisor platform

use crate::models::DetectionResult;

/// Upload extensions accepted by the analyze endpoint
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Check an uploaded filename against the allowed image extensions
pub fn is_allowed_image(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Validate that a confidence value is a probability
pub fn validate_confidence(confidence: f32) -> Result<(), &'static str> {
    if !(0.0..=1.0).contains(&confidence) || confidence.is_nan() {
        return Err("Confidence must be within [0, 1]");
    }
    Ok(())
}

/// Check that a successful detection's class probabilities sum to ~1
pub fn predictions_sum_valid(result: &DetectionResult) -> bool {
    if result.is_error() {
        return result.all_predictions.is_empty();
    }
    let total: f32 = result.all_predictions.values().sum();
    (total - 1.0).abs() < 1e-3
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn extension_check_accepts_images_only() {
        assert!(is_allowed_image("leaf.jpg"));
        assert!(is_allowed_image("leaf.JPEG"));
        assert!(is_allowed_image("a.b.png"));
        assert!(!is_allowed_image("leaf.gif"));
        assert!(!is_allowed_image("leaf"));
        assert!(!is_allowed_image(".jpg2"));
    }

    #[test]
    fn confidence_bounds() {
        assert!(validate_confidence(0.0).is_ok());
        assert!(validate_confidence(1.0).is_ok());
        assert!(validate_confidence(1.01).is_err());
        assert!(validate_confidence(-0.1).is_err());
        assert!(validate_confidence(f32::NAN).is_err());
    }

    #[test]
    fn prediction_sums() {
        let mut preds = BTreeMap::new();
        preds.insert("Healthy".to_string(), 0.7_f32);
        preds.insert("Late_blight".to_string(), 0.3_f32);
        let ok = DetectionResult::predicted("potato", "Healthy", 0.7, preds);
        assert!(predictions_sum_valid(&ok));

        let err = DetectionResult::model_unavailable("banana");
        assert!(predictions_sum_valid(&err));
    }
}
