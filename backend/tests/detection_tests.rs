//! Detection result tests
//!
//! Covers the error-valued detection contract and the highest-confidence
//! selection used by automatic crop scanning.

use proptest::prelude::*;
use std::collections::BTreeMap;

use shared::{predictions_sum_valid, validate_confidence, Crop, DetectionResult};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Successful detections carry the full probability map
    #[test]
    fn test_predicted_detection_fields() {
        let mut predictions = BTreeMap::new();
        predictions.insert("Healthy".to_string(), 0.9_f32);
        predictions.insert("Late_blight".to_string(), 0.1_f32);

        let result = DetectionResult::predicted("potato", "Healthy", 0.9, predictions);
        assert_eq!(result.crop, "potato");
        assert!(result.is_healthy);
        assert!(!result.is_error());
        assert!(predictions_sum_valid(&result));
    }

    /// Error results never carry confidence or predictions
    #[test]
    fn test_error_results_are_inert() {
        for result in [
            DetectionResult::model_unavailable("tomato"),
            DetectionResult::failed("tomato", "decode error".to_string()),
            DetectionResult::undetectable(),
        ] {
            assert!(result.is_error());
            assert_eq!(result.confidence, 0.0);
            assert!(result.all_predictions.is_empty());
        }
    }

    /// The undetectable result uses the reserved crop name
    #[test]
    fn test_undetectable_crop_name() {
        let result = DetectionResult::undetectable();
        assert_eq!(result.crop, "unknown");
        assert!(result.error.unwrap().contains("Could not detect"));
    }

    /// Disease labels containing Healthy mark the plant healthy
    #[test]
    fn test_healthy_flag_follows_label() {
        let healthy =
            DetectionResult::predicted("corn", "Healthy", 0.8, BTreeMap::new());
        let sick =
            DetectionResult::predicted("corn", "Common_rust", 0.8, BTreeMap::new());
        assert!(healthy.is_healthy);
        assert!(!sick.is_healthy);
    }

    /// Every supported crop knows a Healthy class
    #[test]
    fn test_all_crops_have_healthy_class() {
        for crop in Crop::ALL {
            assert!(crop.class_names().contains(&"Healthy"));
        }
    }
}

// ============================================================================
// Property Tests
// ============================================================================

/// Mirror of the auto-detection scan: keep strictly higher confidence
fn pick_best(results: Vec<DetectionResult>) -> DetectionResult {
    let mut best: Option<DetectionResult> = None;
    for result in results {
        if result.is_error() {
            continue;
        }
        let improves = best
            .as_ref()
            .map(|b| result.confidence > b.confidence)
            .unwrap_or(true);
        if improves {
            best = Some(result);
        }
    }
    best.unwrap_or_else(DetectionResult::undetectable)
}

fn confidence_strategy() -> impl Strategy<Value = f32> {
    0.0_f32..=1.0_f32
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Confidence values inside the unit interval always validate
    #[test]
    fn prop_confidence_in_unit_interval_validates(c in confidence_strategy()) {
        prop_assert!(validate_confidence(c).is_ok());
    }

    /// Confidence values outside the unit interval never validate
    #[test]
    fn prop_confidence_outside_unit_interval_rejected(c in 1.0001_f32..100.0) {
        prop_assert!(validate_confidence(c).is_err());
        prop_assert!(validate_confidence(-c).is_err());
    }

    /// Selection returns the maximum confidence among successful results
    #[test]
    fn prop_selection_keeps_maximum(confidences in prop::collection::vec(confidence_strategy(), 1..9)) {
        let results: Vec<DetectionResult> = confidences
            .iter()
            .map(|&c| DetectionResult::predicted("tomato", "Healthy", c, BTreeMap::new()))
            .collect();
        let max = confidences.iter().cloned().fold(f32::MIN, f32::max);

        let best = pick_best(results);
        prop_assert!(!best.is_error());
        prop_assert_eq!(best.confidence, max);
    }

    /// Error results never win the scan
    #[test]
    fn prop_errors_never_selected(c in confidence_strategy()) {
        let results = vec![
            DetectionResult::model_unavailable("apple"),
            DetectionResult::predicted("tomato", "Healthy", c, BTreeMap::new()),
            DetectionResult::failed("grape", "bad image".to_string()),
        ];
        let best = pick_best(results);
        prop_assert_eq!(best.crop, "tomato");
    }

    /// A scan with only error results is undetectable
    #[test]
    fn prop_all_errors_yield_undetectable(n in 1usize..8) {
        let results: Vec<DetectionResult> =
            (0..n).map(|_| DetectionResult::model_unavailable("pepper")).collect();
        let best = pick_best(results);
        prop_assert!(best.is_error());
        prop_assert_eq!(best.crop, "unknown");
    }
}
