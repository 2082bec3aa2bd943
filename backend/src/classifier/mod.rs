//! Per-crop disease classifier registry
//!
//! Loads one pre-trained ONNX model per supported crop from disk at startup
//! and runs CPU inference against uploaded leaf photos. The registry is
//! constructed once, then shared read-only through `AppState`; request
//! handlers never mutate it.
//!
//! Model files are expected at `{dir}/{crop}_model.onnx` with an NHWC f32
//! input of the configured square size and a softmax output matching the
//! crop's class list.

use std::collections::HashMap;
use std::path::Path;

use tract_onnx::prelude::*;

use shared::{Crop, DetectionResult};

type OnnxPlan = TypedSimplePlan<TypedModel>;

/// Read-only registry of loaded crop models
pub struct ClassifierRegistry {
    models: HashMap<Crop, OnnxPlan>,
    image_size: u32,
}

impl ClassifierRegistry {
    /// Load every crop model found under `model_dir`.
    ///
    /// Missing or unloadable files are skipped with a warning; the server
    /// keeps serving whichever crops did load.
    pub fn load(model_dir: &str, image_size: u32) -> Self {
        let mut models = HashMap::new();

        for crop in Crop::ALL {
            let path = Path::new(model_dir).join(format!("{}_model.onnx", crop.name()));
            if !path.exists() {
                tracing::warn!("No model file for {} at {}", crop, path.display());
                continue;
            }
            match load_plan(&path, image_size) {
                Ok(plan) => {
                    tracing::info!("Loaded {} model successfully", crop);
                    models.insert(crop, plan);
                }
                Err(e) => {
                    tracing::warn!("Error loading {} model: {}", crop, e);
                }
            }
        }

        Self { models, image_size }
    }

    /// Construct an empty registry (for tests and model-less deployments)
    pub fn empty(image_size: u32) -> Self {
        Self {
            models: HashMap::new(),
            image_size,
        }
    }

    /// Number of successfully loaded models
    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Crops with a usable model, in canonical order
    pub fn loaded_crops(&self) -> Vec<Crop> {
        Crop::ALL
            .into_iter()
            .filter(|c| self.models.contains_key(c))
            .collect()
    }

    /// Classify an image against one crop's model.
    ///
    /// Failures come back as error-valued results with zero confidence,
    /// never as a panic or an `Err`.
    pub fn detect(&self, image_bytes: &[u8], crop: Crop) -> DetectionResult {
        let Some(plan) = self.models.get(&crop) else {
            return DetectionResult::model_unavailable(crop.name());
        };

        match self.run_inference(plan, image_bytes) {
            Ok(scores) => score_result(crop, &scores),
            Err(e) => DetectionResult::failed(crop.name(), e.to_string()),
        }
    }

    /// Classify against a crop given by name; unknown names yield the same
    /// error-valued result as a missing model.
    pub fn detect_named(&self, image_bytes: &[u8], crop_name: &str) -> DetectionResult {
        match crop_name.parse::<Crop>() {
            Ok(crop) => self.detect(image_bytes, crop),
            Err(_) => DetectionResult::model_unavailable(crop_name),
        }
    }

    /// Run every loaded crop model and keep the highest-confidence result.
    ///
    /// A serial scan, not a learned crop identifier; cost grows with the
    /// number of loaded models.
    pub fn detect_auto(&self, image_bytes: &[u8]) -> DetectionResult {
        let mut best: Option<DetectionResult> = None;

        for crop in self.loaded_crops() {
            let result = self.detect(image_bytes, crop);
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

    fn run_inference(&self, plan: &OnnxPlan, image_bytes: &[u8]) -> TractResult<Vec<f32>> {
        let tensor = self.preprocess(image_bytes)?;
        let outputs = plan.run(tvec!(tensor.into()))?;
        let scores = outputs[0].to_array_view::<f32>()?;
        Ok(scores.iter().copied().collect())
    }

    /// Decode, resize to the model's square input, and scale pixels to [0, 1]
    fn preprocess(&self, image_bytes: &[u8]) -> TractResult<Tensor> {
        let size = self.image_size;
        let img = image::load_from_memory(image_bytes)?
            .resize_exact(size, size, image::imageops::FilterType::Triangle)
            .to_rgb8();

        let s = size as usize;
        let input = tract_ndarray::Array4::from_shape_fn((1, s, s, 3), |(_, y, x, c)| {
            f32::from(img[(x as u32, y as u32)][c]) / 255.0
        });

        Ok(input.into())
    }
}

fn load_plan(path: &Path, image_size: u32) -> TractResult<OnnxPlan> {
    let s = image_size as usize;
    tract_onnx::onnx()
        .model_for_path(path)?
        .with_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), tvec!(1, s, s, 3)))?
        .into_optimized()?
        .into_runnable()
}

/// Turn a raw probability vector into a detection result for one crop
fn score_result(crop: Crop, scores: &[f32]) -> DetectionResult {
    let labels = crop.class_names();
    if scores.len() != labels.len() {
        return DetectionResult::failed(
            crop.name(),
            format!(
                "Model produced {} scores for {} known classes",
                scores.len(),
                labels.len()
            ),
        );
    }

    let (top_idx, top_score) = scores
        .iter()
        .copied()
        .enumerate()
        .fold((0usize, f32::MIN), |best, (i, s)| {
            if s > best.1 {
                (i, s)
            } else {
                best
            }
        });

    let all_predictions = labels
        .iter()
        .zip(scores)
        .map(|(label, score)| ((*label).to_string(), *score))
        .collect();

    DetectionResult::predicted(crop.name(), labels[top_idx], top_score, all_predictions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_result_picks_argmax() {
        let scores = [0.1, 0.05, 0.6, 0.25];
        let result = score_result(Crop::Apple, &scores);
        assert_eq!(result.disease, "Cedar_apple_rust");
        assert_eq!(result.confidence, 0.6);
        assert!(!result.is_healthy);
        assert_eq!(result.all_predictions.len(), 4);
    }

    #[test]
    fn score_result_flags_healthy_top_label() {
        let scores = [0.05, 0.95];
        let result = score_result(Crop::Cherry, &scores);
        assert_eq!(result.disease, "Healthy");
        assert!(result.is_healthy);
    }

    #[test]
    fn score_result_rejects_shape_mismatch() {
        let scores = [0.5, 0.5, 0.0];
        let result = score_result(Crop::Cherry, &scores);
        assert!(result.is_error());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn empty_registry_reports_model_unavailable() {
        let registry = ClassifierRegistry::empty(256);
        let result = registry.detect_named(b"not an image", "tomato");
        assert!(result.is_error());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.crop, "tomato");
    }

    #[test]
    fn unknown_crop_name_reports_model_unavailable() {
        let registry = ClassifierRegistry::empty(256);
        let result = registry.detect_named(b"", "banana");
        assert!(result.is_error());
        assert_eq!(result.crop, "banana");
    }

    #[test]
    fn auto_scan_over_empty_registry_is_undetectable() {
        let registry = ClassifierRegistry::empty(256);
        let result = registry.detect_auto(b"");
        assert!(result.is_error());
        assert_eq!(result.crop, "unknown");
    }
}
