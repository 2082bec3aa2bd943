//! Recommendation generation via the generative-text API
//!
//! Builds one prompt embedding the detection, weather, and location context
//! plus a suggested JSON schema, and parses the reply tolerantly. Every
//! failure path degrades to the hardcoded fallback recommendation; this
//! service never propagates an upstream error to the analysis flow.

use shared::{DetectionResult, Language, Location, Recommendation, WeatherSnapshot};

use crate::external::GeminiClient;

/// Recommendation generator service
#[derive(Clone)]
pub struct RecommendationService {
    gemini: GeminiClient,
}

impl RecommendationService {
    pub fn new(gemini: GeminiClient) -> Self {
        Self { gemini }
    }

    /// Generate gardening advice for one detection.
    ///
    /// Network failures and unparseable replies both yield the fallback
    /// recommendation built from the detection alone.
    pub async fn generate(
        &self,
        detection: &DetectionResult,
        weather: &WeatherSnapshot,
        location: &Location,
        language: Language,
    ) -> Recommendation {
        let prompt = build_prompt(detection, weather, location, language);

        let reply = match self.gemini.generate_content(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Recommendation generation failed, using fallback: {}", e);
                return Recommendation::fallback(
                    &detection.crop,
                    &detection.disease,
                    detection.is_healthy,
                );
            }
        };

        match serde_json::from_str::<Recommendation>(strip_code_fences(&reply)) {
            Ok(recommendation) => recommendation,
            Err(e) => {
                tracing::warn!("Recommendation reply was not valid JSON ({}), using fallback", e);
                Recommendation::fallback(&detection.crop, &detection.disease, detection.is_healthy)
            }
        }
    }

    /// Translate free text into the target language.
    ///
    /// English is an identity with no network call; failures return the
    /// original text unchanged.
    pub async fn translate(&self, text: &str, language: Language) -> String {
        if language == Language::En {
            return text.to_string();
        }

        let prompt = format!(
            "Translate the following gardening advice to {}. \
Maintain technical terms where appropriate and keep the practical nature of the advice.\n\n\
Text to translate:\n{}\n\n\
Provide only the translation, no additional text.",
            language.display_name(),
            text
        );

        match self.gemini.generate_content(&prompt).await {
            Ok(translated) => translated.trim().to_string(),
            Err(e) => {
                tracing::warn!("Translation failed, returning original text: {}", e);
                text.to_string()
            }
        }
    }
}

/// Compose the advisory prompt with the suggested reply schema
pub fn build_prompt(
    detection: &DetectionResult,
    weather: &WeatherSnapshot,
    location: &Location,
    language: Language,
) -> String {
    let health_status = if detection.is_healthy {
        "Healthy".to_string()
    } else {
        format!("Disease Detected: {}", detection.disease)
    };

    format!(
        r#"You are an expert gardening advisor helping home gardeners and urban farmers in India.

DETECTION RESULTS:
- Crop/Plant: {crop}
- Health Status: {health_status}
- Confidence: {confidence:.1}%

LOCATION & WEATHER:
- Location: {city}, {region}, {country}
- Temperature: {temperature}°C (Feels like {feels_like}°C)
- Humidity: {humidity}%
- Weather: {description}
- Wind Speed: {wind_speed} m/s
- Recent Rainfall: {rain}mm

TARGET AUDIENCE: Home gardeners, balcony gardeners, urban farmers with limited space

INSTRUCTIONS:
1. Provide practical, actionable gardening advice suitable for home/urban settings
2. Focus on organic and sustainable methods
3. Include specific dosage recommendations (e.g., "1 tablespoon per liter")
4. Consider the current weather conditions
5. Give step-by-step guidance that's easy to follow
6. Recommend easily available materials from local garden stores
7. Include prevention tips for future growing
8. Response language: {language}

Please provide recommendations in the following JSON format:
{{
  "summary": "Brief 2-3 sentence overview in simple language",
  "disease_info": {{
    "name": "Disease name or 'Healthy Plant'",
    "severity": "Low/Medium/High or N/A",
    "description": "What is this condition and why it occurs"
  }},
  "immediate_actions": ["Specific action with measurements and timing"],
  "treatment": {{
    "organic_solutions": ["Solution with exact recipe/dosage"],
    "chemical_solutions": ["Product name with exact dosage"],
    "application_schedule": "When and how often to apply"
  }},
  "watering": {{
    "frequency": "How often to water given current weather",
    "amount": "How much water per plant/pot",
    "timing": "Best time of day to water",
    "weather_note": "Adjustments based on current conditions"
  }},
  "fertilization": {{
    "type": "Recommended fertilizer type for home gardens",
    "dosage": "Exact amount per plant/pot",
    "frequency": "How often to fertilize",
    "organic_options": ["Option 1", "Option 2"]
  }},
  "environmental_care": {{
    "sunlight": "Hours needed and positioning",
    "temperature": "Optimal range and current suitability",
    "humidity": "Requirements and how to adjust",
    "spacing": "For container or small garden"
  }},
  "prevention_tips": ["Tip for preventing this issue"],
  "shopping_list": ["Item needed from garden store, with quantity"],
  "timeline": "Expected recovery time or growth schedule",
  "warning_signs": ["Sign to watch for"],
  "local_considerations": "Specific advice for the {region} region",
  "next_steps": "What to do after initial treatment"
}}

Provide ONLY the JSON output, no additional text."#,
        crop = detection.crop,
        health_status = health_status,
        confidence = detection.confidence * 100.0,
        city = location.city,
        region = location.region,
        country = location.country,
        temperature = weather.temperature,
        feels_like = weather.feels_like,
        humidity = weather.humidity,
        description = weather.description,
        wind_speed = weather.wind_speed,
        rain = weather.rain,
        language = language.display_name(),
    )
}

/// Strip optional markdown code fences wrapping a JSON reply
pub fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();

    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn detection() -> DetectionResult {
        DetectionResult::predicted("tomato", "Late_blight", 0.87, BTreeMap::new())
    }

    // An empty API key makes every generate_content call fail without I/O
    fn unconfigured_service() -> RecommendationService {
        RecommendationService::new(GeminiClient::new(
            String::new(),
            "gemini-1.5-flash".to_string(),
        ))
    }

    #[tokio::test]
    async fn generation_failure_falls_back_to_hardcoded_advice() {
        let rec = unconfigured_service()
            .generate(
                &detection(),
                &WeatherSnapshot::default(),
                &Location::default(),
                Language::En,
            )
            .await;
        let summary = rec.summary.expect("fallback carries a summary");
        assert!(summary.contains("tomato"));
        assert!(summary.contains("Late_blight"));
        assert!(!rec.immediate_actions.is_empty());
    }

    #[tokio::test]
    async fn translate_is_identity_for_english() {
        let text = "Water the plants early morning";
        let translated = unconfigured_service().translate(text, Language::En).await;
        assert_eq!(translated, text);
    }

    #[tokio::test]
    async fn failed_translation_returns_the_original_text() {
        let text = "Water the plants early morning";
        let translated = unconfigured_service().translate(text, Language::Hi).await;
        assert_eq!(translated, text);
    }

    #[test]
    fn prompt_embeds_all_context() {
        let prompt = build_prompt(
            &detection(),
            &WeatherSnapshot::default(),
            &Location::default(),
            Language::Hi,
        );
        assert!(prompt.contains("tomato"));
        assert!(prompt.contains("Disease Detected: Late_blight"));
        assert!(prompt.contains("87.0%"));
        assert!(prompt.contains("India"));
        assert!(prompt.contains("Partly cloudy"));
        assert!(prompt.contains("हिंदी (Hindi)"));
        assert!(prompt.contains("ONLY the JSON output"));
    }

    #[test]
    fn prompt_reports_healthy_plants_as_healthy() {
        let healthy = DetectionResult::predicted("apple", "Healthy", 0.95, BTreeMap::new());
        let prompt = build_prompt(
            &healthy,
            &WeatherSnapshot::default(),
            &Location::default(),
            Language::En,
        );
        assert!(prompt.contains("Health Status: Healthy"));
        assert!(!prompt.contains("Disease Detected"));
    }

    #[test]
    fn fences_stripped_from_json_replies() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }
}
