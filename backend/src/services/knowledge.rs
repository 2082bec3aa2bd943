//! Plant knowledge Q&A backed by the generative-text API
//!
//! Care guides come back as free text; treatment guides are requested as
//! JSON and parsed tolerantly. When the reply cannot be parsed as JSON the
//! raw text is wrapped in a structured envelope instead of being dropped,
//! so the client always receives something usable.

use serde::Serialize;
use serde_json::Value;

use shared::Language;

use crate::external::GeminiClient;

/// Plant knowledge Q&A service
#[derive(Clone)]
pub struct KnowledgeService {
    gemini: GeminiClient,
}

/// Treatment guide reply, structured when the model cooperates
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TreatmentGuide {
    Structured(Value),
    Unstructured {
        disease_name: String,
        treatment_text: String,
        raw_response: bool,
    },
}

impl KnowledgeService {
    pub fn new(gemini: GeminiClient) -> Self {
        Self { gemini }
    }

    /// Free-text care guide for a plant in the caller's context
    pub async fn care_guide(
        &self,
        plant: &str,
        location: &str,
        climate: &str,
        language: Language,
    ) -> Result<String, String> {
        let prompt = format!(
            "You are a gardening expert. Provide a comprehensive care guide for growing {plant}.\n\n\
Context:\n\
- Location: {location}\n\
- Climate: {climate}\n\n\
Cover: soil preparation, planting, watering schedule, sunlight needs, \
fertilization, common pests and diseases, pruning, and harvesting tips. \
Keep the advice practical for home gardeners with limited space.\n\
Response language: {language}",
            plant = plant,
            location = location,
            climate = climate,
            language = language.display_name(),
        );

        self.gemini
            .generate_content(&prompt)
            .await
            .map(|text| text.trim().to_string())
            .map_err(|e| {
                tracing::warn!("Care guide generation failed: {}", e);
                format!("Could not generate care guide: {}", e)
            })
    }

    /// Treatment guide for a named disease, parsed from the model's JSON
    pub async fn treatment_guide(
        &self,
        disease: &str,
        plant: &str,
        language: Language,
    ) -> Result<TreatmentGuide, String> {
        let prompt = format!(
            r#"You are a plant pathology expert. Provide treatment guidance for "{disease}" affecting {plant}.

Respond with JSON in this format:
{{
  "disease_name": "{disease}",
  "severity": "Low/Medium/High",
  "description": "What causes this disease and how it spreads",
  "symptoms": ["Visible symptom"],
  "organic_treatments": ["Treatment with exact dosage"],
  "chemical_treatments": ["Product with exact dosage"],
  "prevention": ["Prevention measure"],
  "recovery_timeline": "Expected recovery time with treatment"
}}

Response language: {language}
Provide ONLY the JSON output, no additional text."#,
            disease = disease,
            plant = plant,
            language = language.display_name(),
        );

        let reply = self.gemini.generate_content(&prompt).await.map_err(|e| {
            tracing::warn!("Treatment guide generation failed: {}", e);
            format!("Could not generate treatment guide: {}", e)
        })?;

        Ok(parse_treatment_reply(disease, &reply))
    }
}

/// Parse a treatment reply, falling back to a raw-text envelope
fn parse_treatment_reply(disease: &str, reply: &str) -> TreatmentGuide {
    match extract_json_block(reply).and_then(|block| serde_json::from_str::<Value>(block).ok()) {
        Some(mut value) => {
            if let Some(obj) = value.as_object_mut() {
                obj.entry("disease_name")
                    .or_insert_with(|| Value::String(disease.to_string()));
            }
            TreatmentGuide::Structured(value)
        }
        None => TreatmentGuide::Unstructured {
            disease_name: disease.to_string(),
            treatment_text: reply.trim().to_string(),
            raw_response: true,
        },
    }
}

/// Find the JSON payload in a model reply.
///
/// Prefers a fenced ```json block; otherwise takes the outermost brace pair.
pub fn extract_json_block(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let rest = &text[start + 7..];
        if let Some(end) = rest.find("```") {
            return Some(rest[..end].trim());
        }
    }
    if let Some(start) = text.find("```") {
        let rest = &text[start + 3..];
        if let Some(end) = rest.find("```") {
            let block = rest[..end].trim();
            if block.starts_with('{') {
                return Some(block);
            }
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(text[start..=end].trim())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_fenced_json() {
        let reply = "Here you go:\n```json\n{\"severity\": \"High\"}\n```\nHope that helps";
        assert_eq!(extract_json_block(reply), Some("{\"severity\": \"High\"}"));
    }

    #[test]
    fn extracts_bare_braces() {
        let reply = "Sure. {\"severity\": \"Low\"} Good luck!";
        assert_eq!(extract_json_block(reply), Some("{\"severity\": \"Low\"}"));
    }

    #[test]
    fn no_json_yields_none() {
        assert_eq!(extract_json_block("no structured data here"), None);
    }

    #[test]
    fn structured_reply_gains_disease_name() {
        let guide = parse_treatment_reply("Late_blight", "{\"severity\": \"High\"}");
        match guide {
            TreatmentGuide::Structured(value) => {
                assert_eq!(value["disease_name"], "Late_blight");
                assert_eq!(value["severity"], "High");
            }
            TreatmentGuide::Unstructured { .. } => panic!("expected structured guide"),
        }
    }

    #[test]
    fn existing_disease_name_is_kept() {
        let guide = parse_treatment_reply("x", "{\"disease_name\": \"Rust\"}");
        match guide {
            TreatmentGuide::Structured(value) => assert_eq!(value["disease_name"], "Rust"),
            TreatmentGuide::Unstructured { .. } => panic!("expected structured guide"),
        }
    }

    #[test]
    fn prose_reply_becomes_raw_envelope() {
        let guide = parse_treatment_reply("Late_blight", "Apply neem oil weekly.");
        match guide {
            TreatmentGuide::Unstructured {
                disease_name,
                treatment_text,
                raw_response,
            } => {
                assert_eq!(disease_name, "Late_blight");
                assert_eq!(treatment_text, "Apply neem oil weekly.");
                assert!(raw_response);
            }
            TreatmentGuide::Structured(_) => panic!("expected raw envelope"),
        }
    }
}
