//! Generated gardening recommendations
//!
//! The schema below is suggested to the generative model but never enforced
//! on the way back: every field is optional and unrecognized fields are kept
//! in the flattened `extra` map, so a partially conforming reply still
//! deserializes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured gardening advice for one detection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease_info: Option<DiseaseInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub immediate_actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<TreatmentPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watering: Option<WateringPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fertilization: Option<FertilizationPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environmental_care: Option<EnvironmentalCare>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prevention_tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shopping_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warning_signs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_considerations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<String>,
    /// Fields the model invented beyond the suggested schema
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiseaseInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreatmentPlan {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organic_solutions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chemical_solutions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_schedule: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WateringPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FertilizationPlan {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub fertilizer_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organic_options: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentalCare {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunlight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<String>,
}

impl Recommendation {
    /// Hardcoded advice used when the generative API fails or returns
    /// something unparseable; populated from the detection alone.
    pub fn fallback(crop: &str, disease: &str, is_healthy: bool) -> Self {
        let state = if is_healthy {
            "appears healthy".to_string()
        } else {
            format!("may have {disease}")
        };

        Self {
            summary: Some(format!(
                "Your {crop} plant {state}. Keep monitoring and maintain good care practices."
            )),
            disease_info: Some(DiseaseInfo {
                name: Some(if is_healthy {
                    "Healthy Plant".to_string()
                } else {
                    disease.to_string()
                }),
                severity: Some(if is_healthy { "N/A" } else { "Unknown" }.to_string()),
                description: Some(
                    "Unable to generate detailed analysis. Please consult local gardening expert."
                        .to_string(),
                ),
            }),
            immediate_actions: vec![
                "Remove any affected leaves".to_string(),
                "Ensure proper air circulation".to_string(),
                "Check soil moisture".to_string(),
            ],
            treatment: Some(TreatmentPlan {
                organic_solutions: vec![
                    "Neem oil spray".to_string(),
                    "Increase spacing between plants".to_string(),
                ],
                chemical_solutions: vec!["Consult local garden store".to_string()],
                application_schedule: Some("Follow product instructions".to_string()),
            }),
            watering: Some(WateringPlan {
                frequency: Some("Check soil daily".to_string()),
                amount: Some("Water when top inch is dry".to_string()),
                timing: Some("Early morning".to_string()),
                weather_note: Some("Adjust based on weather".to_string()),
            }),
            prevention_tips: vec![
                "Maintain good air circulation".to_string(),
                "Avoid overhead watering".to_string(),
                "Use quality potting mix".to_string(),
            ],
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_mentions_crop_and_disease() {
        let rec = Recommendation::fallback("tomato", "Late_blight", false);
        let summary = rec.summary.unwrap();
        assert!(summary.contains("tomato"));
        assert!(summary.contains("Late_blight"));
        assert_eq!(rec.disease_info.unwrap().name.unwrap(), "Late_blight");
    }

    #[test]
    fn fallback_for_healthy_plant() {
        let rec = Recommendation::fallback("apple", "Healthy", true);
        assert!(rec.summary.unwrap().contains("appears healthy"));
        let info = rec.disease_info.unwrap();
        assert_eq!(info.name.unwrap(), "Healthy Plant");
        assert_eq!(info.severity.unwrap(), "N/A");
    }

    #[test]
    fn tolerates_missing_and_extra_fields() {
        let json = r#"{
            "summary": "ok",
            "made_up_field": {"nested": true},
            "watering": {"frequency": "daily", "color": "blue"}
        }"#;
        let rec: Recommendation = serde_json::from_str(json).unwrap();
        assert_eq!(rec.summary.as_deref(), Some("ok"));
        assert!(rec.extra.contains_key("made_up_field"));
        assert_eq!(rec.watering.unwrap().frequency.as_deref(), Some("daily"));
        assert!(rec.disease_info.is_none());
    }
}
