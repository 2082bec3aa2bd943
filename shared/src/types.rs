//! Common types used across the platform

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Crops with a dedicated disease-classification model
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    Apple,
    Cherry,
    Corn,
    Grape,
    Peach,
    Pepper,
    Potato,
    Strawberry,
    Tomato,
}

impl Crop {
    /// All supported crops, in model-loading order
    pub const ALL: [Crop; 9] = [
        Crop::Apple,
        Crop::Cherry,
        Crop::Corn,
        Crop::Grape,
        Crop::Peach,
        Crop::Pepper,
        Crop::Potato,
        Crop::Strawberry,
        Crop::Tomato,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Crop::Apple => "apple",
            Crop::Cherry => "cherry",
            Crop::Corn => "corn",
            Crop::Grape => "grape",
            Crop::Peach => "peach",
            Crop::Pepper => "pepper",
            Crop::Potato => "potato",
            Crop::Strawberry => "strawberry",
            Crop::Tomato => "tomato",
        }
    }

    /// Ordered class labels matching this crop's model output vector
    pub fn class_names(&self) -> &'static [&'static str] {
        match self {
            Crop::Apple => &["Apple_scab", "Black_rot", "Cedar_apple_rust", "Healthy"],
            Crop::Cherry => &["Powdery_mildew", "Healthy"],
            Crop::Corn => &[
                "Cercospora_leaf_spot",
                "Common_rust",
                "Northern_Leaf_Blight",
                "Healthy",
            ],
            Crop::Grape => &["Black_rot", "Esca", "Leaf_blight", "Healthy"],
            Crop::Peach => &["Bacterial_spot", "Healthy"],
            Crop::Pepper => &["Bacterial_spot", "Healthy"],
            Crop::Potato => &["Early_blight", "Late_blight", "Healthy"],
            Crop::Strawberry => &["Leaf_scorch", "Healthy"],
            Crop::Tomato => &[
                "Bacterial_spot",
                "Early_blight",
                "Late_blight",
                "Leaf_Mold",
                "Septoria_leaf_spot",
                "Spider_mites",
                "Target_Spot",
                "Tomato_Yellow_Leaf_Curl_Virus",
                "Tomato_mosaic_virus",
                "Healthy",
            ],
        }
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Crop {
    type Err = UnknownCrop;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Crop::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCrop(s.to_string()))
    }
}

/// Error for crop names outside the supported set
#[derive(Debug, Clone, thiserror::Error)]
#[error("unsupported crop: {0}")]
pub struct UnknownCrop(pub String);

/// Supported advisory languages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Ta,
    Te,
    Bn,
    Mr,
    Gu,
    Kn,
    Ml,
    Pa,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::En,
        Language::Hi,
        Language::Ta,
        Language::Te,
        Language::Bn,
        Language::Mr,
        Language::Gu,
        Language::Kn,
        Language::Ml,
        Language::Pa,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Ta => "ta",
            Language::Te => "te",
            Language::Bn => "bn",
            Language::Mr => "mr",
            Language::Gu => "gu",
            Language::Kn => "kn",
            Language::Ml => "ml",
            Language::Pa => "pa",
        }
    }

    /// Display name shown to users, native script first where applicable
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "हिंदी (Hindi)",
            Language::Ta => "தமிழ் (Tamil)",
            Language::Te => "తెలుగు (Telugu)",
            Language::Bn => "বাংলা (Bengali)",
            Language::Mr => "मराठी (Marathi)",
            Language::Gu => "ગુજરાતી (Gujarati)",
            Language::Kn => "ಕನ್ನಡ (Kannada)",
            Language::Ml => "മലയാളം (Malayalam)",
            Language::Pa => "ਪੰਜਾਬੀ (Punjabi)",
        }
    }

    /// Regional locale used by the speech services
    pub fn speech_locale(&self) -> &'static str {
        match self {
            Language::En => "en-IN",
            Language::Hi => "hi-IN",
            Language::Ta => "ta-IN",
            Language::Te => "te-IN",
            Language::Bn => "bn-IN",
            Language::Mr => "mr-IN",
            Language::Gu => "gu-IN",
            Language::Kn => "kn-IN",
            Language::Ml => "ml-IN",
            Language::Pa => "pa-IN",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

/// Error for language codes outside the supported set
#[derive(Debug, Clone, thiserror::Error)]
#[error("unsupported language: {0}")]
pub struct UnknownLanguage(pub String);
