//! Speech-to-text and text-to-speech clients
//!
//! Thin wrappers over the free Google web speech endpoints the platform has
//! always used. Unlike the analysis flow, voice endpoints surface upstream
//! failures to the caller instead of degrading to a fallback.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use shared::Language;

use crate::error::{AppError, AppResult};

const SPEECH_TIMEOUT: Duration = Duration::from_secs(15);

/// Speech services client
#[derive(Clone)]
pub struct SpeechClient {
    client: Client,
    recognize_url: String,
    synthesize_url: String,
}

/// One line of the recognizer's JSON-lines reply
#[derive(Debug, Deserialize)]
struct RecognizeLine {
    #[serde(default)]
    result: Vec<RecognizeResult>,
}

#[derive(Debug, Deserialize)]
struct RecognizeResult {
    #[serde(default)]
    alternative: Vec<RecognizeAlternative>,
}

#[derive(Debug, Deserialize)]
struct RecognizeAlternative {
    transcript: String,
}

impl SpeechClient {
    /// Create a new SpeechClient
    pub fn new() -> Self {
        Self::with_base_urls(
            "http://www.google.com/speech-api/v2/recognize".to_string(),
            "https://translate.google.com/translate_tts".to_string(),
        )
    }

    /// Create a new SpeechClient with custom endpoints (for testing)
    pub fn with_base_urls(recognize_url: String, synthesize_url: String) -> Self {
        let client = Client::builder()
            .timeout(SPEECH_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            recognize_url,
            synthesize_url,
        }
    }

    /// Transcribe a WAV/FLAC audio clip in the given language
    pub async fn speech_to_text(&self, audio: Vec<u8>, language: Language) -> AppResult<String> {
        let url = format!(
            "{}?output=json&lang={}",
            self.recognize_url,
            language.speech_locale()
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "audio/l16; rate=16000")
            .body(audio)
            .send()
            .await
            .map_err(|e| AppError::SpeechError(format!("Recognition request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::SpeechError(format!(
                "Recognition API error: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::SpeechError(format!("Failed to read recognition body: {}", e)))?;

        parse_transcript(&body)
            .ok_or_else(|| AppError::SpeechError("Speech not understood".to_string()))
    }

    /// Synthesize speech for a short text, returning raw MP3 bytes
    pub async fn text_to_speech(&self, text: &str, language: Language) -> AppResult<Vec<u8>> {
        let response = self
            .client
            .get(&self.synthesize_url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language.code()),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| AppError::SpeechError(format!("Synthesis request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::SpeechError(format!(
                "Synthesis API error: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::SpeechError(format!("Failed to read audio body: {}", e)))?;

        Ok(bytes.to_vec())
    }
}

impl Default for SpeechClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull the first non-empty transcript out of a JSON-lines recognizer reply.
///
/// The endpoint streams one JSON object per line and the first line is
/// usually an empty `{"result":[]}` placeholder.
fn parse_transcript(body: &str) -> Option<String> {
    body.lines()
        .filter_map(|line| serde_json::from_str::<RecognizeLine>(line).ok())
        .flat_map(|line| line.result)
        .flat_map(|result| result.alternative)
        .map(|alt| alt.transcript)
        .find(|t| !t.is_empty())
}
