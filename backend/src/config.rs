//! Configuration management for the Garden Advisor backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with GARDEN_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Generative-text API configuration
    pub gemini: GeminiConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,

    /// Upload handling configuration
    pub uploads: UploadConfig,

    /// Classifier model configuration
    pub models: ModelConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    /// API key for the generateContent endpoint
    pub api_key: String,

    /// Model identifier
    pub model: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key; empty means the primary tier is disabled
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Directory uploaded images are stored under
    pub dir: String,

    /// Maximum accepted upload size in bytes
    pub max_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Directory holding the per-crop ONNX models
    pub dir: String,

    /// Square input dimension expected by the models
    pub image_size: u32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("GARDEN_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("gemini.api_key", "")?
            .set_default("gemini.model", "gemini-1.5-flash")?
            .set_default("weather.api_key", "")?
            .set_default("uploads.dir", "uploads")?
            .set_default("uploads.max_bytes", 16 * 1024 * 1024)?
            .set_default("models.dir", "models")?
            .set_default("models.image_size", 256)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (GARDEN_ prefix)
            .add_source(
                Environment::with_prefix("GARDEN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
