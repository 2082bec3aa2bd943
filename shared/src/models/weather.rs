//! Weather data models

use serde::{Deserialize, Serialize};

/// Which tier produced a weather snapshot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeatherSource {
    /// Primary API (keyed)
    OpenWeatherMap,
    /// Secondary free API
    OpenMeteo,
    /// Static values, both APIs unavailable
    Default,
}

/// Current conditions at the caller's coordinates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: i32,
    pub description: String,
    pub wind_speed: f64,
    pub pressure: i32,
    /// Recent rainfall in mm
    pub rain: f64,
    pub source: WeatherSource,
}

impl Default for WeatherSnapshot {
    /// Static tier-3 snapshot used when every weather API fails
    fn default() -> Self {
        Self {
            temperature: 25.0,
            feels_like: 25.0,
            humidity: 60,
            description: "Partly cloudy".to_string(),
            wind_speed: 5.0,
            pressure: 1013,
            rain: 0.0,
            source: WeatherSource::Default,
        }
    }
}

/// One 3-hour slot of the short-term forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub time: String,
    pub temp: f64,
    pub humidity: i32,
    /// Rainfall over the slot in mm
    pub rain: f64,
}

/// Short-term outlook derived from the primary forecast series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherOutlook {
    /// Any rain in the next ~24h
    pub will_rain: bool,
    /// Share of next-24h slots carrying rain, as a percentage
    pub rain_probability: f64,
    pub avg_temp_24h: f64,
    pub conditions: Vec<ForecastEntry>,
    /// Qualitative care notes derived from thresholds
    pub advice: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_matches_static_tier() {
        let snap = WeatherSnapshot::default();
        assert_eq!(snap.temperature, 25.0);
        assert_eq!(snap.feels_like, 25.0);
        assert_eq!(snap.humidity, 60);
        assert_eq!(snap.description, "Partly cloudy");
        assert_eq!(snap.wind_speed, 5.0);
        assert_eq!(snap.pressure, 1013);
        assert_eq!(snap.rain, 0.0);
        assert_eq!(snap.source, WeatherSource::Default);
    }

    #[test]
    fn source_serializes_snake_case() {
        let json = serde_json::to_string(&WeatherSource::OpenWeatherMap).unwrap();
        assert_eq!(json, "\"open_weather_map\"");
    }
}
