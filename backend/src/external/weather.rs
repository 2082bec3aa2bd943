//! Weather API clients
//!
//! Two independent providers back the tiered weather resolution:
//! OpenWeatherMap (keyed, current conditions plus a 3-hourly forecast) and
//! Open-Meteo (free, current conditions only). Both normalize into the
//! shared [`WeatherSnapshot`] schema; the weather service owns the tier
//! ordering and the static fallback.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use shared::{ForecastEntry, WeatherSnapshot, WeatherSource};

use crate::error::{AppError, AppResult};

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Standard atmospheric pressure, used where a provider reports none
const STANDARD_PRESSURE_HPA: i32 = 1013;

// ---------------------------------------------------------------------------
// OpenWeatherMap (primary tier)
// ---------------------------------------------------------------------------

/// OpenWeatherMap API client
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    main: OwmMain,
    weather: Vec<OwmWeather>,
    wind: OwmWind,
    rain: Option<OwmRain>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
    humidity: i32,
    pressure: i32,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwmRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    list: Vec<OwmForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt_txt: String,
    main: OwmForecastMain,
    rain: Option<OwmForecastRain>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastMain {
    temp: f64,
    humidity: i32,
}

#[derive(Debug, Deserialize)]
struct OwmForecastRain {
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

impl OpenWeatherClient {
    /// Create a new OpenWeatherClient
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://api.openweathermap.org/data/2.5".to_string())
    }

    /// Create a new OpenWeatherClient with custom base URL (for testing)
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            api_key,
            base_url,
        }
    }

    /// Fetch current conditions by GPS coordinates
    pub async fn current(&self, lat: f64, lon: f64) -> AppResult<WeatherSnapshot> {
        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            self.base_url, lat, lon, self.api_key
        );

        let data: OwmCurrentResponse = self.fetch(&url).await?;

        Ok(WeatherSnapshot {
            temperature: data.main.temp,
            feels_like: data.main.feels_like,
            humidity: data.main.humidity,
            description: data
                .weather
                .first()
                .map(|w| w.description.clone())
                .unwrap_or_default(),
            wind_speed: data.wind.speed,
            pressure: data.main.pressure,
            rain: data.rain.and_then(|r| r.one_hour).unwrap_or(0.0),
            source: WeatherSource::OpenWeatherMap,
        })
    }

    /// Fetch the 3-hourly forecast series by GPS coordinates
    pub async fn forecast(&self, lat: f64, lon: f64) -> AppResult<Vec<ForecastEntry>> {
        let url = format!(
            "{}/forecast?lat={}&lon={}&appid={}&units=metric",
            self.base_url, lat, lon, self.api_key
        );

        let data: OwmForecastResponse = self.fetch(&url).await?;

        Ok(data
            .list
            .into_iter()
            .map(|item| ForecastEntry {
                time: item.dt_txt,
                temp: item.main.temp,
                humidity: item.main.humidity,
                rain: item.rain.and_then(|r| r.three_hour).unwrap_or(0.0),
            })
            .collect())
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, url: &str) -> AppResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Weather API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse weather response: {}", e))
        })
    }
}

// ---------------------------------------------------------------------------
// Open-Meteo (secondary tier)
// ---------------------------------------------------------------------------

/// Open-Meteo API client, the free keyless fallback
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    current_weather: OpenMeteoCurrent,
    hourly: OpenMeteoHourly,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoCurrent {
    temperature: f64,
    windspeed: f64,
    weathercode: i32,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoHourly {
    relative_humidity_2m: Vec<i32>,
    precipitation: Vec<f64>,
}

impl OpenMeteoClient {
    /// Create a new OpenMeteoClient
    pub fn new() -> Self {
        Self::with_base_url("https://api.open-meteo.com/v1".to_string())
    }

    /// Create a new OpenMeteoClient with custom base URL (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        Self { client, base_url }
    }

    /// Fetch current conditions by GPS coordinates
    pub async fn current(&self, lat: f64, lon: f64) -> AppResult<WeatherSnapshot> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&current_weather=true&hourly=temperature_2m,relative_humidity_2m,precipitation",
            self.base_url, lat, lon
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Weather API request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Weather API error: {}",
                response.status()
            )));
        }

        let data: OpenMeteoResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse weather response: {}", e))
        })?;

        let current = data.current_weather;
        Ok(WeatherSnapshot {
            temperature: current.temperature,
            // Open-Meteo's basic current block has no feels-like reading
            feels_like: current.temperature,
            humidity: data.hourly.relative_humidity_2m.first().copied().unwrap_or(0),
            description: weather_code_description(current.weathercode).to_string(),
            wind_speed: current.windspeed,
            pressure: STANDARD_PRESSURE_HPA,
            rain: data.hourly.precipitation.first().copied().unwrap_or(0.0),
            source: WeatherSource::OpenMeteo,
        })
    }
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a WMO weather code to a human-readable description
pub fn weather_code_description(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        61 => "Light rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        80 => "Rain showers",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_weather_codes_map_to_descriptions() {
        assert_eq!(weather_code_description(0), "Clear sky");
        assert_eq!(weather_code_description(2), "Partly cloudy");
        assert_eq!(weather_code_description(65), "Heavy rain");
        assert_eq!(weather_code_description(999), "Unknown");
    }

    #[test]
    fn owm_rain_field_parses_numeric_keys() {
        let json = r#"{"1h": 2.5}"#;
        let rain: OwmRain = serde_json::from_str(json).unwrap();
        assert_eq!(rain.one_hour, Some(2.5));
    }

    #[test]
    fn owm_current_normalizes_missing_rain() {
        let json = r#"{
            "main": {"temp": 31.2, "feels_like": 34.0, "humidity": 70, "pressure": 1008},
            "weather": [{"description": "scattered clouds"}],
            "wind": {"speed": 3.4}
        }"#;
        let data: OwmCurrentResponse = serde_json::from_str(json).unwrap();
        assert!(data.rain.is_none());
        assert_eq!(data.main.humidity, 70);
    }
}
