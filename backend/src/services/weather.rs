//! Tiered weather resolution and gardening advisories
//!
//! Resolution order: OpenWeatherMap when a key is configured, then the free
//! Open-Meteo API, then a static default snapshot. Each tier's failure is
//! logged and absorbed; the caller always receives a schema-complete
//! snapshot whose `source` field records the tier that produced it.

use shared::{ForecastEntry, WeatherOutlook, WeatherSnapshot};

use crate::external::{OpenMeteoClient, OpenWeatherClient};

/// Forecast slots per 24 hours (3-hourly series)
const SLOTS_PER_DAY: usize = 8;

/// Weather resolver service
#[derive(Clone)]
pub struct WeatherService {
    primary: Option<OpenWeatherClient>,
    secondary: OpenMeteoClient,
}

impl WeatherService {
    /// Create a WeatherService; an empty API key disables the primary tier
    pub fn new(api_key: &str) -> Self {
        let primary = if api_key.is_empty() {
            None
        } else {
            Some(OpenWeatherClient::new(api_key.to_string()))
        };
        Self {
            primary,
            secondary: OpenMeteoClient::new(),
        }
    }

    /// Create with specific clients (for testing)
    pub fn with_clients(primary: Option<OpenWeatherClient>, secondary: OpenMeteoClient) -> Self {
        Self { primary, secondary }
    }

    /// Resolve current conditions for the coordinates, tier by tier
    pub async fn current(&self, lat: f64, lon: f64) -> WeatherSnapshot {
        if let Some(primary) = &self.primary {
            match primary.current(lat, lon).await {
                Ok(snapshot) => return snapshot,
                Err(e) => {
                    tracing::warn!("Primary weather API failed, trying fallback: {}", e);
                }
            }
        }

        match self.secondary.current(lat, lon).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Fallback weather API failed, using defaults: {}", e);
                WeatherSnapshot::default()
            }
        }
    }

    /// Short-term outlook from the primary forecast series.
    ///
    /// Only the primary tier carries a forecast; without a key, or when the
    /// fetch fails, there is no outlook rather than a fabricated one.
    pub async fn outlook(&self, lat: f64, lon: f64, current: &WeatherSnapshot) -> Option<WeatherOutlook> {
        let primary = self.primary.as_ref()?;
        match primary.forecast(lat, lon).await {
            Ok(entries) => Some(build_outlook(
                entries,
                current.temperature,
                current.humidity,
            )),
            Err(e) => {
                tracing::warn!("Forecast fetch failed, skipping outlook: {}", e);
                None
            }
        }
    }
}

/// Derive the 24-hour outlook and advisory notes from a 3-hourly series
pub fn build_outlook(entries: Vec<ForecastEntry>, temp: f64, humidity: i32) -> WeatherOutlook {
    let day: Vec<ForecastEntry> = entries.into_iter().take(SLOTS_PER_DAY).collect();

    let rainy_slots = day.iter().filter(|e| e.rain > 0.0).count();
    let will_rain = rainy_slots > 0;
    let rain_probability = if day.is_empty() {
        0.0
    } else {
        rainy_slots as f64 / SLOTS_PER_DAY as f64 * 100.0
    };
    let avg_temp_24h = if day.is_empty() {
        temp
    } else {
        day.iter().map(|e| e.temp).sum::<f64>() / day.len() as f64
    };

    WeatherOutlook {
        will_rain,
        rain_probability,
        avg_temp_24h,
        advice: weather_advice(temp, humidity, will_rain),
        conditions: day,
    }
}

/// Qualitative care notes from temperature/humidity/rain thresholds.
///
/// The checks are independent and non-exclusive; several notes may fire for
/// the same snapshot.
pub fn weather_advice(temp: f64, humidity: i32, will_rain: bool) -> Vec<String> {
    let mut advice = Vec::new();

    if temp > 35.0 {
        advice.push("Very hot! Water plants early morning or evening. Provide shade.".to_string());
    } else if temp < 10.0 {
        advice.push("Cold weather! Protect sensitive plants. Reduce watering.".to_string());
    }

    if humidity > 80 {
        advice.push(
            "High humidity! Watch for fungal diseases. Ensure good air circulation.".to_string(),
        );
    } else if humidity < 30 {
        advice.push("Low humidity! Mist plants. Check soil moisture frequently.".to_string());
    }

    if will_rain {
        advice.push("Rain expected! Skip watering. Check drainage.".to_string());
    } else {
        advice.push("No rain forecast. Maintain regular watering schedule.".to_string());
    }

    advice
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::WeatherSource;

    // Nothing listens on the discard port, so every request fails fast
    fn unreachable_service() -> WeatherService {
        let primary =
            OpenWeatherClient::with_base_url("test-key".to_string(), "http://127.0.0.1:9".to_string());
        let secondary = OpenMeteoClient::with_base_url("http://127.0.0.1:9".to_string());
        WeatherService::with_clients(Some(primary), secondary)
    }

    #[tokio::test]
    async fn both_tiers_failing_yield_the_static_default() {
        let snapshot = unreachable_service().current(20.59, 78.96).await;
        assert_eq!(snapshot, WeatherSnapshot::default());
        assert_eq!(snapshot.source, WeatherSource::Default);
    }

    #[tokio::test]
    async fn unreachable_forecast_yields_no_outlook() {
        let service = unreachable_service();
        let current = WeatherSnapshot::default();
        assert!(service.outlook(20.59, 78.96, &current).await.is_none());
    }

    #[tokio::test]
    async fn keyless_service_has_no_outlook() {
        let service = WeatherService::new("");
        let current = WeatherSnapshot::default();
        assert!(service.outlook(20.59, 78.96, &current).await.is_none());
    }

    fn entry(temp: f64, humidity: i32, rain: f64) -> ForecastEntry {
        ForecastEntry {
            time: "2026-01-01 09:00:00".to_string(),
            temp,
            humidity,
            rain,
        }
    }

    #[test]
    fn outlook_detects_rain_within_first_day() {
        let mut entries = vec![entry(25.0, 60, 0.0); 7];
        entries.push(entry(24.0, 70, 1.2));
        // Rain beyond the 24h window must not count
        entries.push(entry(24.0, 70, 9.0));

        let outlook = build_outlook(entries, 25.0, 60);
        assert!(outlook.will_rain);
        assert_eq!(outlook.rain_probability, 12.5);
        assert_eq!(outlook.conditions.len(), 8);
    }

    #[test]
    fn outlook_averages_temperature_over_the_window() {
        let entries = vec![
            entry(20.0, 50, 0.0),
            entry(22.0, 50, 0.0),
            entry(24.0, 50, 0.0),
            entry(26.0, 50, 0.0),
        ];
        let outlook = build_outlook(entries, 30.0, 50);
        assert!((outlook.avg_temp_24h - 23.0).abs() < 1e-9);
        assert!(!outlook.will_rain);
    }

    #[test]
    fn empty_series_falls_back_to_current_temperature() {
        let outlook = build_outlook(Vec::new(), 28.5, 55);
        assert_eq!(outlook.avg_temp_24h, 28.5);
        assert_eq!(outlook.rain_probability, 0.0);
        assert!(!outlook.will_rain);
    }

    #[test]
    fn advice_notes_fire_independently() {
        let notes = weather_advice(38.0, 85, true);
        assert_eq!(notes.len(), 3);
        assert!(notes[0].contains("Very hot"));
        assert!(notes[1].contains("High humidity"));
        assert!(notes[2].contains("Rain expected"));
    }

    #[test]
    fn mild_weather_only_notes_watering_schedule() {
        let notes = weather_advice(25.0, 60, false);
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("regular watering"));
    }

    #[test]
    fn cold_and_dry_thresholds() {
        let notes = weather_advice(5.0, 20, false);
        assert!(notes.iter().any(|n| n.contains("Cold weather")));
        assert!(notes.iter().any(|n| n.contains("Low humidity")));
    }

    #[test]
    fn boundary_values_do_not_trigger_extremes() {
        // 35 and 10 are inside the normal band; 80 and 30 likewise
        let notes = weather_advice(35.0, 80, false);
        assert_eq!(notes.len(), 1);
        let notes = weather_advice(10.0, 30, false);
        assert_eq!(notes.len(), 1);
    }
}
