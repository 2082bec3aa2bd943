//! Weather model and advisory tests
//!
//! Covers the tiered snapshot contract, the advisory thresholds, and the
//! rain outlook math over the 3-hourly forecast series.

use proptest::prelude::*;

use shared::{ForecastEntry, WeatherSnapshot, WeatherSource};

/// Advisory thresholds used by the care notes
const HOT_ABOVE: f64 = 35.0;
const COLD_BELOW: f64 = 10.0;
const HUMID_ABOVE: i32 = 80;
const DRY_BELOW: i32 = 30;

/// Forecast slots inside a 24 hour window
const SLOTS_PER_DAY: usize = 8;

fn entry(temp: f64, rain: f64) -> ForecastEntry {
    ForecastEntry {
        time: "2026-06-01 12:00:00".to_string(),
        temp,
        humidity: 60,
        rain,
    }
}

/// Mirror of the outlook rain math: rain anywhere in the first day counts
fn rain_probability(entries: &[ForecastEntry]) -> f64 {
    let rainy = entries
        .iter()
        .take(SLOTS_PER_DAY)
        .filter(|e| e.rain > 0.0)
        .count();
    rainy as f64 / SLOTS_PER_DAY as f64 * 100.0
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// The default snapshot is schema-complete and marked as such
    #[test]
    fn test_default_snapshot_is_marked() {
        let snapshot = WeatherSnapshot::default();
        assert_eq!(snapshot.source, WeatherSource::Default);
        assert_eq!(snapshot.temperature, 25.0);
        assert_eq!(snapshot.humidity, 60);
        assert!(!snapshot.description.is_empty());
    }

    /// Snapshot sources serialize as snake_case tags
    #[test]
    fn test_source_serialization() {
        let json = serde_json::to_string(&WeatherSource::OpenWeatherMap).unwrap();
        assert_eq!(json, "\"open_weather_map\"");
        let json = serde_json::to_string(&WeatherSource::OpenMeteo).unwrap();
        assert_eq!(json, "\"open_meteo\"");
    }

    /// Rain in slot 8 counts, rain in slot 9 does not
    #[test]
    fn test_rain_window_boundary() {
        let mut entries = vec![entry(25.0, 0.0); 7];
        entries.push(entry(25.0, 2.0));
        assert_eq!(rain_probability(&entries), 12.5);

        let mut entries = vec![entry(25.0, 0.0); 8];
        entries.push(entry(25.0, 9.0));
        assert_eq!(rain_probability(&entries), 0.0);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Rain probability is a percentage
    #[test]
    fn prop_rain_probability_bounded(rains in prop::collection::vec(0.0_f64..20.0, 0..16)) {
        let entries: Vec<ForecastEntry> = rains.iter().map(|&r| entry(25.0, r)).collect();
        let p = rain_probability(&entries);
        prop_assert!((0.0..=100.0).contains(&p));
    }

    /// A completely dry series never predicts rain
    #[test]
    fn prop_dry_series_no_rain(n in 0usize..16) {
        let entries: Vec<ForecastEntry> = (0..n).map(|_| entry(25.0, 0.0)).collect();
        prop_assert_eq!(rain_probability(&entries), 0.0);
    }

    /// Temperatures cannot be both hot and cold
    #[test]
    fn prop_thresholds_are_exclusive(temp in -20.0_f64..60.0) {
        let hot = temp > HOT_ABOVE;
        let cold = temp < COLD_BELOW;
        prop_assert!(!(hot && cold));
    }

    /// Humidity extremes are exclusive too
    #[test]
    fn prop_humidity_extremes_exclusive(humidity in 0_i32..=100) {
        let humid = humidity > HUMID_ABOVE;
        let dry = humidity < DRY_BELOW;
        prop_assert!(!(humid && dry));
    }

    /// Snapshots round-trip through JSON with their source intact
    #[test]
    fn prop_snapshot_roundtrip(temp in -40.0_f64..60.0, humidity in 0_i32..=100) {
        let snapshot = WeatherSnapshot {
            temperature: temp,
            feels_like: temp,
            humidity,
            description: "Clear sky".to_string(),
            wind_speed: 3.2,
            pressure: 1008,
            rain: 0.0,
            source: WeatherSource::OpenMeteo,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: WeatherSnapshot = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back.source, WeatherSource::OpenMeteo);
        prop_assert_eq!(back.humidity, humidity);
    }
}
