//! Caller location resolved from a network address

use serde::{Deserialize, Serialize};

/// Approximate location of the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub city: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
    pub postal_code: String,
}

impl Default for Location {
    /// National centroid used whenever IP resolution fails
    fn default() -> Self {
        Self {
            city: "Unknown".to_string(),
            region: "Unknown".to_string(),
            country: "India".to_string(),
            lat: 20.5937,
            lon: 78.9629,
            timezone: "Asia/Kolkata".to_string(),
            postal_code: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_location_is_india_centroid() {
        let loc = Location::default();
        assert_eq!(loc.country, "India");
        assert_eq!(loc.lat, 20.5937);
        assert_eq!(loc.lon, 78.9629);
        assert_eq!(loc.timezone, "Asia/Kolkata");
        assert!(loc.postal_code.is_empty());
    }
}
