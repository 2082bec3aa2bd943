//! Location resolution with a fixed fallback
//!
//! Wraps the geolocation client and absorbs every failure into the default
//! national-centroid location, so callers always get a usable value.

use shared::Location;

use crate::external::GeoIpClient;

/// Location resolver service
#[derive(Clone)]
pub struct LocationService {
    geo: GeoIpClient,
}

impl LocationService {
    pub fn new() -> Self {
        Self {
            geo: GeoIpClient::new(),
        }
    }

    /// Create with a specific client (for testing)
    pub fn with_client(geo: GeoIpClient) -> Self {
        Self { geo }
    }

    /// Resolve a caller address to an approximate location.
    ///
    /// Single attempt; any failure logs and returns [`Location::default`].
    pub async fn resolve(&self, ip_address: Option<&str>) -> Location {
        match self.geo.lookup(ip_address).await {
            Ok(location) => location,
            Err(e) => {
                tracing::warn!("Location resolution failed, using default: {}", e);
                Location::default()
            }
        }
    }
}

impl Default for LocationService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_lookup_falls_back_to_the_default_location() {
        let service =
            LocationService::with_client(GeoIpClient::with_base_url("http://127.0.0.1:9".to_string()));
        let location = service.resolve(Some("203.0.113.9")).await;
        assert_eq!(location, Location::default());
        assert_eq!(location.country, "India");
    }
}
