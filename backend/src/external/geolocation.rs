//! IP geolocation client
//!
//! Integrates with the free ip-api.com endpoint to approximate a caller's
//! city and coordinates. Single attempt, short timeout; the location service
//! substitutes the default location on any failure.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use shared::Location;

use crate::error::{AppError, AppResult};

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// IP geolocation client
#[derive(Clone)]
pub struct GeoIpClient {
    client: Client,
    base_url: String,
}

/// ip-api.com response shape
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    city: Option<String>,
    #[serde(rename = "regionName", default)]
    region_name: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    zip: Option<String>,
}

impl GeoIpClient {
    /// Create a new GeoIpClient
    pub fn new() -> Self {
        Self::with_base_url("http://ip-api.com/json".to_string())
    }

    /// Create a new GeoIpClient with custom base URL (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        Self { client, base_url }
    }

    /// Look up the approximate location of a network address.
    ///
    /// Passing `None` asks the service about the server's own egress address.
    pub async fn lookup(&self, ip_address: Option<&str>) -> AppResult<Location> {
        let url = match ip_address {
            Some(ip) => format!("{}/{}", self.base_url, ip),
            None => format!("{}/", self.base_url),
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Geolocation request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Geolocation API error: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse geolocation response: {}", e))
        })?;

        if data.status != "success" {
            return Err(AppError::ExternalService(format!(
                "Geolocation lookup unsuccessful for {}",
                ip_address.unwrap_or("caller")
            )));
        }

        let default = Location::default();
        Ok(Location {
            city: data.city.unwrap_or(default.city),
            region: data.region_name.unwrap_or(default.region),
            country: data.country.unwrap_or(default.country),
            lat: data.lat.unwrap_or(default.lat),
            lon: data.lon.unwrap_or(default.lon),
            timezone: data.timezone.unwrap_or(default.timezone),
            postal_code: data.zip.unwrap_or_default(),
        })
    }
}

impl Default for GeoIpClient {
    fn default() -> Self {
        Self::new()
    }
}
