//! IP-based geolocation for signaltrail.
//!
//! The [`GeoResolver`] trait abstracts over location lookup, allowing the
//! logging pipeline to work with the real ip-api.com endpoint or with a
//! fixed location injected from configuration. The [`IpApiResolver`]
//! implementation fetches the caller's public-IP geolocation via `reqwest`
//! with a builder-level timeout; a timeout is treated as a resolution
//! failure like any other.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{Config, FixOverride};
use crate::error::{Error, Result};

/// Accuracy label attached to real IP-based resolutions.
pub const IP_BASED_ACCURACY: &str = "IP-based";

/// Accuracy label attached to fixed override resolutions.
pub const SIMULATED_ACCURACY: &str = "Simulated";

/// A resolved geolocation.
///
/// Produced per resolution attempt and never persisted directly; the
/// logging pipeline turns it into a route point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Free-text descriptor of the resolution's precision source.
    pub accuracy: String,
    /// City name (may be empty).
    pub city: String,
    /// Region or state name (may be empty).
    pub region: String,
    /// Country name (may be empty).
    pub country: String,
}

/// Trait for resolving a best-effort geolocation.
///
/// Implementations take no input: the location is derived from the
/// caller's public IP (or is a configured constant).
#[async_trait::async_trait]
pub trait GeoResolver: Send + Sync {
    /// The name of this resolver (for logging/debugging).
    fn name(&self) -> &'static str;

    /// Resolve the current location.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails, times out, or the service
    /// reports that it could not resolve a location.
    async fn resolve(&self) -> Result<GeoFix>;
}

/// Response payload of the ip-api.com JSON endpoint.
///
/// Only the fields we consume are deserialized; the feed carries more.
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
    #[serde(default)]
    city: String,
    #[serde(rename = "regionName", default)]
    region_name: String,
    #[serde(default)]
    country: String,
}

/// Resolver backed by the ip-api.com JSON endpoint.
///
/// Uses a reusable `reqwest::Client` with connection pooling and a
/// request timeout.
#[derive(Debug, Clone)]
pub struct IpApiResolver {
    /// Reusable HTTP client with connection pooling.
    http: reqwest::Client,

    /// URL of the geolocation endpoint.
    endpoint: String,
}

impl IpApiResolver {
    /// Create a resolver for the given endpoint with the given timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// Convert a service response into a fix, or a failure if the service
    /// reported one.
    fn fix_from_response(response: IpApiResponse) -> Result<GeoFix> {
        if response.status != "success" {
            return Err(Error::geolocation_failed(
                response
                    .message
                    .unwrap_or_else(|| "service reported failure".to_string()),
            ));
        }

        if !response.lat.is_finite() || !response.lon.is_finite() {
            return Err(Error::geolocation_failed(
                "service returned non-finite coordinates",
            ));
        }

        Ok(GeoFix {
            latitude: response.lat,
            longitude: response.lon,
            accuracy: IP_BASED_ACCURACY.to_string(),
            city: response.city,
            region: response.region_name,
            country: response.country,
        })
    }
}

#[async_trait::async_trait]
impl GeoResolver for IpApiResolver {
    fn name(&self) -> &'static str {
        "ip-api"
    }

    async fn resolve(&self) -> Result<GeoFix> {
        let response = self.http.get(&self.endpoint).send().await?;
        let payload: IpApiResponse = response.json().await?;

        tracing::debug!(status = %payload.status, "geolocation response received");

        Self::fix_from_response(payload)
    }
}

/// Resolver that always returns a fixed location.
#[derive(Debug, Clone)]
pub struct FixedResolver {
    fix: GeoFix,
}

impl FixedResolver {
    /// Create a resolver returning the given fix.
    #[must_use]
    pub fn new(fix: GeoFix) -> Self {
        Self { fix }
    }
}

impl From<&FixOverride> for GeoFix {
    fn from(fix: &FixOverride) -> Self {
        Self {
            latitude: fix.latitude,
            longitude: fix.longitude,
            accuracy: SIMULATED_ACCURACY.to_string(),
            city: fix.city.clone(),
            region: fix.region.clone(),
            country: fix.country.clone(),
        }
    }
}

#[async_trait::async_trait]
impl GeoResolver for FixedResolver {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn resolve(&self) -> Result<GeoFix> {
        Ok(self.fix.clone())
    }
}

/// Build the resolver described by the configuration.
///
/// A configured fix override yields a [`FixedResolver`]; otherwise the
/// real endpoint is used.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn resolver_from_config(config: &Config) -> Result<Box<dyn GeoResolver>> {
    if let Some(fix) = &config.geo.fix_override {
        tracing::info!(city = %fix.city, "using fixed location override");
        return Ok(Box::new(FixedResolver::new(GeoFix::from(fix))));
    }

    let resolver = IpApiResolver::new(config.geo.endpoint.clone(), config.geo_timeout())?;
    Ok(Box::new(resolver))
}
