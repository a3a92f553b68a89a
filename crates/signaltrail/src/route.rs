//! Route log parsing and route statistics.
//!
//! The parser here is deliberately simple: it splits rows on commas and
//! strips one layer of surrounding quotes per field. Fields containing
//! embedded commas or quotes are not supported; the writer in
//! [`crate::store`] never produces them from the geolocation feed, and
//! malformed rows degrade to skipped points rather than hard failures.

use serde::Serialize;

use crate::error::{Error, Result};

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Location type recorded when a row omits one.
const UNKNOWN_LOCATION_TYPE: &str = "unknown";

/// A single logged point of the route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePoint {
    /// Latitude in degrees. Always finite.
    pub latitude: f64,
    /// Longitude in degrees. Always finite.
    pub longitude: f64,
    /// Wall-clock timestamp string, `YYYY-MM-DD HH:MM:SS` in UTC.
    pub timestamp: String,
    /// How the location was obtained (e.g. "IP-based", "Simulated").
    pub location_type: String,
    /// City name (may be empty).
    pub city: String,
    /// Region or state name (may be empty).
    pub region: String,
    /// Country name (may be empty).
    pub country: String,
}

/// Role of a point within the rendered route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PointRole {
    /// First point of the route.
    Start,
    /// Last point of a multi-point route.
    End,
    /// Any point between start and end.
    Waypoint,
}

/// Role of the point at `index` in a route of `count` points.
///
/// A single-point route has only a start. In a longer route, the first
/// point is the start, the last is the end, and everything between is a
/// waypoint.
#[must_use]
pub fn point_role(index: usize, count: usize) -> PointRole {
    if index == 0 {
        PointRole::Start
    } else if index == count - 1 {
        PointRole::End
    } else {
        PointRole::Waypoint
    }
}

/// Aggregate statistics over a parsed route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    /// Number of points in the route.
    pub point_count: usize,
    /// Total along-route distance in meters.
    pub distance_meters: f64,
    /// Timestamp of the first point, if any.
    pub start_timestamp: Option<String>,
    /// Timestamp of the last point, if any.
    pub end_timestamp: Option<String>,
}

impl RouteSummary {
    /// Summarize a route by walking consecutive point pairs.
    #[must_use]
    pub fn from_points(points: &[RoutePoint]) -> Self {
        let distance_meters = points
            .windows(2)
            .map(|pair| {
                haversine_distance(
                    pair[0].latitude,
                    pair[0].longitude,
                    pair[1].latitude,
                    pair[1].longitude,
                )
            })
            .sum();

        Self {
            point_count: points.len(),
            distance_meters,
            start_timestamp: points.first().map(|p| p.timestamp.clone()),
            end_timestamp: points.last().map(|p| p.timestamp.clone()),
        }
    }

    /// Total distance in kilometers, rounded to two decimal places.
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        (self.distance_meters / 1000.0 * 100.0).round() / 100.0
    }
}

/// Great-circle distance between two coordinates, in meters.
#[must_use]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Strip one layer of surrounding double quotes and trim whitespace.
fn clean_field(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
}

/// Parse the raw contents of a route log into points.
///
/// Columns are located by header name, case-insensitively, so column
/// order does not matter. Rows whose latitude or longitude fail to parse
/// as finite numbers are skipped; row order is otherwise preserved.
///
/// # Errors
///
/// Returns a schema error if the header is missing the latitude or
/// longitude column.
pub fn parse(contents: &str) -> Result<Vec<RoutePoint>> {
    let mut lines = contents.lines().filter(|line| !line.trim().is_empty());

    let Some(header) = lines.next() else {
        return Ok(Vec::new());
    };

    let columns: Vec<String> = header
        .split(',')
        .map(|field| clean_field(field).to_lowercase())
        .collect();

    let column = |name: &str| columns.iter().position(|c| c == name);

    let lat_idx = column("latitude").ok_or_else(|| Error::schema("missing latitude column"))?;
    let lon_idx = column("longitude").ok_or_else(|| Error::schema("missing longitude column"))?;
    let ts_idx = column("timestamp");
    let type_idx = column("location_type");
    let city_idx = column("city");
    let region_idx = column("region");
    let country_idx = column("country");

    let mut points = Vec::new();
    for line in lines {
        let fields: Vec<&str> = line.split(',').map(clean_field).collect();
        let field = |idx: Option<usize>| idx.and_then(|i| fields.get(i)).copied().unwrap_or("");

        let Some(latitude) = fields.get(lat_idx).and_then(|f| f.parse::<f64>().ok()) else {
            tracing::debug!(row = line, "skipping row with unparseable latitude");
            continue;
        };
        let Some(longitude) = fields.get(lon_idx).and_then(|f| f.parse::<f64>().ok()) else {
            tracing::debug!(row = line, "skipping row with unparseable longitude");
            continue;
        };
        if !latitude.is_finite() || !longitude.is_finite() {
            tracing::debug!(row = line, "skipping row with non-finite coordinates");
            continue;
        }

        let location_type = field(type_idx);
        points.push(RoutePoint {
            latitude,
            longitude,
            timestamp: field(ts_idx).to_string(),
            location_type: if location_type.is_empty() {
                UNKNOWN_LOCATION_TYPE.to_string()
            } else {
                location_type.to_string()
            },
            city: field(city_idx).to_string(),
            region: field(region_idx).to_string(),
            country: field(country_idx).to_string(),
        });
    }

    Ok(points)
}
