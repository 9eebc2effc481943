//! Place resolution seam: request/result tickets, the lookup cooldown, the
//! error taxonomy and parsing of the remote geocoding/time payloads.

use crate::geo::GeoCoordinate;
use crate::place::PlaceInfo;
use serde::Deserialize;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Cooldown the remote resolver runs with unless configured otherwise.
pub const DEFAULT_REMOTE_COOLDOWN: Duration = Duration::from_millis(1500);

/// Used when the geocoder reports no country for a coordinate it did resolve.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("service reported an error: {0}")]
    Service(String),
    #[error("response is missing `{0}`")]
    MissingField(&'static str),
    #[error("lookup queue is full")]
    Busy,
    #[error("lookup worker is not running")]
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupRequest {
    pub ticket: u64,
    pub coord: GeoCoordinate,
}

#[derive(Debug)]
pub struct LookupResult {
    pub ticket: u64,
    pub outcome: Result<PlaceInfo, LookupError>,
}

/// Something that turns coordinates into places, possibly asynchronously.
///
/// `submit` must not block the caller; results come back through `poll` in
/// submission order, tagged with the ticket of the request they answer.
pub trait PlaceResolver {
    /// Minimum spacing between submissions. `None` admits one per frame.
    fn cooldown(&self) -> Option<Duration>;

    fn submit(&mut self, request: LookupRequest);

    fn poll(&mut self) -> Option<LookupResult>;

    /// Short label for the HUD.
    fn name(&self) -> &'static str;
}

/// Admits at most one event per window.
#[derive(Debug, Clone)]
pub struct Cooldown {
    window: Option<Duration>,
    last: Option<Instant>,
}

impl Cooldown {
    pub fn new(window: Option<Duration>) -> Self {
        Self { window, last: None }
    }

    /// Returns `true` and restarts the window if `now` is outside it.
    pub fn try_begin(&mut self, now: Instant) -> bool {
        let Some(window) = self.window else {
            self.last = Some(now);
            return true;
        };

        let open = match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= window,
        };
        if open {
            self.last = Some(now);
        }
        open
    }
}

// --- Remote payloads ---

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<ReverseAddress>,
    timezone: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReverseAddress {
    country: Option<String>,
    timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TimeResponse {
    datetime: Option<String>,
}

/// Country and timezone extracted from a reverse-geocoding response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseGeocode {
    pub country: String,
    pub timezone: String,
}

/// Parses a reverse-geocoding body.
///
/// A body carrying `error` or lacking `address` is a failure (open ocean,
/// rate limiting). A missing country reads as [`UNKNOWN_COUNTRY`]; a missing
/// timezone falls back to the nautical zone of the longitude.
pub fn parse_reverse(body: &str, coord: GeoCoordinate) -> Result<ReverseGeocode, LookupError> {
    let resp: ReverseResponse = serde_json::from_str(body)?;
    if let Some(err) = resp.error {
        return Err(LookupError::Service(err));
    }
    let address = resp.address.ok_or(LookupError::MissingField("address"))?;

    let country = address
        .country
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());
    let timezone = address
        .timezone
        .or(resp.timezone)
        .filter(|tz| !tz.trim().is_empty())
        .unwrap_or_else(|| nautical_timezone(coord.lon_deg));

    Ok(ReverseGeocode { country, timezone })
}

/// Parses a time-service body into the zone's wall-clock time (`HH:MM:SS`).
pub fn parse_local_time(body: &str) -> Result<String, LookupError> {
    let resp: TimeResponse = serde_json::from_str(body)?;
    let raw = resp.datetime.ok_or(LookupError::MissingField("datetime"))?;
    let dt = chrono::DateTime::parse_from_rfc3339(&raw)
        .map_err(|e| LookupError::Service(format!("unparseable datetime {raw:?}: {e}")))?;
    Ok(dt.format("%H:%M:%S").to_string())
}

/// IANA `Etc/GMT±N` zone for a longitude. The sign is inverted by IANA
/// convention: 30°E is `Etc/GMT-2`.
pub fn nautical_timezone(lon_deg: f64) -> String {
    let offset = (lon_deg / 15.0).round().clamp(-12.0, 12.0) as i32;
    match offset {
        0 => "Etc/GMT".to_string(),
        h if h > 0 => format!("Etc/GMT-{h}"),
        h => format!("Etc/GMT+{}", -h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(lat: f64, lon: f64) -> GeoCoordinate {
        GeoCoordinate::new(lat, lon)
    }

    #[test]
    fn cooldown_admits_one_per_window() {
        let mut cd = Cooldown::new(Some(Duration::from_millis(1500)));
        let t0 = Instant::now();
        assert!(cd.try_begin(t0));
        assert!(!cd.try_begin(t0 + Duration::from_millis(500)));
        assert!(!cd.try_begin(t0 + Duration::from_millis(1499)));
        assert!(cd.try_begin(t0 + Duration::from_millis(1500)));
        assert!(!cd.try_begin(t0 + Duration::from_millis(2000)));
    }

    #[test]
    fn cooldown_without_window_always_admits() {
        let mut cd = Cooldown::new(None);
        let t0 = Instant::now();
        assert!(cd.try_begin(t0));
        assert!(cd.try_begin(t0));
    }

    #[test]
    fn reverse_with_country_and_timezone() {
        let body = r#"{"address":{"country":"Kenya","timezone":"Africa/Nairobi"}}"#;
        let r = parse_reverse(body, at(0.0, 37.0)).unwrap();
        assert_eq!(r.country, "Kenya");
        assert_eq!(r.timezone, "Africa/Nairobi");
    }

    #[test]
    fn reverse_falls_back_to_top_level_then_nautical_zone() {
        let body = r#"{"address":{"country":"Kenya"},"timezone":"Africa/Nairobi"}"#;
        assert_eq!(parse_reverse(body, at(0.0, 37.0)).unwrap().timezone, "Africa/Nairobi");

        let body = r#"{"address":{"country":"Kenya"}}"#;
        assert_eq!(parse_reverse(body, at(0.0, 37.0)).unwrap().timezone, "Etc/GMT-2");
    }

    #[test]
    fn reverse_without_country_is_unknown() {
        let body = r#"{"address":{"state":"Somewhere"}}"#;
        assert_eq!(parse_reverse(body, at(0.0, 0.0)).unwrap().country, UNKNOWN_COUNTRY);
    }

    #[test]
    fn reverse_failures() {
        let err = parse_reverse(r#"{"error":"Unable to geocode"}"#, at(0.0, -30.0)).unwrap_err();
        assert!(matches!(err, LookupError::Service(_)));

        let err = parse_reverse(r#"{"place_id":1}"#, at(0.0, 0.0)).unwrap_err();
        assert!(matches!(err, LookupError::MissingField("address")));

        let err = parse_reverse("<html>", at(0.0, 0.0)).unwrap_err();
        assert!(matches!(err, LookupError::Malformed(_)));
    }

    #[test]
    fn local_time_keeps_zone_wall_clock() {
        let body = r#"{"datetime":"2024-05-01T14:03:12.123456+03:00","timezone":"Africa/Nairobi"}"#;
        assert_eq!(parse_local_time(body).unwrap(), "14:03:12");
    }

    #[test]
    fn local_time_failures() {
        assert!(matches!(
            parse_local_time(r#"{"timezone":"Etc/UTC"}"#),
            Err(LookupError::MissingField("datetime"))
        ));
        assert!(matches!(
            parse_local_time(r#"{"datetime":"yesterday"}"#),
            Err(LookupError::Service(_))
        ));
    }

    #[test]
    fn nautical_zones() {
        assert_eq!(nautical_timezone(0.0), "Etc/GMT");
        assert_eq!(nautical_timezone(-74.0), "Etc/GMT+5");
        assert_eq!(nautical_timezone(139.7), "Etc/GMT-9");
        assert_eq!(nautical_timezone(180.0), "Etc/GMT-12");
    }
}
