//! Texture-space geographic coordinates.

use glam::Vec2;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GeoError {
    #[error("coordinate is not finite (lat={lat}, lon={lon})")]
    NonFinite { lat: f64, lon: f64 },
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl GeoCoordinate {
    /// Builds a coordinate, clamping latitude and wrapping longitude into range.
    /// Non-finite components collapse to 0.
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        let lat = if lat_deg.is_finite() { lat_deg.clamp(-90.0, 90.0) } else { 0.0 };
        let lon = if lon_deg.is_finite() { wrap_lon(lon_deg) } else { 0.0 };
        Self { lat_deg: lat, lon_deg: lon }
    }

    /// Builds a coordinate, rejecting anything outside the valid ranges.
    pub fn checked(lat_deg: f64, lon_deg: f64) -> Result<Self, GeoError> {
        if !lat_deg.is_finite() || !lon_deg.is_finite() {
            return Err(GeoError::NonFinite { lat: lat_deg, lon: lon_deg });
        }
        if !(-90.0..=90.0).contains(&lat_deg) {
            return Err(GeoError::LatitudeOutOfRange(lat_deg));
        }
        if !(-180.0..=180.0).contains(&lon_deg) {
            return Err(GeoError::LongitudeOutOfRange(lon_deg));
        }
        Ok(Self { lat_deg, lon_deg })
    }

    /// `lon = u·360 − 180`, `lat = 90 − v·180`; UV is clamped to the unit square.
    pub fn from_uv(uv: Vec2) -> Self {
        let u = f64::from(uv.x).clamp(0.0, 1.0);
        let v = f64::from(uv.y).clamp(0.0, 1.0);
        Self {
            lat_deg: 90.0 - v * 180.0,
            lon_deg: u * 360.0 - 180.0,
        }
    }

    /// Inverse of [`GeoCoordinate::from_uv`].
    pub fn to_uv(self) -> Vec2 {
        Vec2::new(
            ((self.lon_deg + 180.0) / 360.0) as f32,
            ((90.0 - self.lat_deg) / 180.0) as f32,
        )
    }
}

impl std::fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ns = if self.lat_deg >= 0.0 { 'N' } else { 'S' };
        let ew = if self.lon_deg >= 0.0 { 'E' } else { 'W' };
        write!(
            f,
            "{:.2}°{} {:.2}°{}",
            self.lat_deg.abs(),
            ns,
            self.lon_deg.abs(),
            ew
        )
    }
}

fn wrap_lon(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_centre_is_null_island() {
        let g = GeoCoordinate::from_uv(Vec2::new(0.5, 0.5));
        assert!(g.lat_deg.abs() < 1e-9);
        assert!(g.lon_deg.abs() < 1e-9);
    }

    #[test]
    fn corners_hit_range_limits() {
        let nw = GeoCoordinate::from_uv(Vec2::new(0.0, 0.0));
        assert_eq!((nw.lat_deg, nw.lon_deg), (90.0, -180.0));
        let se = GeoCoordinate::from_uv(Vec2::new(1.0, 1.0));
        assert_eq!((se.lat_deg, se.lon_deg), (-90.0, 180.0));
    }

    #[test]
    fn uv_round_trips() {
        for i in 0..=10 {
            for j in 0..=10 {
                let uv = Vec2::new(i as f32 / 10.0, j as f32 / 10.0);
                let back = GeoCoordinate::from_uv(uv).to_uv();
                assert!((back - uv).length() < 1e-6, "{uv:?} -> {back:?}");
            }
        }
    }

    #[test]
    fn from_uv_clamps_outside_unit_square() {
        let g = GeoCoordinate::from_uv(Vec2::new(1.5, -0.25));
        assert_eq!(g.lon_deg, 180.0);
        assert_eq!(g.lat_deg, 90.0);
    }

    #[test]
    fn new_clamps_and_wraps() {
        let g = GeoCoordinate::new(120.0, 190.0);
        assert_eq!(g.lat_deg, 90.0);
        assert!((g.lon_deg + 170.0).abs() < 1e-9);

        let g = GeoCoordinate::new(f64::NAN, -540.0);
        assert_eq!(g.lat_deg, 0.0);
        assert!((g.lon_deg + 180.0).abs() < 1e-9);
    }

    #[test]
    fn checked_rejects_out_of_range() {
        assert!(GeoCoordinate::checked(45.0, 10.0).is_ok());
        assert_eq!(
            GeoCoordinate::checked(91.0, 0.0),
            Err(GeoError::LatitudeOutOfRange(91.0))
        );
        assert!(matches!(
            GeoCoordinate::checked(0.0, f64::INFINITY),
            Err(GeoError::NonFinite { .. })
        ));
    }

    #[test]
    fn display_uses_hemispheres() {
        let g = GeoCoordinate::new(-33.87, 151.21);
        assert_eq!(g.to_string(), "33.87°S 151.21°E");
    }
}
