//! Haversine geofence and per-request geofence configuration.

use crate::db::settings;
use crate::errors::{AppError, AppResult};
use crate::models::coordinates::Coordinates;
use rusqlite::Connection;
use std::collections::HashMap;

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

pub const FALLBACK_TARGET_LAT: f64 = 47.9224;
pub const FALLBACK_TARGET_LNG: f64 = 106.9311;
pub const FALLBACK_MAX_DISTANCE: f64 = 10_000.0;

pub const KEY_TARGET_LAT: &str = "gps_target_lat";
pub const KEY_TARGET_LNG: &str = "gps_target_lng";
pub const KEY_MAX_DISTANCE: &str = "gps_max_distance";

/// Great-circle distance on a spherical Earth.
pub fn distance_meters(p1: Coordinates, p2: Coordinates) -> f64 {
    let d_lat = (p2.lat - p1.lat).to_radians();
    let d_lng = (p2.lng - p1.lng).to_radians();

    let a = (d_lat / 2.0).sin() * (d_lat / 2.0).sin()
        + p1.lat.to_radians().cos()
            * p2.lat.to_radians().cos()
            * (d_lng / 2.0).sin()
            * (d_lng / 2.0).sin();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

pub fn is_within(point: Coordinates, target: Coordinates, max_distance: f64) -> bool {
    distance_meters(point, target) <= max_distance
}

/// Where a resolved geofence value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Settings,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofenceConfig {
    pub target: Coordinates,
    pub max_distance: f64,
}

impl Default for GeofenceConfig {
    fn default() -> Self {
        Self {
            target: Coordinates::new(FALLBACK_TARGET_LAT, FALLBACK_TARGET_LNG),
            max_distance: FALLBACK_MAX_DISTANCE,
        }
    }
}

impl GeofenceConfig {
    /// Resolve from a key→value settings map. Each key falls back on its own
    /// when missing or unparsable.
    pub fn from_settings(map: &HashMap<String, String>) -> Self {
        Self::resolve_with_sources(map).0
    }

    /// Read `system_settings` and resolve. No caching: callers invoke this
    /// once per request.
    pub fn load(conn: &Connection) -> AppResult<Self> {
        let map = settings::load_all(conn)?;
        Ok(Self::from_settings(&map))
    }

    pub fn resolve_with_sources(
        map: &HashMap<String, String>,
    ) -> (Self, [(&'static str, f64, ValueSource); 3]) {
        let (lat, lat_src) = read_f64(map, KEY_TARGET_LAT, FALLBACK_TARGET_LAT);
        let (lng, lng_src) = read_f64(map, KEY_TARGET_LNG, FALLBACK_TARGET_LNG);
        let (max, max_src) = read_f64(map, KEY_MAX_DISTANCE, FALLBACK_MAX_DISTANCE);

        (
            Self {
                target: Coordinates::new(lat, lng),
                max_distance: max,
            },
            [
                (KEY_TARGET_LAT, lat, lat_src),
                (KEY_TARGET_LNG, lng, lng_src),
                (KEY_MAX_DISTANCE, max, max_src),
            ],
        )
    }

    /// Fail with `OutOfRange` (distance and limit attached) unless `point`
    /// is inside the fence.
    pub fn check(&self, point: Coordinates) -> AppResult<f64> {
        let distance = distance_meters(point, self.target);
        if distance <= self.max_distance {
            Ok(distance)
        } else {
            Err(AppError::OutOfRange {
                distance,
                max: self.max_distance,
            })
        }
    }
}

fn read_f64(map: &HashMap<String, String>, key: &str, fallback: f64) -> (f64, ValueSource) {
    match map.get(key).map(|v| v.trim().parse::<f64>()) {
        Some(Ok(v)) if v.is_finite() => (v, ValueSource::Settings),
        _ => (fallback, ValueSource::Fallback),
    }
}

/// Validate a settings value before it is stored.
pub fn validate_setting(key: &str, value: &str) -> AppResult<f64> {
    let v: f64 = value
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("'{}' is not a number for {}", value, key)))?;

    let ok = match key {
        KEY_TARGET_LAT => (-90.0..=90.0).contains(&v),
        KEY_TARGET_LNG => (-180.0..=180.0).contains(&v),
        KEY_MAX_DISTANCE => v.is_finite() && v >= 0.0,
        other => return Err(AppError::Config(format!("Unknown setting '{}'", other))),
    };

    if !ok {
        return Err(AppError::Config(format!("{} out of range for {}", v, key)));
    }
    Ok(v)
}
