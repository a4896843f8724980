use crate::core::clock::Clock;
use crate::core::geofence::{GeofenceConfig, ValueSource, validate_setting};
use crate::db::log::ttlog;
use crate::db::settings;
use crate::errors::AppResult;
use rusqlite::Connection;

/// One effective geofence value and where it came from.
pub struct SettingLine {
    pub key: &'static str,
    pub value: f64,
    pub source: ValueSource,
}

pub struct SettingsLogic;

impl SettingsLogic {
    /// Effective geofence settings as a clock-in would see them right now.
    pub fn effective(conn: &Connection) -> AppResult<Vec<SettingLine>> {
        let map = settings::load_all(conn)?;
        let (_, lines) = GeofenceConfig::resolve_with_sources(&map);
        Ok(lines
            .into_iter()
            .map(|(key, value, source)| SettingLine { key, value, source })
            .collect())
    }

    /// Validate and store a geofence setting; applies from the next request.
    pub fn set(conn: &Connection, clock: &dyn Clock, key: &str, value: &str) -> AppResult<f64> {
        let v = validate_setting(key, value)?;
        settings::set(conn, key, value.trim())?;
        ttlog(conn, clock.now(), "settings", key, &format!("{} = {}", key, v))?;
        Ok(v)
    }

    /// Drop a stored value so the built-in fallback applies again.
    pub fn unset(conn: &Connection, clock: &dyn Clock, key: &str) -> AppResult<bool> {
        let existed = settings::unset(conn, key)?;
        if existed {
            ttlog(conn, clock.now(), "settings", key, &format!("{} reset to default", key))?;
        }
        Ok(existed)
    }
}
