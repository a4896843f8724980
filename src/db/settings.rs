//! Queries over the `system_settings` key/value collection.

use crate::errors::AppResult;
use rusqlite::{Connection, params};
use std::collections::HashMap;

pub fn load_all(conn: &Connection) -> AppResult<HashMap<String, String>> {
    let mut stmt = conn.prepare_cached("SELECT key, value FROM system_settings")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut out = HashMap::new();
    for r in rows {
        let (k, v) = r?;
        out.insert(k, v);
    }
    Ok(out)
}

pub fn set(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO system_settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Remove a key so the fallback applies again. Returns whether it existed.
pub fn unset(conn: &Connection, key: &str) -> AppResult<bool> {
    let n = conn.execute("DELETE FROM system_settings WHERE key = ?1", [key])?;
    Ok(n > 0)
}
