use crate::errors::AppResult;
use chrono::{DateTime, FixedOffset};
use rusqlite::Connection;
use rusqlite::params;

/// Write an internal audit line into the `log` table.
pub fn ttlog(
    conn: &Connection,
    at: DateTime<FixedOffset>,
    operation: &str,
    target: &str,
    message: &str,
) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![at.to_rfc3339(), operation, target, message])?;

    Ok(())
}

/// Audit write that never fails the surrounding operation: the state change
/// already happened, so a broken log row only gets reported.
pub fn ttlog_quiet(
    conn: &Connection,
    at: DateTime<FixedOffset>,
    operation: &str,
    target: &str,
    message: &str,
) {
    if let Err(e) = ttlog(conn, at, operation, target, message) {
        tracing::warn!(operation, target, error = %e, "failed to write internal log");
    }
}

/// Rows of the `log` table, oldest first: (id, date, operation, target, message).
pub fn load_log(conn: &Connection) -> AppResult<Vec<(i64, String, String, String, String)>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, operation, IFNULL(target, ''), message FROM log ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
