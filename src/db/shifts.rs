//! Queries over the `shifts` collection.

use crate::db::columns::{date_str, get_coords, get_date, get_opt_coords, get_opt_ts, get_ts};
use crate::errors::AppResult;
use crate::models::coordinates::Coordinates;
use crate::models::shift::Shift;
use chrono::{DateTime, FixedOffset, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

/// Values for a freshly opened shift.
pub struct NewShift<'a> {
    pub employee_id: &'a str,
    pub date: NaiveDate,
    pub start_time: DateTime<FixedOffset>,
    pub gps_in: Coordinates,
    pub selfie_in: &'a str,
}

pub fn map_row(row: &Row) -> Result<Shift> {
    Ok(Shift {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        date: get_date(row, "date")?,
        start_time: get_ts(row, "start_time")?,
        end_time: get_opt_ts(row, "end_time")?,
        gps_in: get_coords(row, "gps_in")?,
        gps_out: get_opt_coords(row, "gps_out")?,
        selfie_in: row.get("selfie_in")?,
        selfie_out: row.get("selfie_out")?,
        break_start: get_opt_ts(row, "break_start")?,
        break_end: get_opt_ts(row, "break_end")?,
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<Shift>> {
    let shift = conn
        .query_row("SELECT * FROM shifts WHERE id = ?1", [id], map_row)
        .optional()?;
    Ok(shift)
}

/// The employee's shift for `date`, most recent start first.
pub fn find_for_employee_on(
    conn: &Connection,
    employee_id: &str,
    date: &NaiveDate,
) -> AppResult<Option<Shift>> {
    let shift = conn
        .query_row(
            "SELECT * FROM shifts
             WHERE employee_id = ?1 AND date = ?2
             ORDER BY start_time DESC
             LIMIT 1",
            params![employee_id, date_str(date)],
            map_row,
        )
        .optional()?;
    Ok(shift)
}

/// Shifts for `date` that have not been closed yet.
pub fn open_on(conn: &Connection, date: &NaiveDate) -> AppResult<Vec<Shift>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM shifts
         WHERE date = ?1 AND end_time IS NULL
         ORDER BY start_time ASC, id ASC",
    )?;

    let rows = stmt.query_map([date_str(date)], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert(conn: &Connection, s: &NewShift) -> Result<i64> {
    conn.execute(
        "INSERT INTO shifts (employee_id, date, start_time, gps_in, selfie_in)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            s.employee_id,
            date_str(&s.date),
            s.start_time.to_rfc3339(),
            s.gps_in.to_db_str(),
            s.selfie_in,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Set `break_start`; only touches open shifts. Returns affected rows.
pub fn set_break_start(conn: &Connection, id: i64, at: DateTime<FixedOffset>) -> Result<usize> {
    conn.execute(
        "UPDATE shifts SET break_start = ?1 WHERE id = ?2 AND end_time IS NULL",
        params![at.to_rfc3339(), id],
    )
}

/// Set `break_end`; only touches open shifts. Returns affected rows.
pub fn set_break_end(conn: &Connection, id: i64, at: DateTime<FixedOffset>) -> Result<usize> {
    conn.execute(
        "UPDATE shifts SET break_end = ?1 WHERE id = ?2 AND end_time IS NULL",
        params![at.to_rfc3339(), id],
    )
}

/// Close an open shift. Returns affected rows (0 when already closed or absent).
pub fn close(
    conn: &Connection,
    id: i64,
    end_time: DateTime<FixedOffset>,
    gps_out: Coordinates,
    selfie_out: &str,
) -> Result<usize> {
    conn.execute(
        "UPDATE shifts
         SET end_time = ?1, gps_out = ?2, selfie_out = ?3
         WHERE id = ?4 AND end_time IS NULL",
        params![end_time.to_rfc3339(), gps_out.to_db_str(), selfie_out, id],
    )
}
