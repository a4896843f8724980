//! Queries over the `daily_state` singleton.

use crate::db::columns::{date_str, get_date, get_ts};
use crate::errors::AppResult;
use crate::models::daily_state::{DAILY_STATE_ID, DailyLeadState};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn map_row(row: &Row) -> Result<DailyLeadState> {
    Ok(DailyLeadState {
        current_lead_id: row.get("current_lead_id")?,
        updated_at: get_ts(row, "updated_at")?,
        lead_date: get_date(row, "lead_date")?,
    })
}

pub fn load(conn: &Connection) -> AppResult<Option<DailyLeadState>> {
    let state = conn
        .query_row(
            "SELECT current_lead_id, updated_at, lead_date FROM daily_state WHERE id = ?1",
            [DAILY_STATE_ID],
            map_row,
        )
        .optional()?;
    Ok(state)
}

/// Single-statement conditional claim: create the row, or take it over when
/// the stored lead is stale (different date) or unset. A fresh lead held by
/// anyone, the caller included, is left untouched.
///
/// Returns affected rows: 1 = claimed, 0 = a fresh lead already exists.
pub fn try_claim(
    conn: &Connection,
    employee_id: &str,
    now: DateTime<FixedOffset>,
    today: NaiveDate,
) -> Result<usize> {
    conn.execute(
        "INSERT INTO daily_state (id, current_lead_id, updated_at, lead_date)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
             current_lead_id = excluded.current_lead_id,
             updated_at      = excluded.updated_at,
             lead_date       = excluded.lead_date
         WHERE daily_state.lead_date <> excluded.lead_date
            OR daily_state.current_lead_id IS NULL",
        params![DAILY_STATE_ID, employee_id, now.to_rfc3339(), date_str(&today)],
    )
}
