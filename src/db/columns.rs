//! Column conversions shared by the per-table query modules.

use crate::errors::AppError;
use crate::models::coordinates::Coordinates;
use chrono::{DateTime, FixedOffset, NaiveDate};
use rusqlite::Row;
use rusqlite::types::Type;

pub const DATE_FMT: &str = "%Y-%m-%d";

pub fn date_str(d: &NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

fn conversion_err(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub fn get_date(row: &Row, name: &str) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(name)?;
    NaiveDate::parse_from_str(&raw, DATE_FMT).map_err(|_| conversion_err(0, AppError::InvalidDate(raw)))
}

pub fn get_ts(row: &Row, name: &str) -> rusqlite::Result<DateTime<FixedOffset>> {
    let raw: String = row.get(name)?;
    DateTime::parse_from_rfc3339(&raw).map_err(|_| conversion_err(0, AppError::InvalidTime(raw)))
}

pub fn get_opt_ts(row: &Row, name: &str) -> rusqlite::Result<Option<DateTime<FixedOffset>>> {
    let raw: Option<String> = row.get(name)?;
    match raw {
        None => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .map(Some)
            .map_err(|_| conversion_err(0, AppError::InvalidTime(s))),
    }
}

pub fn get_coords(row: &Row, name: &str) -> rusqlite::Result<Coordinates> {
    let raw: String = row.get(name)?;
    Coordinates::from_db_str(&raw)
        .ok_or_else(|| conversion_err(0, AppError::InvalidCoordinates(raw)))
}

pub fn get_opt_coords(row: &Row, name: &str) -> rusqlite::Result<Option<Coordinates>> {
    let raw: Option<String> = row.get(name)?;
    match raw {
        None => Ok(None),
        Some(s) => Coordinates::from_db_str(&s)
            .map(Some)
            .ok_or_else(|| conversion_err(0, AppError::InvalidCoordinates(s))),
    }
}

pub fn opt_ts_str(ts: Option<DateTime<FixedOffset>>) -> Option<String> {
    ts.map(|t| t.to_rfc3339())
}
