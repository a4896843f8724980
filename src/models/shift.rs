use super::coordinates::Coordinates;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

/// Lifecycle position of an employee's shift for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftState {
    NotClocked,
    Clocked,
    OnBreak,
    Closed,
}

impl ShiftState {
    pub fn label(&self) -> &str {
        match self {
            ShiftState::NotClocked => "not clocked in",
            ShiftState::Clocked => "clocked in",
            ShiftState::OnBreak => "on break",
            ShiftState::Closed => "clocked out",
        }
    }

    /// Derive the state from an optional shift row.
    pub fn of(shift: Option<&Shift>) -> Self {
        match shift {
            None => ShiftState::NotClocked,
            Some(s) => s.state(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Shift {
    pub id: i64,
    pub employee_id: String,
    pub date: NaiveDate,                       // ⇔ shifts.date (site-local "YYYY-MM-DD")
    pub start_time: DateTime<FixedOffset>,     // ⇔ shifts.start_time (RFC 3339)
    pub end_time: Option<DateTime<FixedOffset>>,
    pub gps_in: Coordinates,                   // ⇔ shifts.gps_in ("lat,lng")
    pub gps_out: Option<Coordinates>,
    pub selfie_in: String,                     // ⇔ shifts.selfie_in (public URL)
    pub selfie_out: Option<String>,
    pub break_start: Option<DateTime<FixedOffset>>,
    pub break_end: Option<DateTime<FixedOffset>>,
}

impl Shift {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// A break is running when it was started and not yet ended after that
    /// start. An `end` older than `start` (break restarted) counts as running.
    pub fn on_break(&self) -> bool {
        match (self.break_start, self.break_end) {
            (Some(start), Some(end)) => end < start,
            (Some(_), None) => true,
            _ => false,
        }
    }

    pub fn state(&self) -> ShiftState {
        if !self.is_open() {
            ShiftState::Closed
        } else if self.on_break() {
            ShiftState::OnBreak
        } else {
            ShiftState::Clocked
        }
    }

    /// Worked minutes so far (or in total when closed), break excluded.
    pub fn worked_minutes(&self, now: DateTime<FixedOffset>) -> i64 {
        let end = self.end_time.unwrap_or(now);
        let mut total = (end - self.start_time).num_minutes();

        if let (Some(bs), Some(be)) = (self.break_start, self.break_end)
            && be >= bs
        {
            total -= (be - bs).num_minutes();
        } else if let Some(bs) = self.break_start
            && self.on_break()
        {
            total -= (end - bs).num_minutes();
        }

        total.max(0)
    }
}
