//! Per-employee shift lifecycle over the `shifts` collection.
//!
//! NotClocked → Clocked ⇄ OnBreak → Closed. Closed is terminal for the day;
//! at most one shift exists per (employee, date), enforced by the unique
//! key rather than by a prior read. Break ordering is not checked: ending a
//! break that never started is accepted, and restarting one overwrites
//! `break_start`.

use crate::core::clock::Clock;
use crate::db::shifts::{self, NewShift};
use crate::errors::{AppError, AppResult};
use crate::models::coordinates::Coordinates;
use crate::models::shift::Shift;
use rusqlite::{Connection, ErrorCode};

pub struct ShiftLedger<'a> {
    conn: &'a Connection,
    clock: &'a dyn Clock,
}

enum BreakEdge {
    Start,
    End,
}

impl<'a> ShiftLedger<'a> {
    pub fn new(conn: &'a Connection, clock: &'a dyn Clock) -> Self {
        Self { conn, clock }
    }

    /// The employee's shift for today, if any.
    pub fn today_for(&self, employee_id: &str) -> AppResult<Option<Shift>> {
        shifts::find_for_employee_on(self.conn, employee_id, &self.clock.today())
    }

    /// Fail unless the employee is `NotClocked` today.
    pub fn ensure_can_open(&self, employee_id: &str) -> AppResult<()> {
        match self.today_for(employee_id)? {
            None => Ok(()),
            Some(s) if s.is_open() => Err(AppError::AlreadyClockedIn(s.id)),
            Some(s) => Err(AppError::ShiftClosed(s.id)),
        }
    }

    /// Load a shift owned by `employee_id` that is still open.
    /// Shifts of other employees are reported as missing.
    pub fn ensure_open(&self, shift_id: i64, employee_id: &str) -> AppResult<Shift> {
        let shift = self.owned(shift_id, employee_id)?;
        if !shift.is_open() {
            return Err(AppError::ShiftClosed(shift.id));
        }
        Ok(shift)
    }

    pub fn open(
        &self,
        employee_id: &str,
        gps_in: Coordinates,
        selfie_ref: &str,
    ) -> AppResult<Shift> {
        let now = self.clock.now();
        let new = NewShift {
            employee_id,
            date: now.date_naive(),
            start_time: now,
            gps_in,
            selfie_in: selfie_ref,
        };

        let id = match shifts::insert(self.conn, &new) {
            Ok(id) => id,
            Err(e) if is_constraint_violation(&e) => {
                // Lost a race against another clock-in for the same day.
                self.ensure_can_open(employee_id)?;
                return Err(AppError::Db(e));
            }
            Err(e) => return Err(AppError::Db(e)),
        };

        self.reload(id)
    }

    pub fn start_break(&self, shift_id: i64, employee_id: &str) -> AppResult<Shift> {
        self.touch_break(shift_id, employee_id, BreakEdge::Start)
    }

    pub fn end_break(&self, shift_id: i64, employee_id: &str) -> AppResult<Shift> {
        self.touch_break(shift_id, employee_id, BreakEdge::End)
    }

    pub fn close(
        &self,
        shift_id: i64,
        employee_id: &str,
        gps_out: Coordinates,
        selfie_ref: &str,
    ) -> AppResult<Shift> {
        self.owned(shift_id, employee_id)?;

        let affected = shifts::close(self.conn, shift_id, self.clock.now(), gps_out, selfie_ref)?;
        if affected == 0 {
            return Err(self.missing_or_closed(shift_id));
        }
        self.reload(shift_id)
    }

    fn touch_break(&self, shift_id: i64, employee_id: &str, edge: BreakEdge) -> AppResult<Shift> {
        self.owned(shift_id, employee_id)?;

        let now = self.clock.now();
        let affected = match edge {
            BreakEdge::Start => shifts::set_break_start(self.conn, shift_id, now)?,
            BreakEdge::End => shifts::set_break_end(self.conn, shift_id, now)?,
        };
        if affected == 0 {
            return Err(self.missing_or_closed(shift_id));
        }
        self.reload(shift_id)
    }

    fn owned(&self, shift_id: i64, employee_id: &str) -> AppResult<Shift> {
        match shifts::find_by_id(self.conn, shift_id)? {
            Some(s) if s.employee_id == employee_id => Ok(s),
            _ => Err(AppError::NotFound(format!("shift {}", shift_id))),
        }
    }

    fn reload(&self, shift_id: i64) -> AppResult<Shift> {
        shifts::find_by_id(self.conn, shift_id)?
            .ok_or_else(|| AppError::NotFound(format!("shift {}", shift_id)))
    }

    /// Classify a conditional update that touched no row.
    fn missing_or_closed(&self, shift_id: i64) -> AppError {
        match shifts::find_by_id(self.conn, shift_id) {
            Ok(Some(_)) => AppError::ShiftClosed(shift_id),
            Ok(None) => AppError::NotFound(format!("shift {}", shift_id)),
            Err(e) => e,
        }
    }
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    )
}
