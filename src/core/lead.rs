//! Single daily lead slot.
//!
//! The slot resets by date, not by an explicit transition: a stored lead is
//! only honoured while its `lead_date` equals the site-local date at the
//! moment of the call. A claim made at 23:59 is stale at 00:00.

use crate::core::clock::Clock;
use crate::db::daily_state;
use crate::errors::{AppError, AppResult};
use crate::models::daily_state::{ClaimOutcome, DailyLeadState};
use rusqlite::Connection;

pub struct DailyLeadRegistry<'a> {
    conn: &'a Connection,
    clock: &'a dyn Clock,
}

impl<'a> DailyLeadRegistry<'a> {
    pub fn new(conn: &'a Connection, clock: &'a dyn Clock) -> Self {
        Self { conn, clock }
    }

    /// Claim today's lead.
    ///
    /// The write is one conditional upsert, so two employees racing on a
    /// stale slot cannot both win: the second statement sees the first
    /// one's fresh row and changes nothing.
    pub fn claim(&self, employee_id: &str) -> AppResult<ClaimOutcome> {
        let now = self.clock.now();
        let today = now.date_naive();

        if daily_state::try_claim(self.conn, employee_id, now, today)? == 1 {
            tracing::info!(employee = employee_id, %today, "lead claimed");
            return Ok(ClaimOutcome::Claimed);
        }

        let state = daily_state::load(self.conn)?;
        match state {
            Some(s) if s.is_fresh_lead(employee_id, today) => Ok(ClaimOutcome::AlreadyLead),
            other => {
                tracing::info!(
                    employee = employee_id,
                    holder = other.as_ref().and_then(|s| s.current_lead_id.as_deref()),
                    "lead claim rejected"
                );
                Err(AppError::LeadAlreadyAssigned)
            }
        }
    }

    /// Stored state, fresh or not.
    pub fn state(&self) -> AppResult<Option<DailyLeadState>> {
        daily_state::load(self.conn)
    }

    /// Today's lead, ignoring stale assignments.
    pub fn current_lead(&self) -> AppResult<Option<String>> {
        let today = self.clock.today();
        Ok(self
            .state()?
            .and_then(|s| s.fresh_lead(today).map(str::to_string)))
    }

    /// Fail with `NotLead` unless `employee_id` holds today's claim.
    pub fn ensure_lead(&self, employee_id: &str) -> AppResult<()> {
        let today = self.clock.today();
        match self.state()? {
            Some(s) if s.is_fresh_lead(employee_id, today) => Ok(()),
            _ => Err(AppError::NotLead),
        }
    }
}
