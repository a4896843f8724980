use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

/// Fixed identity of the singleton `daily_state` row.
pub const DAILY_STATE_ID: i64 = 1;

/// Who leads production reporting. Only meaningful when `lead_date` is
/// the current site-local date.
#[derive(Debug, Clone, Serialize)]
pub struct DailyLeadState {
    pub current_lead_id: Option<String>,
    pub updated_at: DateTime<FixedOffset>,
    pub lead_date: NaiveDate,
}

impl DailyLeadState {
    pub fn is_fresh(&self, today: NaiveDate) -> bool {
        self.lead_date == today
    }

    /// The lead for `today`, or `None` if unset or stale.
    pub fn fresh_lead(&self, today: NaiveDate) -> Option<&str> {
        if self.is_fresh(today) {
            self.current_lead_id.as_deref()
        } else {
            None
        }
    }

    pub fn is_fresh_lead(&self, employee_id: &str, today: NaiveDate) -> bool {
        self.fresh_lead(today) == Some(employee_id)
    }
}

/// Outcome of a successful claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The slot was empty or stale and now belongs to the caller.
    Claimed,
    /// The caller already held today's claim; nothing was written.
    AlreadyLead,
}
