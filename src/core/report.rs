//! At-most-one production report per date, writable by today's lead only.

use crate::db::{daily_state, reports};
use crate::errors::{AppError, AppResult};
use crate::models::report::{ProductionReport, ReportRow};
use chrono::NaiveDate;
use rusqlite::{Connection, Transaction, TransactionBehavior};

pub struct ProductionReportStore<'a> {
    conn: &'a Connection,
}

impl<'a> ProductionReportStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn for_date(&self, date: &NaiveDate) -> AppResult<Option<ProductionReport>> {
        reports::find_by_date(self.conn, date)
    }

    /// Upsert `row` keyed on `row.date`.
    ///
    /// The lead check and the write share one IMMEDIATE transaction, so a
    /// claim that changes hands in between cannot slip a report through, and
    /// two concurrent submissions serialize on the write lock instead of
    /// racing on a "does a report exist" read.
    pub fn upsert_as_lead(&self, row: &ReportRow) -> AppResult<ProductionReport> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let is_lead = daily_state::load(&tx)?
            .is_some_and(|s| s.is_fresh_lead(&row.lead_employee_id, row.date));
        if !is_lead {
            return Err(AppError::NotLead);
        }

        reports::upsert(&tx, row)?;
        let saved = reports::find_by_date(&tx, &row.date)?;
        tx.commit()?;

        saved.ok_or_else(|| AppError::Storage(format!("report for {} vanished", row.date)))
    }
}
