//! Lead claim and report submission for the signed-in employee.

use crate::adapters::identity::IdentityProvider;
use crate::adapters::object_store::{BUCKET_REPORTS, ObjectStore};
use crate::core::clock::{Clock, same_day_at};
use crate::core::lead::DailyLeadRegistry;
use crate::core::report::ProductionReportStore;
use crate::db::log::ttlog_quiet;
use crate::errors::{AppError, AppResult};
use crate::models::daily_state::ClaimOutcome;
use crate::models::report::{ProductionReport, ReportPayload, ReportRow};
use rusqlite::Connection;

pub struct LeadReportService<'a> {
    conn: &'a Connection,
    identity: &'a dyn IdentityProvider,
    photos: &'a dyn ObjectStore,
    clock: &'a dyn Clock,
}

impl<'a> LeadReportService<'a> {
    pub fn new(
        conn: &'a Connection,
        identity: &'a dyn IdentityProvider,
        photos: &'a dyn ObjectStore,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            conn,
            identity,
            photos,
            clock,
        }
    }

    fn registry(&self) -> DailyLeadRegistry<'a> {
        DailyLeadRegistry::new(self.conn, self.clock)
    }

    pub fn claim_lead(&self) -> AppResult<ClaimOutcome> {
        let user = self.identity.require_user()?;
        let outcome = self.registry().claim(&user.id)?;

        if outcome == ClaimOutcome::Claimed {
            ttlog_quiet(
                self.conn,
                self.clock.now(),
                "lead_claim",
                &user.id,
                &format!("Lead for {}", self.clock.today()),
            );
        }
        Ok(outcome)
    }

    pub fn submit_report(&self, payload: &ReportPayload) -> AppResult<ProductionReport> {
        let user = self.identity.require_user()?;
        let registry = self.registry();

        // Checked before the jar photo is stored, and again inside the write.
        registry.ensure_lead(&user.id)?;

        let now = self.clock.now();
        let jar_photo_ref = match payload.jar_photo.as_ref().filter(|p| !p.is_empty()) {
            Some(photo) => {
                let key = format!(
                    "reports/{}-jars.{}",
                    now.timestamp_millis(),
                    photo.extension
                );
                Some(self.photos.upload(BUCKET_REPORTS, &key, &photo.bytes)?)
            }
            None => None,
        };

        let row = ReportRow {
            date: now.date_naive(),
            lead_employee_id: user.id.clone(),
            products: payload.products,
            jars: payload.jars,
            jar_photo_ref: jar_photo_ref.clone(),
            distributor_start: payload.distributor_start.map(|t| same_day_at(now, t)),
            sales_start: payload.sales_start.map(|t| same_day_at(now, t)),
            updated_at: now,
        };

        let report = ProductionReportStore::new(self.conn)
            .upsert_as_lead(&row)
            .map_err(|e| match jar_photo_ref {
                Some(r) => {
                    tracing::warn!(object = %r, error = %e, "report write failed after upload; object orphaned");
                    AppError::after_upload(r, e)
                }
                None => e,
            })?;

        ttlog_quiet(
            self.conn,
            now,
            "report_submit",
            &user.id,
            &format!(
                "Report {} for {}: {} units",
                report.id,
                report.date,
                payload.products.total()
            ),
        );
        Ok(report)
    }

    /// Today's lead, if a fresh claim exists.
    pub fn lead_status(&self) -> AppResult<Option<String>> {
        self.identity.require_user()?;
        self.registry().current_lead()
    }

    pub fn today_report(&self) -> AppResult<Option<ProductionReport>> {
        self.identity.require_user()?;
        ProductionReportStore::new(self.conn).for_date(&self.clock.today())
    }
}
