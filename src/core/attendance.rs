//! Clock-in / clock-out / break requests: identity, geofence, selfie, then
//! the shift ledger.
//!
//! Selfie handling is two-phase: the photo is uploaded first and its
//! reference written into the shift row second. If the row write fails the
//! uploaded object stays behind and the caller gets
//! `AppError::RowWriteAfterUpload`, which displays the row-write error.

use crate::adapters::identity::IdentityProvider;
use crate::adapters::object_store::{BUCKET_ATTENDANCE, ObjectStore};
use crate::core::clock::Clock;
use crate::core::geofence::GeofenceConfig;
use crate::core::ledger::ShiftLedger;
use crate::db::log::ttlog_quiet;
use crate::db::shifts;
use crate::errors::{AppError, AppResult};
use crate::models::coordinates::Coordinates;
use crate::models::photo::Photo;
use crate::models::shift::{Shift, ShiftState};
use crate::models::user::User;
use rusqlite::Connection;

pub struct AttendanceService<'a> {
    conn: &'a Connection,
    identity: &'a dyn IdentityProvider,
    photos: &'a dyn ObjectStore,
    clock: &'a dyn Clock,
}

#[derive(Clone, Copy)]
enum Direction {
    In,
    Out,
}

impl Direction {
    fn suffix(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

impl<'a> AttendanceService<'a> {
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

    fn ledger(&self) -> ShiftLedger<'a> {
        ShiftLedger::new(self.conn, self.clock)
    }

    pub fn clock_in(&self, coords: Coordinates, selfie: Option<&Photo>) -> AppResult<Shift> {
        let user = self.identity.require_user()?;
        let distance = self.check_site(&user, coords)?;
        let selfie = require_selfie(selfie)?;

        let ledger = self.ledger();
        ledger.ensure_can_open(&user.id)?;

        let selfie_ref = self.upload_selfie(&user, Direction::In, selfie)?;
        let shift = ledger
            .open(&user.id, coords, &selfie_ref)
            .map_err(|e| orphaned(selfie_ref, e))?;

        ttlog_quiet(
            self.conn,
            self.clock.now(),
            "clock_in",
            &user.id,
            &format!("Shift {} opened at {:.0}m from site", shift.id, distance),
        );
        Ok(shift)
    }

    pub fn clock_out(
        &self,
        shift_id: i64,
        coords: Coordinates,
        selfie: Option<&Photo>,
    ) -> AppResult<Shift> {
        let user = self.identity.require_user()?;
        // Settings may have changed since clock-in: resolve the fence again.
        let distance = self.check_site(&user, coords)?;
        let selfie = require_selfie(selfie)?;

        let ledger = self.ledger();
        ledger.ensure_open(shift_id, &user.id)?;

        let selfie_ref = self.upload_selfie(&user, Direction::Out, selfie)?;
        let shift = ledger
            .close(shift_id, &user.id, coords, &selfie_ref)
            .map_err(|e| orphaned(selfie_ref, e))?;

        ttlog_quiet(
            self.conn,
            self.clock.now(),
            "clock_out",
            &user.id,
            &format!("Shift {} closed at {:.0}m from site", shift.id, distance),
        );
        Ok(shift)
    }

    pub fn start_break(&self, shift_id: i64) -> AppResult<Shift> {
        let user = self.identity.require_user()?;
        let shift = self.ledger().start_break(shift_id, &user.id)?;
        ttlog_quiet(
            self.conn,
            self.clock.now(),
            "break_start",
            &user.id,
            &format!("Break started on shift {}", shift_id),
        );
        Ok(shift)
    }

    pub fn end_break(&self, shift_id: i64) -> AppResult<Shift> {
        let user = self.identity.require_user()?;
        let shift = self.ledger().end_break(shift_id, &user.id)?;
        ttlog_quiet(
            self.conn,
            self.clock.now(),
            "break_end",
            &user.id,
            &format!("Break ended on shift {}", shift_id),
        );
        Ok(shift)
    }

    /// The caller's shift for today with its derived state.
    pub fn current_shift(&self) -> AppResult<(ShiftState, Option<Shift>)> {
        let user = self.identity.require_user()?;
        let shift = self.ledger().today_for(&user.id)?;
        Ok((ShiftState::of(shift.as_ref()), shift))
    }

    /// Everyone currently on site today (open shifts).
    pub fn active_roster(&self) -> AppResult<Vec<Shift>> {
        self.identity.require_user()?;
        shifts::open_on(self.conn, &self.clock.today())
    }

    fn check_site(&self, user: &User, coords: Coordinates) -> AppResult<f64> {
        coords.validate()?;
        let fence = GeofenceConfig::load(self.conn)?;
        fence.check(coords).inspect_err(|e| {
            tracing::warn!(employee = %user.id, %coords, error = %e, "geofence rejected request");
        })
    }

    fn upload_selfie(&self, user: &User, dir: Direction, photo: &Photo) -> AppResult<String> {
        let key = format!(
            "{}/{}-{}.{}",
            user.id,
            self.clock.now().timestamp_millis(),
            dir.suffix(),
            photo.extension
        );
        self.photos.upload(BUCKET_ATTENDANCE, &key, &photo.bytes)
    }
}

fn require_selfie(selfie: Option<&Photo>) -> AppResult<&Photo> {
    selfie
        .filter(|p| !p.is_empty())
        .ok_or(AppError::SelfieMissing)
}

fn orphaned(selfie_ref: String, err: AppError) -> AppError {
    tracing::warn!(object = %selfie_ref, error = %err, "row write failed after upload; object orphaned");
    AppError::after_upload(selfie_ref, err)
}
