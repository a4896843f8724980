use chrono::DateTime;
use siteclock::adapters::identity::StaticIdentity;
use siteclock::core::clock::Clock;
use siteclock::errors::AppError;
use siteclock::models::coordinates::Coordinates;
use siteclock::models::photo::Photo;
use siteclock::models::shift::ShiftState;

mod common;
use common::{Fixture, MONDAY_9AM, employee, north_of_site, selfie, site};

#[test]
fn test_clock_in_rejected_500m_from_site() {
    let fx = Fixture::with_150m_fence();
    let bat = employee("bat");

    let err = fx
        .attendance(&bat)
        .clock_in(north_of_site(500.0), Some(&selfie()))
        .unwrap_err();

    match &err {
        AppError::OutOfRange { distance, max } => {
            assert!((499.0..=501.0).contains(distance), "distance {distance}");
            assert_eq!(*max, 150.0);
        }
        other => panic!("expected OutOfRange, got {other:?}"),
    }
    assert_eq!(err.to_string(), "Out of range. Distance: 500m, Max: 150m");
    assert!(fx.photos.is_empty(), "nothing uploaded on rejection");
}

#[test]
fn test_clock_in_at_site_opens_shift() {
    let fx = Fixture::with_150m_fence();
    let bat = employee("bat");

    let shift = fx
        .attendance(&bat)
        .clock_in(site(), Some(&selfie()))
        .expect("clock in");

    assert_eq!(shift.employee_id, "bat");
    assert_eq!(shift.start_time, DateTime::parse_from_rfc3339(MONDAY_9AM).unwrap());
    assert_eq!(shift.date.to_string(), "2025-03-10");
    assert_eq!(shift.gps_in, site());
    assert!(shift.end_time.is_none());
    assert!(fx.photos.contains_url(&shift.selfie_in));
    assert_eq!(shift.state(), ShiftState::Clocked);
}

#[test]
fn test_clock_in_requires_identity() {
    let fx = Fixture::new();
    let nobody = StaticIdentity::anonymous();

    let err = fx
        .attendance(&nobody)
        .clock_in(site(), Some(&selfie()))
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated));
}

#[test]
fn test_clock_in_requires_selfie() {
    let fx = Fixture::new();
    let bat = employee("bat");
    let svc = fx.attendance(&bat);

    assert!(matches!(
        svc.clock_in(site(), None).unwrap_err(),
        AppError::SelfieMissing
    ));

    let empty = Photo::new(Vec::new(), "jpg");
    assert!(matches!(
        svc.clock_in(site(), Some(&empty)).unwrap_err(),
        AppError::SelfieMissing
    ));
}

#[test]
fn test_clock_in_rejects_invalid_coordinates() {
    let fx = Fixture::new();
    let bat = employee("bat");
    let svc = fx.attendance(&bat);

    for bad in [
        Coordinates::new(f64::NAN, 106.9),
        Coordinates::new(91.0, 106.9),
        Coordinates::new(47.9, -181.0),
    ] {
        let err = svc.clock_in(bad, Some(&selfie())).unwrap_err();
        assert!(matches!(err, AppError::InvalidCoordinates(_)), "{bad:?}");
    }
}

#[test]
fn test_second_clock_in_same_day_is_rejected() {
    let fx = Fixture::new();
    let bat = employee("bat");
    let svc = fx.attendance(&bat);

    let first = svc.clock_in(site(), Some(&selfie())).unwrap();
    fx.advance_minutes(5);

    let err = svc.clock_in(site(), Some(&selfie())).unwrap_err();
    assert!(matches!(err, AppError::AlreadyClockedIn(id) if id == first.id));
    assert_eq!(fx.photos.len(), 1, "rejected before upload");
}

#[test]
fn test_closed_shift_is_terminal_for_the_day() {
    let fx = Fixture::new();
    let bat = employee("bat");
    let svc = fx.attendance(&bat);

    let shift = svc.clock_in(site(), Some(&selfie())).unwrap();
    fx.advance_minutes(8 * 60);
    svc.clock_out(shift.id, site(), Some(&selfie())).unwrap();

    fx.advance_minutes(10);
    assert!(matches!(
        svc.clock_in(site(), Some(&selfie())).unwrap_err(),
        AppError::ShiftClosed(id) if id == shift.id
    ));
    assert!(matches!(
        svc.start_break(shift.id).unwrap_err(),
        AppError::ShiftClosed(_)
    ));
    assert!(matches!(
        svc.clock_out(shift.id, site(), Some(&selfie())).unwrap_err(),
        AppError::ShiftClosed(_)
    ));
}

#[test]
fn test_next_day_allows_new_shift() {
    let fx = Fixture::new();
    let bat = employee("bat");
    let svc = fx.attendance(&bat);

    let monday = svc.clock_in(site(), Some(&selfie())).unwrap();
    fx.advance_minutes(24 * 60);

    let tuesday = svc.clock_in(site(), Some(&selfie())).unwrap();
    assert_ne!(monday.id, tuesday.id);
    assert_eq!(tuesday.date.to_string(), "2025-03-11");
}

#[test]
fn test_end_break_before_start_break_is_accepted() {
    let fx = Fixture::new();
    let bat = employee("bat");
    let svc = fx.attendance(&bat);

    let shift = svc.clock_in(site(), Some(&selfie())).unwrap();
    fx.advance_minutes(30);

    let after = svc.end_break(shift.id).expect("unordered end is accepted");
    assert!(after.break_start.is_none());
    assert!(after.break_end.is_some());
}

#[test]
fn test_second_start_break_overwrites() {
    let fx = Fixture::new();
    let bat = employee("bat");
    let svc = fx.attendance(&bat);

    let shift = svc.clock_in(site(), Some(&selfie())).unwrap();
    fx.advance_minutes(60);
    let first = svc.start_break(shift.id).unwrap();
    assert_eq!(first.state(), ShiftState::OnBreak);

    fx.advance_minutes(15);
    let second = svc.start_break(shift.id).unwrap();
    assert!(second.break_start > first.break_start);

    fx.advance_minutes(15);
    let ended = svc.end_break(shift.id).unwrap();
    assert_eq!(ended.state(), ShiftState::Clocked);
}

#[test]
fn test_break_on_missing_or_foreign_shift_is_not_found() {
    let fx = Fixture::new();
    let bat = employee("bat");
    let dorj = employee("dorj");

    assert!(matches!(
        fx.attendance(&bat).start_break(999).unwrap_err(),
        AppError::NotFound(_)
    ));

    let shift = fx.attendance(&bat).clock_in(site(), Some(&selfie())).unwrap();
    assert!(matches!(
        fx.attendance(&dorj).end_break(shift.id).unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[test]
fn test_clock_out_revalidates_fence_against_current_settings() {
    let fx = Fixture::new();
    let bat = employee("bat");
    let svc = fx.attendance(&bat);

    // default 10 km radius
    let shift = svc.clock_in(north_of_site(500.0), Some(&selfie())).unwrap();

    fx.set_setting("gps_max_distance", "150");
    fx.advance_minutes(120);

    let err = svc
        .clock_out(shift.id, north_of_site(500.0), Some(&selfie()))
        .unwrap_err();
    assert!(matches!(err, AppError::OutOfRange { .. }));

    let closed = svc
        .clock_out(shift.id, north_of_site(100.0), Some(&selfie()))
        .unwrap();
    assert!(closed.end_time.is_some());
    assert!(closed.end_time.unwrap() >= closed.start_time);
    assert_eq!(closed.gps_out, Some(north_of_site(100.0)));
    assert!(fx.photos.contains_url(closed.selfie_out.as_deref().unwrap()));
    assert_eq!(closed.worked_minutes(fx.clock.now()), 120);
}

#[test]
fn test_fence_follows_moved_target() {
    let fx = Fixture::with_150m_fence();
    fx.set_setting("gps_target_lat", "48.0");
    fx.set_setting("gps_target_lng", "107.0");
    let bat = employee("bat");

    let err = fx
        .attendance(&bat)
        .clock_in(site(), Some(&selfie()))
        .unwrap_err();
    assert!(matches!(err, AppError::OutOfRange { .. }));

    fx.attendance(&bat)
        .clock_in(Coordinates::new(48.0, 107.0), Some(&selfie()))
        .expect("at the new target");
}

#[test]
fn test_upload_failure_leaves_no_shift() {
    let fx = Fixture::new();
    fx.photos.set_reject(true);
    let bat = employee("bat");
    let svc = fx.attendance(&bat);

    let err = svc.clock_in(site(), Some(&selfie())).unwrap_err();
    assert!(matches!(err, AppError::UploadFailed(_)));

    let (state, shift) = svc.current_shift().unwrap();
    assert_eq!(state, ShiftState::NotClocked);
    assert!(shift.is_none());
}

#[test]
fn test_row_write_failure_after_upload_orphans_photo() {
    let fx = Fixture::new();
    fx.pool
        .conn
        .execute_batch(
            "CREATE TRIGGER reject_shift_insert BEFORE INSERT ON shifts
             BEGIN SELECT RAISE(ABORT, 'disk quota exceeded'); END;",
        )
        .unwrap();
    let bat = employee("bat");

    let err = fx
        .attendance(&bat)
        .clock_in(site(), Some(&selfie()))
        .unwrap_err();

    assert!(err.to_string().contains("disk quota exceeded"));
    match err {
        AppError::RowWriteAfterUpload { orphaned, source } => {
            assert!(fx.photos.contains_url(&orphaned), "object left behind");
            assert!(matches!(*source, AppError::Db(_)));
        }
        other => panic!("expected RowWriteAfterUpload, got {other:?}"),
    }
}

#[test]
fn test_current_shift_tracks_lifecycle() {
    let fx = Fixture::new();
    let bat = employee("bat");
    let svc = fx.attendance(&bat);

    assert_eq!(svc.current_shift().unwrap().0, ShiftState::NotClocked);

    let shift = svc.clock_in(site(), Some(&selfie())).unwrap();
    assert_eq!(svc.current_shift().unwrap().0, ShiftState::Clocked);

    svc.start_break(shift.id).unwrap();
    assert_eq!(svc.current_shift().unwrap().0, ShiftState::OnBreak);

    fx.advance_minutes(20);
    svc.end_break(shift.id).unwrap();
    assert_eq!(svc.current_shift().unwrap().0, ShiftState::Clocked);

    svc.clock_out(shift.id, site(), Some(&selfie())).unwrap();
    assert_eq!(svc.current_shift().unwrap().0, ShiftState::Closed);
}

#[test]
fn test_active_roster_lists_open_shifts_of_today() {
    let fx = Fixture::new();
    let bat = employee("bat");
    let dorj = employee("dorj");
    let saraa = employee("saraa");

    fx.attendance(&bat).clock_in(site(), Some(&selfie())).unwrap();
    let d = fx.attendance(&dorj).clock_in(site(), Some(&selfie())).unwrap();
    fx.attendance(&saraa).clock_in(site(), Some(&selfie())).unwrap();
    fx.attendance(&dorj)
        .clock_out(d.id, site(), Some(&selfie()))
        .unwrap();

    let roster = fx.attendance(&bat).active_roster().unwrap();
    let ids: Vec<&str> = roster.iter().map(|s| s.employee_id.as_str()).collect();
    assert_eq!(ids, vec!["bat", "saraa"]);

    fx.advance_minutes(24 * 60);
    assert!(fx.attendance(&bat).active_roster().unwrap().is_empty());
}
