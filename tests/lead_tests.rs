use chrono::{DateTime, Duration};
use siteclock::adapters::identity::StaticIdentity;
use siteclock::core::clock::{Clock, FixedClock};
use siteclock::core::lead::DailyLeadRegistry;
use siteclock::db::daily_state;
use siteclock::db::initialize::init_db;
use siteclock::db::pool::DbPool;
use siteclock::errors::AppError;
use siteclock::models::daily_state::ClaimOutcome;
use std::sync::{Arc, Barrier};
use std::thread;

mod common;
use common::{Fixture, MONDAY_9AM, employee, setup_test_db};

#[test]
fn test_first_claim_of_day_creates_state() {
    let fx = Fixture::new();
    let bat = employee("bat");

    assert!(daily_state::load(&fx.pool.conn).unwrap().is_none());

    let outcome = fx.leads(&bat).claim_lead().expect("claim");
    assert_eq!(outcome, ClaimOutcome::Claimed);

    let state = daily_state::load(&fx.pool.conn).unwrap().expect("row created");
    assert_eq!(state.current_lead_id.as_deref(), Some("bat"));
    assert_eq!(state.updated_at, DateTime::parse_from_rfc3339(MONDAY_9AM).unwrap());
    assert_eq!(state.lead_date, fx.clock.today());
}

#[test]
fn test_same_day_contention() {
    let fx = Fixture::new();
    let bat = employee("bat");
    let dorj = employee("dorj");

    fx.leads(&bat).claim_lead().unwrap();
    fx.advance_minutes(30);

    let err = fx.leads(&dorj).claim_lead().unwrap_err();
    assert!(matches!(err, AppError::LeadAlreadyAssigned));

    // re-claim by the holder is a no-op: updated_at does not move
    let outcome = fx.leads(&bat).claim_lead().unwrap();
    assert_eq!(outcome, ClaimOutcome::AlreadyLead);
    let state = daily_state::load(&fx.pool.conn).unwrap().unwrap();
    assert_eq!(state.updated_at, DateTime::parse_from_rfc3339(MONDAY_9AM).unwrap());
    assert_eq!(state.current_lead_id.as_deref(), Some("bat"));
}

#[test]
fn test_stale_lead_is_overwritten_next_day() {
    let fx = Fixture::new();
    let bat = employee("bat");
    let dorj = employee("dorj");

    fx.leads(&bat).claim_lead().unwrap();
    fx.advance_minutes(24 * 60);

    assert_eq!(fx.leads(&dorj).lead_status().unwrap(), None, "yesterday's lead is stale");

    let outcome = fx.leads(&dorj).claim_lead().unwrap();
    assert_eq!(outcome, ClaimOutcome::Claimed);

    let state = daily_state::load(&fx.pool.conn).unwrap().unwrap();
    assert_eq!(state.current_lead_id.as_deref(), Some("dorj"));
    assert_eq!(state.lead_date.to_string(), "2025-03-11");
    assert_eq!(state.updated_at, fx.clock.now());
}

#[test]
fn test_stale_holder_reclaims_as_fresh_claim() {
    let fx = Fixture::new();
    let bat = employee("bat");

    fx.leads(&bat).claim_lead().unwrap();
    fx.advance_minutes(24 * 60);

    assert_eq!(fx.leads(&bat).claim_lead().unwrap(), ClaimOutcome::Claimed);
}

#[test]
fn test_midnight_boundary_uses_site_calendar_date() {
    let fx = Fixture::new();
    fx.clock
        .set(DateTime::parse_from_rfc3339("2025-03-10T23:59:00+08:00").unwrap());
    let bat = employee("bat");
    let dorj = employee("dorj");

    fx.leads(&bat).claim_lead().unwrap();
    assert_eq!(fx.leads(&bat).lead_status().unwrap().as_deref(), Some("bat"));

    // two minutes later is a new day, not a rolling window
    fx.clock.advance(Duration::minutes(2));
    assert_eq!(fx.leads(&bat).lead_status().unwrap(), None);
    assert_eq!(fx.leads(&dorj).claim_lead().unwrap(), ClaimOutcome::Claimed);
}

#[test]
fn test_claim_requires_identity() {
    let fx = Fixture::new();
    let nobody = StaticIdentity::anonymous();

    assert!(matches!(
        fx.leads(&nobody).claim_lead().unwrap_err(),
        AppError::Unauthenticated
    ));
    assert!(daily_state::load(&fx.pool.conn).unwrap().is_none());
}

#[test]
fn test_claim_is_audited() {
    let fx = Fixture::new();
    let bat = employee("bat");
    fx.leads(&bat).claim_lead().unwrap();
    fx.leads(&bat).claim_lead().unwrap();

    let claims: i64 = fx
        .pool
        .conn
        .query_row(
            "SELECT COUNT(*) FROM log WHERE operation = 'lead_claim' AND target = 'bat'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(claims, 1, "no-op re-claim is not logged");
}

/// Several employees race for a stale slot on separate connections; the
/// conditional write lets exactly one through.
#[test]
fn test_racing_claims_on_stale_slot_have_one_winner() {
    let db_path = setup_test_db("racing_claims");
    {
        let pool = DbPool::new(&db_path).unwrap();
        init_db(&pool.conn).unwrap();
        let yesterday = FixedClock::at("2025-03-09T10:00:00+08:00").unwrap();
        DailyLeadRegistry::new(&pool.conn, &yesterday)
            .claim("old-lead")
            .unwrap();
    }

    let contenders = ["bat", "dorj", "saraa", "tuya", "gan", "oyun"];
    let barrier = Arc::new(Barrier::new(contenders.len()));

    let handles: Vec<_> = contenders
        .iter()
        .map(|who| {
            let db_path = db_path.clone();
            let barrier = Arc::clone(&barrier);
            let who = who.to_string();
            thread::spawn(move || {
                let pool = DbPool::new(&db_path).unwrap();
                let clock = FixedClock::at(MONDAY_9AM).unwrap();
                barrier.wait();
                DailyLeadRegistry::new(&pool.conn, &clock).claim(&who)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winners = results
        .iter()
        .filter(|r| matches!(r, Ok(ClaimOutcome::Claimed)))
        .count();
    let losers = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::LeadAlreadyAssigned)))
        .count();
    assert_eq!(winners, 1);
    assert_eq!(losers, contenders.len() - 1);

    let pool = DbPool::new(&db_path).unwrap();
    let state = daily_state::load(&pool.conn).unwrap().unwrap();
    let lead = state.current_lead_id.unwrap();
    assert!(contenders.contains(&lead.as_str()));
    assert_ne!(lead, "old-lead");
}
