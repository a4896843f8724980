#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::Duration;
use siteclock::adapters::identity::StaticIdentity;
use siteclock::adapters::object_store::MemoryObjectStore;
use siteclock::core::attendance::AttendanceService;
use siteclock::core::clock::FixedClock;
use siteclock::core::geofence::{EARTH_RADIUS_METERS, FALLBACK_TARGET_LAT, FALLBACK_TARGET_LNG};
use siteclock::core::lead_report::LeadReportService;
use siteclock::db::initialize::init_db;
use siteclock::db::pool::DbPool;
use siteclock::db::settings;
use siteclock::models::coordinates::Coordinates;
use siteclock::models::photo::Photo;
use siteclock::models::user::User;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const MONDAY_9AM: &str = "2025-03-10T09:00:00+08:00";

pub fn sc() -> Command {
    cargo_bin_cmd!("siteclock")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_siteclock.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Fresh photo directory for CLI tests.
pub fn setup_photo_dir(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_siteclock_photos", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create photo dir");
    path.to_string_lossy().to_string()
}

/// Write a small fake JPEG for CLI uploads.
pub fn temp_photo(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_selfie.jpg", name));
    fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]).expect("write photo");
    path.to_string_lossy().to_string()
}

pub fn selfie() -> Photo {
    Photo::new(vec![0xFF, 0xD8, 0xFF, 0xE0], "jpg")
}

pub fn site() -> Coordinates {
    Coordinates::new(FALLBACK_TARGET_LAT, FALLBACK_TARGET_LNG)
}

/// A point `meters` due north of the default site.
pub fn north_of_site(meters: f64) -> Coordinates {
    Coordinates::new(
        FALLBACK_TARGET_LAT + (meters / EARTH_RADIUS_METERS).to_degrees(),
        FALLBACK_TARGET_LNG,
    )
}

pub fn employee(id: &str) -> StaticIdentity {
    StaticIdentity::signed_in(User::new(id).with_email(format!("{id}@example.com")))
}

/// In-memory database, fixed clock and in-memory photo store.
pub struct Fixture {
    pub pool: DbPool,
    pub clock: FixedClock,
    pub photos: MemoryObjectStore,
}

impl Fixture {
    pub fn new() -> Self {
        let pool = DbPool::in_memory().expect("open in-memory db");
        init_db(&pool.conn).expect("init db");
        Self {
            pool,
            clock: FixedClock::at(MONDAY_9AM).expect("valid instant"),
            photos: MemoryObjectStore::new(),
        }
    }

    /// Fixture with a 150 m fence around the default site.
    pub fn with_150m_fence() -> Self {
        let fx = Self::new();
        fx.set_setting("gps_max_distance", "150");
        fx
    }

    pub fn set_setting(&self, key: &str, value: &str) {
        settings::set(&self.pool.conn, key, value).expect("store setting");
    }

    pub fn attendance<'a>(&'a self, who: &'a StaticIdentity) -> AttendanceService<'a> {
        AttendanceService::new(&self.pool.conn, who, &self.photos, &self.clock)
    }

    pub fn leads<'a>(&'a self, who: &'a StaticIdentity) -> LeadReportService<'a> {
        LeadReportService::new(&self.pool.conn, who, &self.photos, &self.clock)
    }

    pub fn advance_minutes(&self, m: i64) {
        self.clock.advance(Duration::minutes(m));
    }
}
