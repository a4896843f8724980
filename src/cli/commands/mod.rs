//! One handler per subcommand, plus the per-invocation session that wires
//! the collaborators together.

pub mod attendance;
pub mod config;
pub mod init;
pub mod lead;
pub mod log;
pub mod report;
pub mod roster;
pub mod settings;
pub mod status;

use crate::adapters::identity::{IdentityProvider, StaticIdentity};
use crate::adapters::object_store::FsObjectStore;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::attendance::AttendanceService;
use crate::core::clock::SystemClock;
use crate::core::lead_report::LeadReportService;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};

pub const USER_ENV: &str = "SITECLOCK_USER";

/// Everything one command needs: storage, caller identity, photo store and
/// the site clock.
pub struct Session {
    pub pool: DbPool,
    pub identity: StaticIdentity,
    pub photos: FsObjectStore,
    pub clock: SystemClock,
}

impl Session {
    pub fn open(cli: &Cli, cfg: &Config) -> AppResult<Self> {
        let pool = DbPool::new(&cfg.database)?;
        init_db(&pool.conn)?;

        let user = cli.user.clone().or_else(|| std::env::var(USER_ENV).ok());
        let identity = StaticIdentity::from_parts(user.as_deref(), cli.email.as_deref());

        let photo_root = cli.photos.clone().unwrap_or_else(|| cfg.photo_root.clone());

        Ok(Self {
            pool,
            identity,
            photos: FsObjectStore::new(photo_root),
            clock: cfg.clock(),
        })
    }

    pub fn attendance(&self) -> AttendanceService<'_> {
        AttendanceService::new(&self.pool.conn, &self.identity, &self.photos, &self.clock)
    }

    pub fn lead_reports(&self) -> LeadReportService<'_> {
        LeadReportService::new(&self.pool.conn, &self.identity, &self.photos, &self.clock)
    }

    /// Explicit shift id, or the caller's shift for today.
    pub fn resolve_shift(&self, explicit: Option<i64>) -> AppResult<i64> {
        if let Some(id) = explicit {
            return Ok(id);
        }
        self.identity.require_user()?;
        match self.attendance().current_shift()? {
            (_, Some(shift)) => Ok(shift.id),
            (_, None) => Err(AppError::NotFound("no shift for today".into())),
        }
    }
}
