//! Unified application error type.
//! All modules (db, core, cli, adapters) return AppError so that every
//! failure reaches the caller as one displayable message.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Identity
    // ---------------------------
    #[error("Unauthenticated: no signed-in employee")]
    Unauthenticated,

    // ---------------------------
    // Attendance
    // ---------------------------
    #[error("Out of range. Distance: {}m, Max: {}m", .distance.round(), .max.round())]
    OutOfRange { distance: f64, max: f64 },

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Selfie required")]
    SelfieMissing,

    #[error("Failed to upload photo: {0}")]
    UploadFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already clocked in today (shift {0})")]
    AlreadyClockedIn(i64),

    #[error("Shift {0} is already closed")]
    ShiftClosed(i64),

    // ---------------------------
    // Lead / report
    // ---------------------------
    #[error("Lead already assigned for today")]
    LeadAlreadyAssigned,

    #[error("Only the active lead can submit reports")]
    NotLead,

    // ---------------------------
    // Partial failure: photo stored, row write failed.
    // The stored object is left behind; the row-write error is what the
    // caller sees.
    // ---------------------------
    #[error("{source}")]
    RowWriteAfterUpload {
        orphaned: String,
        #[source]
        source: Box<AppError>,
    },

    // ---------------------------
    // Storage
    // ---------------------------
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // IO / parsing
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Wrap a row-write failure that happened after `orphaned` was uploaded.
    pub fn after_upload(orphaned: impl Into<String>, source: AppError) -> Self {
        AppError::RowWriteAfterUpload {
            orphaned: orphaned.into(),
            source: Box::new(source),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
