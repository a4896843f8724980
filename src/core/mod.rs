pub mod attendance;
pub mod clock;
pub mod geofence;
pub mod lead;
pub mod lead_report;
pub mod ledger;
pub mod log;
pub mod report;
pub mod settings;
