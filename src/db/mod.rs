pub mod columns;
pub mod daily_state;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod reports;
pub mod settings;
pub mod shifts;
