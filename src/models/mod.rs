pub mod coordinates;
pub mod daily_state;
pub mod photo;
pub mod report;
pub mod shift;
pub mod user;
