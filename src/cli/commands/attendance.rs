use crate::cli::commands::Session;
use crate::cli::parser::{BreakAction, Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::coordinates::Coordinates;
use crate::models::photo::Photo;
use crate::ui::messages::success;
use std::path::Path;

fn load_photo(path: Option<&String>) -> AppResult<Option<Photo>> {
    path.map(|p| Photo::from_file(Path::new(p))).transpose()
}

/// Handle `clock-in`, `clock-out` and `break`.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let session = Session::open(cli, cfg)?;
    let svc = session.attendance();

    match &cli.command {
        Commands::ClockIn { lat, lng, selfie } => {
            let selfie = load_photo(selfie.as_ref())?;
            let shift = svc.clock_in(Coordinates::new(*lat, *lng), selfie.as_ref())?;
            success(format!(
                "Clocked in at {} (shift {}).",
                shift.start_time.format("%H:%M"),
                shift.id
            ));
        }
        Commands::ClockOut {
            lat,
            lng,
            selfie,
            shift,
        } => {
            let selfie = load_photo(selfie.as_ref())?;
            let id = session.resolve_shift(*shift)?;
            let shift = svc.clock_out(id, Coordinates::new(*lat, *lng), selfie.as_ref())?;
            let end = shift.end_time.unwrap_or(shift.start_time);
            success(format!(
                "Clocked out at {} (shift {}).",
                end.format("%H:%M"),
                shift.id
            ));
        }
        Commands::Break { action } => match action {
            BreakAction::Start { shift } => {
                let id = session.resolve_shift(*shift)?;
                svc.start_break(id)?;
                success(format!("☕ Break started (shift {}).", id));
            }
            BreakAction::End { shift } => {
                let id = session.resolve_shift(*shift)?;
                svc.end_break(id)?;
                success(format!("☕ Break ended (shift {}).", id));
            }
        },
        _ => {}
    }

    Ok(())
}
