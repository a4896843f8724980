use crate::cli::commands::Session;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::clock::Clock;
use crate::errors::{AppError, AppResult};
use crate::utils::time::format_minutes;
use serde_json::json;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Status { json } = &cli.command else {
        return Ok(());
    };

    let session = Session::open(cli, cfg)?;
    let (state, shift) = session.attendance().current_shift()?;
    let now = session.clock.now();

    if *json {
        let out = json!({
            "date": session.clock.today().to_string(),
            "state": state,
            "shift": shift,
            "worked_minutes": shift.as_ref().map(|s| s.worked_minutes(now)),
        });
        let text = serde_json::to_string_pretty(&out).map_err(|e| AppError::Other(e.to_string()))?;
        println!("{}", text);
        return Ok(());
    }

    println!("📅 {} : {}", session.clock.today(), state.label());
    if let Some(s) = shift {
        println!("   shift     : {}", s.id);
        println!("   in        : {} @ {}", s.start_time.format("%H:%M"), s.gps_in);
        if let Some(bs) = s.break_start {
            println!("   break     : {}", bs.format("%H:%M"));
        }
        if let Some(be) = s.break_end {
            println!("   break end : {}", be.format("%H:%M"));
        }
        if let (Some(end), Some(gps)) = (s.end_time, s.gps_out) {
            println!("   out       : {} @ {}", end.format("%H:%M"), gps);
        }
        println!("   worked    : {}", format_minutes(s.worked_minutes(now)));
    }
    Ok(())
}
