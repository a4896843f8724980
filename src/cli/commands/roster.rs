use crate::cli::commands::Session;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::clock::Clock;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::table::Table;
use crate::utils::time::format_minutes;

/// Everyone with an open shift today.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let session = Session::open(cli, cfg)?;
    let shifts = session.attendance().active_roster()?;

    if shifts.is_empty() {
        info(format!("Nobody is clocked in on {}.", session.clock.today()));
        return Ok(());
    }

    let now = session.clock.now();
    let mut table = Table::new(&["SHIFT", "EMPLOYEE", "IN", "STATE", "WORKED"]);
    for s in &shifts {
        table.add_row(vec![
            s.id.to_string(),
            s.employee_id.clone(),
            s.start_time.format("%H:%M").to_string(),
            s.state().label().to_string(),
            format_minutes(s.worked_minutes(now)),
        ]);
    }

    println!("👷 On site now: {}\n", shifts.len());
    print!("{}", table.render());
    Ok(())
}
