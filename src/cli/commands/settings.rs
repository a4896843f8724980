use crate::cli::commands::Session;
use crate::cli::parser::{Cli, Commands, SettingsAction};
use crate::config::Config;
use crate::core::geofence::ValueSource;
use crate::core::settings::SettingsLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::table::Table;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Settings { action } = &cli.command else {
        return Ok(());
    };

    let session = Session::open(cli, cfg)?;
    let conn = &session.pool.conn;

    match action {
        SettingsAction::List => {
            let mut table = Table::new(&["KEY", "VALUE", "SOURCE"]);
            for line in SettingsLogic::effective(conn)? {
                let source = match line.source {
                    ValueSource::Settings => "settings",
                    ValueSource::Fallback => "default",
                };
                table.add_row(vec![line.key.to_string(), line.value.to_string(), source.into()]);
            }
            print!("{}", table.render());
        }
        SettingsAction::Set { key, value } => {
            let v = SettingsLogic::set(conn, &session.clock, key, value)?;
            success(format!("{} set to {}.", key, v));
        }
        SettingsAction::Unset { key } => {
            if SettingsLogic::unset(conn, &session.clock, key)? {
                success(format!("{} reset to default.", key));
            } else {
                info(format!("{} was not set.", key));
            }
        }
    }
    Ok(())
}
