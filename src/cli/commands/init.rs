use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::clock::Clock;
use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use rusqlite::Connection;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the photo storage directory
///  - the SQLite database and all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.photos.clone(), cli.test)?;

    println!("⚙️  Initializing siteclock…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", &cfg.database);
    println!("📷 Photos     : {}", &cfg.photo_root);

    let conn = Connection::open(&cfg.database)?;
    for (version, description) in init_db(&conn)? {
        success(format!("Migration applied: {} → {}", version, description));
    }

    if let Err(e) = ttlog(
        &conn,
        cfg.clock().now(),
        "init",
        "",
        &format!("Database initialized at {}", &cfg.database),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    println!("🎉 siteclock initialization completed!");
    Ok(())
}
