//! siteclock library root.
//! Exposes the CLI parser, the high-level run() function, and the domain
//! modules (attendance, daily lead, production report).

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter (EnvFilter syntax).
pub const LOG_ENV: &str = "SITECLOCK_LOG";

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::ClockIn { .. } | Commands::ClockOut { .. } | Commands::Break { .. } => {
            cli::commands::attendance::handle(cli, cfg)
        }
        Commands::Status { .. } => cli::commands::status::handle(cli, cfg),
        Commands::Roster => cli::commands::roster::handle(cli, cfg),
        Commands::Lead { .. } => cli::commands::lead::handle(cli, cfg),
        Commands::Report { .. } => cli::commands::report::handle(cli, cfg),
        Commands::Settings { .. } => cli::commands::settings::handle(cli, cfg),
    }
}

/// Diagnostics go to stderr; user-facing output stays on stdout.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(photos) = &cli.photos {
        cfg.photo_root = photos.clone();
    }

    dispatch(&cli, &cfg)
}
