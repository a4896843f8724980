use clap::{Parser, Subcommand};

/// Command-line interface definition for siteclock
#[derive(Parser)]
#[command(
    name = "siteclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Site attendance: geofenced clock-in/out with selfies, breaks, and the daily production lead",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the photo storage directory
    #[arg(global = true, long = "photos")]
    pub photos: Option<String>,

    /// Signed-in employee id (falls back to $SITECLOCK_USER)
    #[arg(global = true, long = "user")]
    pub user: Option<String>,

    /// Signed-in employee email
    #[arg(global = true, long = "email")]
    pub email: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Open today's shift (GPS + selfie required)
    ClockIn {
        #[arg(long, allow_negative_numbers = true, help = "Latitude in decimal degrees")]
        lat: f64,

        #[arg(long, allow_negative_numbers = true, help = "Longitude in decimal degrees")]
        lng: f64,

        #[arg(long, value_name = "FILE", help = "Selfie image file")]
        selfie: Option<String>,
    },

    /// Close today's shift (GPS + selfie required)
    ClockOut {
        #[arg(long, allow_negative_numbers = true, help = "Latitude in decimal degrees")]
        lat: f64,

        #[arg(long, allow_negative_numbers = true, help = "Longitude in decimal degrees")]
        lng: f64,

        #[arg(long, value_name = "FILE", help = "Selfie image file")]
        selfie: Option<String>,

        #[arg(long = "shift", help = "Shift id (default: today's shift)")]
        shift: Option<i64>,
    },

    /// Start or end a break on today's shift
    Break {
        #[command(subcommand)]
        action: BreakAction,
    },

    /// Show today's shift for the signed-in employee
    Status {
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// List everyone currently clocked in today
    Roster,

    /// Daily production lead
    Lead {
        #[command(subcommand)]
        action: LeadAction,
    },

    /// Daily production report
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },

    /// Geofence settings (target coordinates and radius)
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
pub enum BreakAction {
    Start {
        #[arg(long = "shift", help = "Shift id (default: today's shift)")]
        shift: Option<i64>,
    },
    End {
        #[arg(long = "shift", help = "Shift id (default: today's shift)")]
        shift: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum LeadAction {
    /// Claim today's lead
    Claim,
    /// Show who leads today
    Status,
}

#[derive(Subcommand)]
pub enum ReportAction {
    /// Submit (or update) today's report; lead only
    Submit {
        #[arg(long, default_value_t = 0)]
        product_a_small: u32,
        #[arg(long, default_value_t = 0)]
        product_a_medium: u32,
        #[arg(long, default_value_t = 0)]
        product_b_small: u32,
        #[arg(long, default_value_t = 0)]
        product_b_medium: u32,
        #[arg(long, default_value_t = 0)]
        jars_small: u32,
        #[arg(long, default_value_t = 0)]
        jars_medium: u32,

        #[arg(long, value_name = "FILE", help = "Photo of the prepared jars")]
        jar_photo: Option<String>,

        #[arg(long, value_name = "HH:MM", help = "Distributor departure time")]
        distributor_start: Option<String>,

        #[arg(long, value_name = "HH:MM", help = "Sales start time")]
        sales_start: Option<String>,
    },
    /// Show today's report
    Show {
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show effective geofence values
    List,
    /// Store a value (gps_target_lat, gps_target_lng, gps_max_distance)
    Set {
        key: String,
        #[arg(allow_negative_numbers = true)]
        value: String,
    },
    /// Remove a stored value so the default applies
    Unset { key: String },
}
