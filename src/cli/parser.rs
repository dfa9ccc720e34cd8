use clap::{Parser, Subcommand};

/// Command-line interface definition for shiftlog
/// Attendance CLI: geofenced check-ins/check-outs backed by SQLite
#[derive(Parser)]
#[command(
    name = "shiftlog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Attendance check-in/check-out for venue-based staffing: geofence validation, strict shift sequencing, live duty status",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

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

    /// Manage the configuration file (view or validate)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Refresh the worker/venue directory mirror from a backoffice export
    Sync {
        /// Path to the JSON directory export
        file: String,
    },

    /// Check a worker in at their assigned venue
    In {
        /// Worker id
        worker_id: i64,

        #[arg(long = "lat", help = "Current latitude of the worker")]
        lat: Option<f64>,

        #[arg(long = "lon", help = "Current longitude of the worker")]
        lon: Option<f64>,

        #[arg(
            long = "captured-at",
            help = "When the GPS fix was captured (RFC 3339); omit for 'just now'"
        )]
        captured_at: Option<String>,

        #[arg(long = "comment", help = "Optional note stored with the event")]
        comment: Option<String>,
    },

    /// Check a worker out
    Out {
        /// Worker id
        worker_id: i64,

        #[arg(long = "comment", help = "Optional note stored with the event")]
        comment: Option<String>,
    },

    /// Show the live duty status of every active worker
    Status {
        #[arg(
            long = "stale-after",
            help = "Hours after which an open shift is flagged as stale (default from config)"
        )]
        stale_after: Option<i64>,

        #[arg(long = "json", help = "Emit the snapshot as JSON")]
        json: bool,
    },

    /// List recent attendance events (most recent first)
    List {
        #[arg(long = "worker", help = "Only events for this worker id")]
        worker: Option<i64>,

        #[arg(long = "kind", help = "Only events of this kind: in | out")]
        kind: Option<String>,

        #[arg(long = "limit", help = "Maximum number of events (default 20)")]
        limit: Option<usize>,

        #[arg(long = "json", help = "Emit the events as JSON")]
        json: bool,
    },
}
