use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "agenda", version, about = "Conference agenda display CLI")]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace). RUST_LOG wins when set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print what is on now as JSON
    Status {
        /// Show this day instead of the detected one
        #[arg(long)]
        day: Option<String>,
    },
    /// List the configured days
    Days {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a day's programme
    Schedule {
        /// Day to print (defaults to the detected day)
        #[arg(long)]
        day: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve a day and time without reading the clock
    Resolve {
        /// Day name, e.g. "Day 1"
        #[arg(long)]
        day: String,
        /// Venue-local time as HH:MM
        #[arg(long)]
        at: String,
    },
    /// Validate the configured agenda
    Check,
    /// Print engine diagnostics as JSON
    Diagnostics,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Drive a display until interrupted, printing each status change
    Run(commands::run::RunArgs),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Status { day } => commands::status::run(day.as_deref()),
        Commands::Days { json } => commands::schedule::days(json),
        Commands::Schedule { day, json } => commands::schedule::run(day.as_deref(), json),
        Commands::Resolve { day, at } => commands::schedule::resolve_at(&day, &at),
        Commands::Check => commands::check::run(),
        Commands::Diagnostics => commands::status::diagnostics(),
        Commands::Config { action } => commands::config::run(action),
        Commands::Run(args) => commands::run::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
