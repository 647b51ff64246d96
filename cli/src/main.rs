mod commands;
mod config;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::commands::{CliError, cmd_daily, cmd_log, cmd_unit, cmd_weekly};
use crate::config::Config;
use hydrate_core::Unit;
use hydrate_core::service::HydrationService;

#[derive(Parser)]
#[command(name = "hydrate", version, about = "Track your daily water intake.")]
struct Cli {
    /// Path to the database file (default: platform data directory)
    #[arg(long, global = true, env = "HYDRATE_DB", value_name = "PATH")]
    db: Option<PathBuf>,
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log an amount of water
    Log {
        /// Amount of water consumed
        #[arg(allow_negative_numbers = true)]
        amount: Option<f64>,
        /// Unit of measurement
        unit: Option<UnitArg>,
        /// Date to log for (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show total intake for today in the preferred unit
    Daily {
        /// Date to show (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show total intake for the last 7 days, including today
    Weekly {
        /// Also print a per-day table
        #[arg(short, long)]
        breakdown: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the preferred display unit
    Unit {
        /// Unit of measurement
        unit: Option<UnitArg>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitArg {
    Ml,
    Oz,
}

impl From<UnitArg> for Unit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Ml => Unit::Ml,
            UnitArg::Oz => Unit::Oz,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "hydrate=debug,hydrate_core=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        let (to_stdout, message) = report(&e);
        if to_stdout {
            println!("{message}");
        } else {
            eprintln!("{message}");
        }
        process::exit(1);
    }
}

/// Message for a failed run and whether it belongs on stdout. Usage problems
/// print their fixed text to stdout; everything else goes to stderr.
fn report(e: &anyhow::Error) -> (bool, String) {
    match e.downcast_ref::<CliError>() {
        Some(CliError::MissingArgument(message)) => (true, (*message).to_string()),
        None => (false, format!("Error: {e:#}")),
    }
}

fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = Config::load(cli.db)?;
    let svc = HydrationService::new(&config.db_path)?;

    let result = match command {
        Commands::Log {
            amount,
            unit,
            date,
            json,
        } => cmd_log(&svc, amount, unit.map(Unit::from), date, json),
        Commands::Daily { date, json } => cmd_daily(&svc, date, json),
        Commands::Weekly { breakdown, json } => cmd_weekly(&svc, breakdown, json),
        Commands::Unit { unit, json } => cmd_unit(&svc, unit.map(Unit::from), json),
    };

    result.and(svc.close())
}
