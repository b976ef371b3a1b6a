mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::amortization::{EmiArgs, ScheduleArgs};
use commands::schemes::CompareSchemesArgs;

/// Environment variable holding the log filter (e.g. `debug`, `lcalc=trace`).
const LOG_ENV: &str = "LCALC_LOG";

/// EMI and amortization schedule calculations
#[derive(Parser)]
#[command(
    name = "lcalc",
    version,
    about = "EMI and amortization schedule calculations",
    long_about = "A CLI for equated monthly installment (EMI) calculations with decimal \
                  precision. Computes the rounded EMI, full reducing-balance repayment \
                  schedules, and side-by-side loan scheme comparisons."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the equated monthly installment
    Emi(EmiArgs),
    /// Generate the full amortization schedule
    Schedule(ScheduleArgs),
    /// Compare EMI and total cost across loan schemes
    CompareSchemes(CompareSchemesArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::amortization::run_emi(args),
        Commands::Schedule(args) => commands::amortization::run_schedule(args),
        Commands::CompareSchemes(args) => commands::schemes::run_compare_schemes(args),
        Commands::Version => {
            println!("lcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
