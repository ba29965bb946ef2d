mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::investment::{AnalyzeArgs, MetricsArgs, ProjectArgs};
use commands::mortgage::{BalanceArgs, PaymentArgs, ScheduleArgs};

/// Mortgage and rental investment calculations for CDMX listings
#[derive(Parser)]
#[command(
    name = "polpi",
    version,
    about = "Mortgage and rental investment calculations for CDMX listings",
    long_about = "A CLI for the listing investment calculator with decimal precision. \
                  Supports fixed-rate mortgage payments, outstanding balances, \
                  amortization schedules, equity projections, cap rate and \
                  cash-on-cash analysis."
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
    /// Fixed monthly payment of an amortizing loan
    Payment(PaymentArgs),
    /// Outstanding principal after a number of payments
    Balance(BalanceArgs),
    /// Month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Cash flow, cap rate and cash-on-cash return for a listing
    Metrics(MetricsArgs),
    /// Project property value, loan balance and equity over time
    Project(ProjectArgs),
    /// Full listing analysis (metrics, ratings, projection, recommendations)
    Analyze(AnalyzeArgs),
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

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::mortgage::run_payment(args),
        Commands::Balance(args) => commands::mortgage::run_balance(args),
        Commands::Schedule(args) => commands::mortgage::run_schedule(args),
        Commands::Metrics(args) => commands::investment::run_metrics(args),
        Commands::Project(args) => commands::investment::run_project(args),
        Commands::Analyze(args) => commands::investment::run_analyze(args),
        Commands::Version => {
            println!("polpi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
