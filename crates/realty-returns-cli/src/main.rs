mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::catalog::CatalogArgs;
use commands::currency::FormatArgs;
use commands::investment::{MetricsArgs, ScheduleArgs, SensitivityArgs};

/// Buy-to-let investment metrics for Dubai property listings
#[derive(Parser)]
#[command(
    name = "realty",
    version,
    about = "Buy-to-let investment metrics for Dubai property listings",
    long_about = "Computes mortgage payment, cash flow, yields and 5-year returns for a \
                  property under an adjustable financing scenario, with decimal precision. \
                  Also prints amortization schedules, scenario sensitivity grids and the \
                  property catalog."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter used when REALTY_LOG is unset (e.g. "debug", "realty_returns_core=trace")
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute investment metrics for one property and scenario
    Metrics(MetricsArgs),
    /// Yearly amortization schedule for a fixed-rate mortgage
    Schedule(ScheduleArgs),
    /// Sweep two scenario assumptions and tabulate one metric
    Sensitivity(SensitivityArgs),
    /// List catalog properties with metrics under default assumptions
    Catalog(CatalogArgs),
    /// Format an AED amount in a display currency
    Format(FormatArgs),
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

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_env("REALTY_LOG")
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Metrics(args) => commands::investment::run_metrics(args),
        Commands::Schedule(args) => commands::investment::run_schedule(args),
        Commands::Sensitivity(args) => commands::investment::run_sensitivity(args),
        Commands::Catalog(args) => commands::catalog::run_catalog(args),
        Commands::Format(args) => commands::currency::run_format(args),
        Commands::Version => {
            println!("realty {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
