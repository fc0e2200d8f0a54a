mod commands;
mod feeds;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::curve::{CurveArgs, ExportArgs};
use commands::daily::DailyArgs;
use commands::months::MonthsArgs;
use commands::solve::SolveArgs;

/// Forward-curve analytics for the PX/PTA complex
#[derive(Parser)]
#[command(
    name = "cva",
    version,
    about = "Forward-curve analytics for the PX/PTA complex",
    long_about = "Builds the 12-month PX/PTA curve grid from feed snapshots, \
                  repairs gaps in the USD/CNH column, composes daily change \
                  and calendar-spread reports, and solves implied curve \
                  values with sensitivity ladders."
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
    /// Build the 12-month curve grid from feed snapshots
    Curve(CurveArgs),
    /// Compose session-over-session changes and calendar spreads
    Daily(DailyArgs),
    /// Solve an implied curve value and emit its scenario ladder
    Solve(SolveArgs),
    /// Show the active delivery-month selection
    Months(MonthsArgs),
    /// Write the curve grid to a CSV file
    Export(ExportArgs),
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
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Curve(args) => commands::curve::run_curve(args),
        Commands::Daily(args) => commands::daily::run_daily(args),
        Commands::Solve(args) => commands::solve::run_solve(args),
        Commands::Months(args) => commands::months::run_months(args),
        Commands::Export(args) => commands::curve::run_export(args),
        Commands::Version => {
            println!("cva {}", env!("CARGO_PKG_VERSION"));
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
