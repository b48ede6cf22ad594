mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analysis::AnalyzeArgs;
use commands::negotiation::LeverageArgs;
use commands::rent_roll::NormalizeArgs;
use commands::underwriting::{ModelArgs, ScenariosArgs};

/// Deterministic multifamily deal underwriting
#[derive(Parser)]
#[command(
    name = "realpha",
    version,
    about = "Deterministic multifamily deal underwriting",
    long_about = "Normalizes extracted rent rolls and underwrites multifamily deals with \
                  decimal precision. Supports rent roll normalization, the base-case \
                  financial model, bull/base/bear scenarios and buyer-side negotiation \
                  leverage."
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
    /// Validate and canonicalize a raw rent roll extraction
    Normalize(NormalizeArgs),
    /// Run the base-case financial model (NOI, cap rate, DSCR, IRR)
    Model(ModelArgs),
    /// Run the bull/base/bear scenario set
    Scenarios(ScenariosArgs),
    /// List buyer-side negotiation leverage points
    Leverage(LeverageArgs),
    /// Full pipeline: normalize, model, scenarios and leverage
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

/// Log to stderr so stdout stays machine-readable. `RUST_LOG` overrides the
/// default `warn` filter.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Normalize(args) => commands::rent_roll::run_normalize(args),
        Commands::Model(args) => commands::underwriting::run_model(args),
        Commands::Scenarios(args) => commands::underwriting::run_scenarios(args),
        Commands::Leverage(args) => commands::negotiation::run_leverage(args),
        Commands::Analyze(args) => commands::analysis::run_analyze(args),
        Commands::Version => {
            println!("realpha {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    let outcome = result.and_then(|value| output::format_output(&cli.output, &value));
    if let Err(e) = outcome {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(1);
    }
}
