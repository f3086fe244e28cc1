//! arrest-bias CLI
//!
//! Usage:
//!   arrest-bias simulate -i compas.csv -p 0.3 --seed 42
//!   arrest-bias simulate -i compas.csv --age-category "25 - 45" -f json
//!   arrest-bias sweep -i compas.csv --fractions 0,0.2,0.4 -f csv
//!   arrest-bias simulate -c run.json -p 0.5

use arrest_bias::cli::{Cli, Commands};
use arrest_bias::pipeline::{default_sweep_fractions, BiasPipeline};
use arrest_bias::Result;
use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Simulate { run, bias_fraction } => {
            let config = run.resolve(*bias_fraction)?;
            let report = BiasPipeline::new(config)?.run()?;
            print!("{}", report.render(cli.format)?);
        }
        Commands::Sweep { run, fractions } => {
            let config = run.resolve(None)?;
            let fractions = if fractions.is_empty() {
                default_sweep_fractions()
            } else {
                fractions.clone()
            };
            let report = BiasPipeline::new(config)?.sweep(&fractions)?;
            print!("{}", report.render(cli.format)?);
        }
    }
    Ok(())
}

/// Logs go to stderr so stdout carries only the report.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
