//! Propose facility sites from population and competitor CSV files.
//!
//! Reads both inputs concurrently, runs the optimizer, writes the JSON
//! result for the dashboard and prints a summary report to stdout.
//!
//! Usage: `optimize-sites --population population.csv --competitors week1.csv --output results.json`

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::{error, info, LevelFilter};
use sitekmeans_rs::io::{load_inputs, write_result};
use sitekmeans_rs::logging::{init_logger, LogFormat, LogOptions};
use sitekmeans_rs::report::format_report;
use sitekmeans_rs::{OptimizerConfig, OptimizerError, SiteOptimizer};

#[derive(Parser, Debug)]
#[command(name = "optimize-sites")]
#[command(about = "Select facility sites that maximize captured population away from competitors")]
struct Args {
    /// Population CSV with rows of area_id,population,lat,long.
    #[arg(long, default_value = "population.csv")]
    population: PathBuf,

    /// Competitor CSV with rows of id,lat,long.
    #[arg(long, default_value = "week1.csv")]
    competitors: PathBuf,

    /// Where to write the JSON result.
    #[arg(long, default_value = "optimization_results.json")]
    output: PathBuf,

    /// Number of locations to propose.
    #[arg(short = 'k', long = "locations", default_value_t = 10)]
    locations: usize,

    /// Random seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum refinement iterations.
    #[arg(long, default_value_t = 30)]
    max_iters: usize,

    /// Log level: off, error, warn, info, debug or trace.
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Log line format: compact or pretty.
    #[arg(long, default_value = "compact")]
    log_format: LogFormat,

    /// Omit timestamps from log lines.
    #[arg(long)]
    no_log_timestamp: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_options = LogOptions {
        level: args.log_level,
        format: args.log_format,
        timestamp: !args.no_log_timestamp,
        output: args.log_output.clone(),
    };
    if let Err(e) = init_logger(&log_options) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), OptimizerError> {
    let start = Instant::now();
    info!("=== LOCATION OPTIMIZATION ===");

    let (populations, competitors) = load_inputs(&args.population, &args.competitors)?;
    info!(
        "Loaded {} competitors, {} population areas",
        competitors.len(),
        populations.len()
    );

    let config = OptimizerConfig::new(args.locations)
        .with_max_iters(args.max_iters)
        .with_seed(args.seed);
    let optimizer = SiteOptimizer::with_config(config);
    let result = optimizer.optimize(&populations, &competitors)?;

    write_result(&args.output, &result)?;
    print!("{}", format_report(&result));

    info!(
        "Done: {} locations in {:.2}s",
        result.locations.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
