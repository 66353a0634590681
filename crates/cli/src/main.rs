mod args;
mod commands;
pub mod defaults;
mod printing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pva_sim::analysis::ExtinctionCriterion;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use args::InitArgs;
use commands::{export, init, inspect, risk, run, validate};

/// PVA: Population Viability Analysis
///
/// Projects a population forward under environmental, demographic and
/// parametric uncertainty and estimates its quasi-extinction risk.
#[derive(Parser, Debug)]
#[command(name = "pva")]
#[command(author, version, about = "Estimates quasi-extinction risk from stochastic population projections", long_about = None)]
struct Cli {
    /// Number of threads to use for parallel processing
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    /// Emit debug logs (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize a new projection configuration.
    ///
    /// Validates the parameters and stores them in a database without running anything.
    Init(Box<InitArgs>),

    /// Run the projection stored in a database.
    ///
    /// Simulates every replicate, records the trajectories and reports the
    /// quasi-extinction probability.
    Run {
        /// Database path
        #[arg(short, long, default_value = defaults::OUTPUT_DB)]
        database: PathBuf,

        /// Override random seed (default: use configured seed)
        #[arg(long)]
        seed: Option<u64>,

        /// Override quasi-extinction threshold (default: use configured threshold)
        #[arg(long)]
        threshold: Option<f64>,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Info: Show configuration and stored results of a projection.
    Info {
        /// Database path
        #[arg(short, long, default_value = defaults::OUTPUT_DB)]
        database: PathBuf,
    },

    /// Risk: Evaluate quasi-extinction probabilities from stored trajectories.
    Risk {
        /// Database path
        #[arg(short, long, default_value = defaults::OUTPUT_DB)]
        database: PathBuf,

        /// Thresholds to evaluate (e.g., "10,50,100"); defaults to the configured one
        #[arg(short = 'T', long, value_delimiter = ',')]
        thresholds: Vec<f64>,

        /// Which population size is compared (final-year, running-minimum)
        #[arg(short, long, default_value = "final-year")]
        criterion: ExtinctionCriterion,

        /// Output format (pretty, csv, json)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },

    /// Export data to other formats (CSV, JSON).
    ///
    /// Use this to get data out for charting in Python, R, or other tools.
    Export {
        /// Database path
        #[arg(short, long, default_value = defaults::OUTPUT_DB)]
        database: PathBuf,

        /// Output format (csv, json)
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// What to export (trajectories, summary, metadata)
        #[arg(long, default_value = "trajectories")]
        data_type: String,
    },

    /// Validate database integrity.
    ///
    /// Checks row counts and that every stored trajectory is a valid projection.
    Validate {
        /// Database path
        #[arg(short, long, default_value = defaults::OUTPUT_DB)]
        database: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    match cli.command {
        Commands::Init(args) => {
            init::init_simulation(&args)?;
        }
        Commands::Run {
            database,
            seed,
            threshold,
            no_progress,
        } => {
            run::run_simulation(&database, seed, threshold, !no_progress)?;
        }
        Commands::Info { database } => {
            inspect::show_info(&database)?;
        }
        Commands::Risk {
            database,
            thresholds,
            criterion,
            format,
        } => {
            risk::show_risk(&database, &thresholds, criterion, &format)?;
        }
        Commands::Export {
            database,
            format,
            output,
            data_type,
        } => {
            export::export_data(&database, &format, output.as_ref(), &data_type)?;
        }
        Commands::Validate { database } => {
            validate::validate_database(&database)?;
        }
    }

    Ok(())
}
