//! Command line front end: analyzes a single MPS file or a list of them and writes one CSV
//! line per instance.
//!
//! ```bash
//! # all representations and widths with default limits
//! mipgraphs instances.txt -o results.csv
//!
//! # primal graph only, 60 seconds per instance, four instances at a time
//! mipgraphs instances.txt -r primal -t 60 -j 4
//! ```

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;
use mipgraphs::{
    config::AnalysisConfig,
    gens::GraphRepresentation,
    lp::MpsFormat,
    report::write_csv,
    runner::{BatchInput, TaskRunner, TaskState},
    width::{LowerBoundAlgorithm, UpperBoundAlgorithm},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Graph-width analysis of (mixed) integer linear programs
#[derive(Parser)]
#[command(name = "mipgraphs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// An MPS file, or a text file listing one MPS file per line
    input: PathBuf,

    /// Write the CSV report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML configuration file; command line options take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Graph representations to analyze (comma separated)
    #[arg(short, long, value_delimiter = ',')]
    representations: Option<Vec<GraphRepresentation>>,

    /// Column layout of the MPS files
    #[arg(long)]
    format: Option<MpsFormat>,

    /// Include the objective row in graph generation
    #[arg(long)]
    include_objective: bool,

    /// Treewidth lower bound heuristic
    #[arg(long)]
    lower_bound: Option<LowerBoundAlgorithm>,

    /// Treewidth upper bound heuristic
    #[arg(long)]
    upper_bound: Option<UpperBoundAlgorithm>,

    /// Skip treewidth bounds
    #[arg(long)]
    no_treewidth: bool,

    /// Skip torso-width bounds
    #[arg(long)]
    no_torso_width: bool,

    /// Skip tree-depth bounds
    #[arg(long)]
    no_tree_depth: bool,

    /// Number of random walks of the tree-depth heuristic
    #[arg(long)]
    trials: Option<usize>,

    /// Seed of the tree-depth heuristic
    #[arg(long)]
    seed: Option<u64>,

    /// Deadline per instance in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Seconds granted to a cancelled instance to stop
    #[arg(long)]
    grace: Option<u64>,

    /// Number of instances analyzed concurrently
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn config(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_toml_file(path)
                .with_context(|| format!("Cannot load configuration {}", path.display()))?,
            None => AnalysisConfig::default(),
        };

        if let Some(representations) = &self.representations {
            config.representations = representations.clone();
        }
        if let Some(format) = self.format {
            config.mps_format = format;
        }
        config.include_objective |= self.include_objective;
        if let Some(algo) = self.lower_bound {
            config.lower_bound = algo;
        }
        if let Some(algo) = self.upper_bound {
            config.upper_bound = algo;
        }
        config.treewidth &= !self.no_treewidth;
        config.torso_width &= !self.no_torso_width;
        config.tree_depth &= !self.no_tree_depth;
        if let Some(trials) = self.trials {
            config.tree_depth_trials = trials;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(grace) = self.grace {
            config.shutdown_grace_secs = grace;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }

        Ok(config)
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    let config = cli.config()?;
    let instances = BatchInput::detect(&cli.input)
        .instances()
        .with_context(|| format!("Cannot read instance list {}", cli.input.display()))?;
    info!(instances = instances.len(), workers = config.workers, "Starting batch");

    let representations = config.representations.clone();
    let workers = config.workers;
    let records = TaskRunner::new(config).run_batch(&instances, workers);

    let mut writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Cannot create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    write_csv(&mut writer, &records, &representations).context("Cannot write report")?;
    writer.flush().context("Cannot write report")?;

    let completed = records
        .iter()
        .filter(|r| r.state == TaskState::Completed)
        .count();
    info!(completed, total = records.len(), "Batch finished");
    Ok(completed == records.len())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
