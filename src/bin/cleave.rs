use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cleave::cluster::{
    Clustering, InitAlgorithm, LloydKmeans, MiniBatchKmeans, TrainedKmeans, DEFAULT_BATCH_SIZE,
    DEFAULT_CHUNK_SIZE, DEFAULT_MAX_ITER, DEFAULT_MAX_NO_IMPROVE, DEFAULT_TOL,
};
use cleave::{io as matrix_io, FitState};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "cleave")]
#[command(about = "Parallel k-means clustering", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fit on samples from stdin and print the centroids
    Train {
        #[command(flatten)]
        fit: FitArgs,
    },
    /// Label samples from stdin with centroids from a file
    Predict {
        centroids: PathBuf,
        #[arg(long, default_value = ",")]
        delimiter: String,
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Time repeated fits on samples from stdin
    Benchmark {
        #[command(flatten)]
        fit: FitArgs,
        #[arg(long, default_value_t = 1)]
        repeat: u32,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    Lloyd,
    Minibatch,
}

#[derive(Debug, Args)]
struct FitArgs {
    #[arg(short = 'k', long, default_value_t = 8)]
    clusters: usize,
    #[arg(long, default_value_t = DEFAULT_MAX_ITER)]
    max_iter: usize,
    #[arg(long, default_value_t = DEFAULT_TOL)]
    tolerance: f64,
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,
    #[arg(long, default_value_t = DEFAULT_MAX_NO_IMPROVE)]
    max_no_improve: usize,
    #[arg(long, value_enum, default_value_t = Algorithm::Lloyd)]
    algorithm: Algorithm,
    #[arg(long, default_value_t = InitAlgorithm::KmeansPlusPlus)]
    init_algorithm: InitAlgorithm,
    #[arg(long, default_value = ",")]
    delimiter: String,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    workers: Option<usize>,
}

impl FitArgs {
    fn build(&self) -> Box<dyn Clustering> {
        match self.algorithm {
            Algorithm::Lloyd => {
                let mut model = LloydKmeans::new(self.clusters)
                    .with_max_iter(self.max_iter)
                    .with_tol(self.tolerance)
                    .with_chunk_size(self.chunk_size)
                    .with_init(self.init_algorithm);
                if let Some(seed) = self.seed {
                    model = model.with_seed(seed);
                }
                if let Some(workers) = self.workers {
                    model = model.with_num_workers(workers);
                }
                Box::new(model)
            }
            Algorithm::Minibatch => {
                let mut model = MiniBatchKmeans::new(self.clusters)
                    .with_max_iter(self.max_iter)
                    .with_tol(self.tolerance)
                    .with_chunk_size(self.chunk_size)
                    .with_batch_size(self.batch_size)
                    .with_max_no_improve(self.max_no_improve)
                    .with_init(self.init_algorithm);
                if let Some(seed) = self.seed {
                    model = model.with_seed(seed);
                }
                if let Some(workers) = self.workers {
                    model = model.with_num_workers(workers);
                }
                Box::new(model)
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct BenchmarkReport {
    duration_ns: u128,
    runs: u32,
    iterations: usize,
    state: FitState,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    match cli.command {
        Command::Train { fit } => train(&fit),
        Command::Predict {
            centroids,
            delimiter,
            chunk_size,
            workers,
        } => predict(&centroids, &delimiter, chunk_size, workers),
        Command::Benchmark { fit, repeat, json } => benchmark(&fit, repeat, json),
    }
}

fn train(args: &FitArgs) -> anyhow::Result<()> {
    let data = matrix_io::read_matrix(io::stdin().lock(), &args.delimiter)
        .context("reading samples")?;
    let model = args.build().fit(data.view())?;
    matrix_io::write_matrix(io::stdout().lock(), model.centroids().view(), &args.delimiter)?;
    Ok(())
}

fn predict(
    centroids: &Path,
    delimiter: &str,
    chunk_size: usize,
    workers: Option<usize>,
) -> anyhow::Result<()> {
    let model = load_model(centroids, delimiter, chunk_size, workers)?;

    let data =
        matrix_io::read_matrix(io::stdin().lock(), delimiter).context("reading samples")?;
    let labels = model.predict(data.view())?;
    matrix_io::write_labels(io::stdout().lock(), &labels)?;
    Ok(())
}

fn load_model(
    path: &Path,
    delimiter: &str,
    chunk_size: usize,
    workers: Option<usize>,
) -> anyhow::Result<TrainedKmeans> {
    let file = File::open(path)
        .with_context(|| format!("opening centroids file {}", path.display()))?;
    let centroids = matrix_io::read_matrix(BufReader::new(file), delimiter)
        .with_context(|| format!("reading centroids file {}", path.display()))?;
    let mut model = TrainedKmeans::new(centroids)?.with_chunk_size(chunk_size);
    if let Some(workers) = workers {
        model = model.with_num_workers(workers);
    }
    Ok(model)
}

fn benchmark(args: &FitArgs, repeat: u32, json: bool) -> anyhow::Result<()> {
    if repeat == 0 {
        bail!("--repeat must be at least 1");
    }

    let data = matrix_io::read_matrix(io::stdin().lock(), &args.delimiter)
        .context("reading samples")?;
    let algorithm = args.build();

    let mut total = Duration::ZERO;
    let mut last = None;
    for run in 0..repeat {
        let start = Instant::now();
        let model = algorithm.fit(data.view())?;
        let elapsed = start.elapsed();
        info!(run, elapsed_ms = elapsed.as_secs_f64() * 1e3, "fit complete");
        total += elapsed;
        last = Some(model);
    }

    let (iterations, state) = last
        .as_ref()
        .and_then(TrainedKmeans::report)
        .map(|r| (r.iterations, r.state))
        .unwrap_or((0, FitState::Initializing));

    let report = BenchmarkReport {
        duration_ns: total.as_nanos() / u128::from(repeat),
        runs: repeat,
        iterations,
        state,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} run(s), mean {:.3} ms per fit, {} iteration(s), {}",
            report.runs,
            report.duration_ns as f64 / 1e6,
            report.iterations,
            report.state
        );
    }
    Ok(())
}
