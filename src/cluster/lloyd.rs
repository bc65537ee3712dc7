//! Full-batch k-means (Lloyd).
//!
//! # Lloyd's Algorithm
//!
//! 1. Initialize k centroids (k-means++ or random)
//! 2. **Assign**: each sample → nearest centroid, chunked across the pool
//! 3. **Update**: each centroid → mean of its samples
//! 4. Repeat until the relative centroid change drops to the tolerance
//!
//! The sample range is partitioned once and the same chunks are resubmitted
//! every iteration.
//!
//! # Failure Modes
//!
//! - **Local optima**: Lloyd finds a local minimum only
//! - **Empty clusters**: a centroid that attracts no samples stays where it
//!   is for that iteration. It is not reseeded, so a badly placed random
//!   centroid can stay empty for the whole fit
//! - **Initialization sensitivity**: `InitAlgorithm::Random` ignores the data
//!   and is mostly useful as a baseline

use ndarray::ArrayView2;
use tracing::{debug, info, instrument, warn};

use super::assign::assign_pass;
use super::convergence::{check_tolerance, relative_error, FitState};
use super::init::{check_cluster_count, initial_centroids, rng_from_seed, InitAlgorithm};
use super::partition::Partition;
use super::pool::WorkerPool;
use super::trained::{FitReport, TrainedKmeans};
use super::traits::Clustering;
use super::update::{lloyd_update, CentroidBuffers, ClusterStats};
use super::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_ITER, DEFAULT_TOL};
use crate::error::Result;

/// Full-batch k-means.
#[derive(Debug, Clone)]
pub struct LloydKmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum iterations.
    max_iter: usize,
    /// Convergence tolerance on the relative centroid change.
    tol: f64,
    /// Samples per worker task.
    chunk_size: usize,
    /// Seeding strategy.
    init: InitAlgorithm,
    /// Random seed.
    seed: Option<u64>,
    /// Worker threads; one per processor when unset.
    num_workers: Option<usize>,
}

impl LloydKmeans {
    /// Create a new Lloyd k-means clusterer.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: DEFAULT_MAX_ITER,
            tol: DEFAULT_TOL,
            chunk_size: DEFAULT_CHUNK_SIZE,
            init: InitAlgorithm::default(),
            seed: None,
            num_workers: None,
        }
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the number of samples per worker task.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the initialization strategy.
    pub fn with_init(mut self, init: InitAlgorithm) -> Self {
        self.init = init;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the worker thread count.
    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = Some(num_workers);
        self
    }

    /// Fit centroids to `data` (`n × d`).
    #[instrument(skip(self, data), fields(k = self.k, n = data.nrows(), d = data.ncols()))]
    pub fn fit(&self, data: ArrayView2<'_, f64>) -> Result<TrainedKmeans> {
        check_cluster_count(self.k, data.nrows())?;
        check_tolerance(self.tol)?;
        let (n, d) = data.dim();
        let partition = Partition::new(n, self.chunk_size)?;
        let pool = WorkerPool::new(self.num_workers)?;

        let mut report = FitReport::new();
        let mut rng = rng_from_seed(self.seed);
        let initial = initial_centroids(self.init, data, self.k, &mut rng)?;

        let samples: Vec<usize> = (0..n).collect();
        let mut labels = vec![0usize; n];
        let mut stats = ClusterStats::new(self.k, d);
        let mut buffers = CentroidBuffers::new(initial);
        report.state = FitState::Iterating;

        for iteration in 0..self.max_iter {
            let inertia = assign_pass(
                &pool,
                data,
                buffers.current(),
                &samples,
                &partition,
                &mut labels,
            );

            stats.reset();
            stats.accumulate(data, &samples, &labels);
            let (current, next) = buffers.split();
            lloyd_update(&stats, current, next);

            let error = relative_error(buffers.current(), buffers.next());
            buffers.swap();
            report.record(error, inertia);
            debug!(iteration, error, inertia, "lloyd iteration complete");

            if error <= self.tol {
                report.state = FitState::Converged;
                break;
            }
        }

        if report.state == FitState::Iterating {
            report.state = FitState::MaxIterExhausted;
            warn!(max_iter = self.max_iter, "lloyd did not converge");
        }

        info!(
            state = %report.state,
            iterations = report.iterations,
            inertia = ?report.inertia,
            workers = pool.num_workers(),
            "lloyd fit complete"
        );

        Ok(TrainedKmeans::from_fit(
            buffers.into_current(),
            report,
            self.chunk_size,
            self.num_workers,
        ))
    }
}

impl Clustering for LloydKmeans {
    fn fit(&self, data: ArrayView2<'_, f64>) -> Result<TrainedKmeans> {
        LloydKmeans::fit(self, data)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}
