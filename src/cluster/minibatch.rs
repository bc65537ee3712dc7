//! Mini-batch k-means.
//!
//! Each iteration draws `batch_size` sample indices uniformly *with
//! replacement*, assigns only those, and folds the batch into the centroids
//! as a running weighted average. With per-cluster running counts `N_total`
//! the update is exact: every centroid is the mean of every sample it has
//! been assigned across all batches so far (Sculley, 2010).
//!
//! Labels for a batch are positional (slot `j` belongs to the `j`-th draw),
//! so a sample drawn twice occupies two slots and chunk writes never
//! overlap.
//!
//! # Stopping
//!
//! - relative centroid change ≤ `tol` → `Converged`
//! - batch inertia fails to beat its best for more than `max_no_improve`
//!   consecutive iterations → `EarlyStopped`
//! - `max_iter` reached → `MaxIterExhausted`

use ndarray::ArrayView2;
use rand::Rng;
use tracing::{debug, info, instrument, warn};

use super::assign::assign_pass;
use super::convergence::{check_tolerance, relative_error, FitState, NoImprovement};
use super::init::{check_cluster_count, initial_centroids, rng_from_seed, InitAlgorithm};
use super::partition::Partition;
use super::pool::WorkerPool;
use super::trained::{FitReport, TrainedKmeans};
use super::traits::Clustering;
use super::update::{minibatch_update, CentroidBuffers, ClusterStats};
use super::{
    DEFAULT_BATCH_SIZE, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_ITER, DEFAULT_MAX_NO_IMPROVE, DEFAULT_TOL,
};
use crate::error::{Error, Result};

/// Stochastic mini-batch k-means.
#[derive(Debug, Clone)]
pub struct MiniBatchKmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum iterations.
    max_iter: usize,
    /// Convergence tolerance on the relative centroid change.
    tol: f64,
    /// Samples drawn per iteration.
    batch_size: usize,
    /// Patience of the no-improvement rule.
    max_no_improve: usize,
    /// Samples per worker task.
    chunk_size: usize,
    /// Seeding strategy.
    init: InitAlgorithm,
    /// Random seed.
    seed: Option<u64>,
    /// Worker threads; one per processor when unset.
    num_workers: Option<usize>,
}

impl MiniBatchKmeans {
    /// Create a new mini-batch k-means clusterer.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: DEFAULT_MAX_ITER,
            tol: DEFAULT_TOL,
            batch_size: DEFAULT_BATCH_SIZE,
            max_no_improve: DEFAULT_MAX_NO_IMPROVE,
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

    /// Set the number of samples drawn per iteration.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set how many consecutive non-improving iterations are tolerated.
    pub fn with_max_no_improve(mut self, max_no_improve: usize) -> Self {
        self.max_no_improve = max_no_improve;
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
    #[instrument(
        skip(self, data),
        fields(k = self.k, n = data.nrows(), d = data.ncols(), batch_size = self.batch_size)
    )]
    pub fn fit(&self, data: ArrayView2<'_, f64>) -> Result<TrainedKmeans> {
        check_cluster_count(self.k, data.nrows())?;
        check_tolerance(self.tol)?;
        if self.batch_size == 0 {
            return Err(Error::InvalidParameter {
                name: "batch_size",
                message: "must be at least 1",
            });
        }
        let (n, d) = data.dim();
        // Batches have a fixed length, so one partition serves every draw.
        let partition = Partition::new(self.batch_size, self.chunk_size)?;
        let pool = WorkerPool::new(self.num_workers)?;

        let mut report = FitReport::new();
        let mut rng = rng_from_seed(self.seed);
        let initial = initial_centroids(self.init, data, self.k, &mut rng)?;

        let mut batch = vec![0usize; self.batch_size];
        let mut labels = vec![0usize; self.batch_size];
        let mut stats = ClusterStats::new(self.k, d);
        let mut totals = vec![0usize; self.k];
        let mut buffers = CentroidBuffers::new(initial);
        let mut tracker = NoImprovement::new(self.max_no_improve);
        report.state = FitState::Iterating;

        for iteration in 0..self.max_iter {
            for slot in batch.iter_mut() {
                *slot = rng.random_range(0..n);
            }

            let inertia = assign_pass(
                &pool,
                data,
                buffers.current(),
                &batch,
                &partition,
                &mut labels,
            );

            stats.reset();
            stats.accumulate(data, &batch, &labels);
            let (current, next) = buffers.split();
            minibatch_update(&stats, &mut totals, current, next);

            let error = relative_error(buffers.current(), buffers.next());
            buffers.swap();
            report.record(error, inertia);
            debug!(iteration, error, inertia, "mini-batch iteration complete");

            if error <= self.tol {
                report.state = FitState::Converged;
                break;
            }
            if tracker.observe(iteration, inertia) {
                report.state = FitState::EarlyStopped;
                debug!(
                    iteration,
                    stalled = tracker.stalled(),
                    "batch inertia stopped improving"
                );
                break;
            }
        }

        if report.state == FitState::Iterating {
            report.state = FitState::MaxIterExhausted;
            warn!(max_iter = self.max_iter, "mini-batch did not converge");
        }
        if let Some((best_iteration, best_inertia)) = tracker.best() {
            report.best_iteration = Some(best_iteration);
            report.best_inertia = Some(best_inertia);
        }

        info!(
            state = %report.state,
            iterations = report.iterations,
            best_inertia = ?report.best_inertia,
            workers = pool.num_workers(),
            "mini-batch fit complete"
        );

        Ok(TrainedKmeans::from_fit(
            buffers.into_current(),
            report,
            self.chunk_size,
            self.num_workers,
        ))
    }
}

impl Clustering for MiniBatchKmeans {
    fn fit(&self, data: ArrayView2<'_, f64>) -> Result<TrainedKmeans> {
        MiniBatchKmeans::fit(self, data)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}
