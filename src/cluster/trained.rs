//! Fitted model.

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::assign::assign_pass;
use super::convergence::FitState;
use super::partition::Partition;
use super::pool::WorkerPool;
use super::DEFAULT_CHUNK_SIZE;
use crate::error::{Error, Result};

/// Summary of how a fit ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    /// Terminal state.
    pub state: FitState,
    /// Iterations run.
    pub iterations: usize,
    /// Inertia of the last assignment pass (the batch, for mini-batch fits).
    /// `None` when no iteration ran.
    pub inertia: Option<f64>,
    /// Relative centroid change after each iteration.
    pub errors: Vec<f64>,
    /// Lowest batch inertia observed (mini-batch only).
    pub best_inertia: Option<f64>,
    /// Iteration (0-based) that produced `best_inertia`.
    pub best_iteration: Option<usize>,
}

impl FitReport {
    pub(crate) fn new() -> Self {
        Self {
            state: FitState::Initializing,
            iterations: 0,
            inertia: None,
            errors: Vec::new(),
            best_inertia: None,
            best_iteration: None,
        }
    }

    pub(crate) fn record(&mut self, error: f64, inertia: f64) {
        self.iterations += 1;
        self.errors.push(error);
        self.inertia = Some(inertia);
    }
}

/// A fitted k-means model: an immutable `k × d` centroid matrix.
#[derive(Debug, Clone)]
pub struct TrainedKmeans {
    centroids: Array2<f64>,
    report: Option<FitReport>,
    chunk_size: usize,
    num_workers: Option<usize>,
}

impl TrainedKmeans {
    /// Wrap an existing centroid matrix, e.g. one loaded from disk.
    pub fn new(centroids: Array2<f64>) -> Result<Self> {
        if centroids.nrows() == 0 {
            return Err(Error::InvalidClusterCount {
                requested: 0,
                n_items: 0,
            });
        }
        Ok(Self {
            centroids,
            report: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            num_workers: None,
        })
    }

    pub(crate) fn from_fit(
        centroids: Array2<f64>,
        report: FitReport,
        chunk_size: usize,
        num_workers: Option<usize>,
    ) -> Self {
        Self {
            centroids,
            report: Some(report),
            chunk_size,
            num_workers,
        }
    }

    /// Chunk size used by [`TrainedKmeans::predict`].
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Worker count used by [`TrainedKmeans::predict`].
    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = Some(num_workers);
        self
    }

    /// Copy of the centroid matrix.
    pub fn centroids(&self) -> Array2<f64> {
        self.centroids.clone()
    }

    /// Number of clusters.
    pub fn n_clusters(&self) -> usize {
        self.centroids.nrows()
    }

    /// Feature dimension.
    pub fn n_features(&self) -> usize {
        self.centroids.ncols()
    }

    /// How the fit ended; `None` for models built with [`TrainedKmeans::new`].
    pub fn report(&self) -> Option<&FitReport> {
        self.report.as_ref()
    }

    /// Label each row of `data` with its nearest centroid.
    pub fn predict(&self, data: ArrayView2<'_, f64>) -> Result<Vec<usize>> {
        if data.ncols() != self.centroids.ncols() {
            return Err(Error::DimensionMismatch {
                expected: self.centroids.ncols(),
                found: data.ncols(),
            });
        }

        let n = data.nrows();
        let partition = Partition::new(n, self.chunk_size)?;
        let pool = WorkerPool::new(self.num_workers)?;
        let samples: Vec<usize> = (0..n).collect();
        let mut labels = vec![0usize; n];

        let inertia = assign_pass(
            &pool,
            data,
            self.centroids.view(),
            &samples,
            &partition,
            &mut labels,
        );
        debug!(n, inertia, "predict pass complete");

        Ok(labels)
    }
}
