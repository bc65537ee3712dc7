//! Per-cluster accumulation and centroid updates.
//!
//! Both variants write the new centroids into the `next` buffer while the
//! assignment that produced the statistics read from `current`. A cluster that
//! received no samples keeps its current centroid unchanged; it is never
//! reseeded.

use ndarray::{Array2, ArrayView2, Zip};

/// The two centroid matrices of a fit.
///
/// Assignment reads `current`, the updater writes `next`, and
/// [`CentroidBuffers::swap`] makes the freshly written matrix current.
#[derive(Debug, Clone)]
pub struct CentroidBuffers {
    current: Array2<f64>,
    next: Array2<f64>,
}

impl CentroidBuffers {
    /// Start from `initial`, with a zeroed `next` of the same shape.
    pub fn new(initial: Array2<f64>) -> Self {
        let next = Array2::zeros(initial.raw_dim());
        Self {
            current: initial,
            next,
        }
    }

    /// The matrix assignment reads from.
    pub fn current(&self) -> ArrayView2<'_, f64> {
        self.current.view()
    }

    /// The most recently written update target.
    pub fn next(&self) -> ArrayView2<'_, f64> {
        self.next.view()
    }

    /// Borrow `current` for reading and `next` for writing at once.
    pub fn split(&mut self) -> (ArrayView2<'_, f64>, &mut Array2<f64>) {
        (self.current.view(), &mut self.next)
    }

    /// Exchange the two buffers.
    pub fn swap(&mut self) {
        core::mem::swap(&mut self.current, &mut self.next);
    }

    /// Consume the buffers, keeping `current`.
    pub fn into_current(self) -> Array2<f64> {
        self.current
    }
}

/// Per-cluster feature sums and sample counts for one pass.
#[derive(Debug, Clone)]
pub struct ClusterStats {
    sums: Array2<f64>,
    counts: Vec<usize>,
}

impl ClusterStats {
    /// Zeroed statistics for `k` clusters of dimension `d`.
    pub fn new(k: usize, d: usize) -> Self {
        Self {
            sums: Array2::zeros((k, d)),
            counts: vec![0; k],
        }
    }

    /// Zero sums and counts.
    pub fn reset(&mut self) {
        self.sums.fill(0.0);
        self.counts.fill(0);
    }

    /// Add `data.row(samples[j])` to the sum of cluster `labels[j]`.
    pub fn accumulate(&mut self, data: ArrayView2<'_, f64>, samples: &[usize], labels: &[usize]) {
        debug_assert_eq!(samples.len(), labels.len());

        for (&i, &cluster) in samples.iter().zip(labels) {
            let mut sum = self.sums.row_mut(cluster);
            sum += &data.row(i);
            self.counts[cluster] += 1;
        }
    }

    /// Samples per cluster.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Feature sums, one row per cluster.
    pub fn sums(&self) -> ArrayView2<'_, f64> {
        self.sums.view()
    }
}

/// Lloyd update: `next = sum / count`, or `current` for empty clusters.
pub fn lloyd_update(stats: &ClusterStats, current: ArrayView2<'_, f64>, next: &mut Array2<f64>) {
    for (c, &count) in stats.counts.iter().enumerate() {
        if count > 0 {
            let scale = 1.0 / count as f64;
            Zip::from(next.row_mut(c))
                .and(stats.sums.row(c))
                .for_each(|out, &sum| *out = sum * scale);
        } else {
            next.row_mut(c).assign(&current.row(c));
        }
    }
}

/// Mini-batch update with per-cluster running counts.
///
/// For a cluster that received `n_batch` samples this batch, with
/// `N_total` samples seen so far including this batch:
///
/// ```text
/// next = (n_batch / N_total) · batch_mean + (1 − n_batch / N_total) · current
/// ```
///
/// which equals the mean of every sample the cluster has been assigned.
/// `totals` persists across iterations and is never reset.
pub fn minibatch_update(
    stats: &ClusterStats,
    totals: &mut [usize],
    current: ArrayView2<'_, f64>,
    next: &mut Array2<f64>,
) {
    debug_assert_eq!(totals.len(), stats.counts.len());

    for (c, &n_batch) in stats.counts.iter().enumerate() {
        if n_batch == 0 {
            next.row_mut(c).assign(&current.row(c));
            continue;
        }

        totals[c] += n_batch;
        let weight = n_batch as f64 / totals[c] as f64;
        let inv_batch = 1.0 / n_batch as f64;

        Zip::from(next.row_mut(c))
            .and(stats.sums.row(c))
            .and(current.row(c))
            .for_each(|out, &sum, &old| *out = weight * (sum * inv_batch) + (1.0 - weight) * old);
    }
}
