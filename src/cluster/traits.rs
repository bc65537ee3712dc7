//! Clustering traits.

use ndarray::ArrayView2;

use super::trained::TrainedKmeans;
use crate::error::Result;

/// Trait for centroid-based clustering algorithms.
pub trait Clustering {
    /// Fit the model to `data` (`n × d`, one sample per row).
    fn fit(&self, data: ArrayView2<'_, f64>) -> Result<TrainedKmeans>;

    /// Fit, then label the same samples with the fitted centroids.
    ///
    /// Returns a vector of cluster labels, one per input row.
    fn fit_predict(&self, data: ArrayView2<'_, f64>) -> Result<Vec<usize>> {
        self.fit(data)?.predict(data)
    }

    /// Get the number of clusters.
    fn n_clusters(&self) -> usize;
}
