//! # cleave
//!
//! Parallel k-means: full-batch Lloyd and stochastic mini-batch fitting,
//! k-means++ or random seeding, and nearest-centroid prediction.
//!
//! Fitting runs on a fixed-size worker pool; each iteration splits the
//! samples into contiguous chunks and labels them concurrently. The fitted
//! model is an immutable centroid matrix.
//!
//! ```rust
//! use cleave::{Clustering, LloydKmeans};
//! use ndarray::array;
//!
//! let data = array![[1.0, 1.0], [1.0, 0.0], [5.0, 5.0], [6.0, 5.0]];
//! let model = LloydKmeans::new(2).with_seed(1).fit(data.view())?;
//! let labels = model.predict(data.view())?;
//! assert_eq!(labels[0], labels[1]);
//! # Ok::<(), cleave::Error>(())
//! ```

pub mod cluster;
/// Error types used across `cleave`.
pub mod error;
pub mod io;

#[cfg(test)]
mod scenario_tests;

pub use cluster::{
    Clustering, FitReport, FitState, InitAlgorithm, LloydKmeans, MiniBatchKmeans, TrainedKmeans,
};
pub use error::{Error, Result};
