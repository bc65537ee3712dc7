//! K-means clustering.
//!
//! Partitions `n × d` data into k clusters by minimizing the total distance
//! from each sample to its nearest centroid.
//!
//! ## Variants
//!
//! ### Lloyd ([`LloydKmeans`])
//!
//! Full batch: every iteration assigns all n samples, then replaces each
//! centroid with the mean of its samples.
//!
//! **When to use**: small to medium n, or when you want the exact fixed point.
//!
//! ### Mini-batch ([`MiniBatchKmeans`])
//!
//! Every iteration assigns a random batch (drawn with replacement) and folds
//! it into the centroids as a running weighted average. Stops early once the
//! batch inertia stops improving.
//!
//! **When to use**: large n, where a full pass per iteration is too slow and
//! an approximate answer is fine.
//!
//! ## Parallelism
//!
//! One [`WorkerPool`] is built per fit and reused by every iteration. The
//! positions of a pass are split into contiguous chunks ([`Partition`]); each
//! chunk is one task that owns its slice of the label buffer. The pass
//! returns only after every chunk has finished, and centroid accumulation
//! starts after that.
//!
//! Assignment reads the `current` centroid matrix while the update writes
//! `next` ([`CentroidBuffers`]); the two swap at the end of each iteration.
//!
//! ## Distance
//!
//! Unsquared Euclidean throughout: assignment, inertia, and k-means++
//! weighting.
//!
//! ## Usage
//!
//! ```rust
//! use cleave::cluster::{Clustering, LloydKmeans, MiniBatchKmeans};
//! use ndarray::array;
//!
//! let data = array![
//!     [0.0, 0.0],
//!     [0.1, 0.1],
//!     [10.0, 10.0],
//!     [10.1, 10.1],
//! ];
//!
//! let model = LloydKmeans::new(2).with_seed(42).fit(data.view()).unwrap();
//! let labels = model.predict(data.view()).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//!
//! let labels = MiniBatchKmeans::new(2)
//!     .with_batch_size(16)
//!     .with_seed(42)
//!     .fit_predict(data.view())
//!     .unwrap();
//! assert_eq!(labels[2], labels[3]);
//! ```

mod assign;
mod convergence;
mod distance;
mod init;
mod lloyd;
mod minibatch;
mod partition;
mod pool;
mod trained;
mod traits;
mod update;

pub use assign::{assign_chunk, nearest_centroid};
pub use convergence::{relative_error, FitState, NoImprovement};
pub use distance::{l2, row_l2, squared_l2};
pub use init::{initial_centroids, InitAlgorithm};
pub use lloyd::LloydKmeans;
pub use minibatch::MiniBatchKmeans;
pub use partition::Partition;
pub use pool::WorkerPool;
pub use trained::{FitReport, TrainedKmeans};
pub use traits::Clustering;
pub use update::{lloyd_update, minibatch_update, CentroidBuffers, ClusterStats};

/// Default iteration budget.
pub const DEFAULT_MAX_ITER: usize = 300;
/// Default relative-change tolerance.
pub const DEFAULT_TOL: f64 = 1e-4;
/// Default samples per worker task.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;
/// Default mini-batch size.
pub const DEFAULT_BATCH_SIZE: usize = 1024;
/// Default mini-batch patience.
pub const DEFAULT_MAX_NO_IMPROVE: usize = 10;
