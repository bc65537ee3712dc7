//! Centroid initialization.
//!
//! ## K-means++
//!
//! 1. Choose the first centroid uniformly from the rows of the dataset
//! 2. For every later centroid, weight each row by its distance to the
//!    nearest centroid chosen so far and sample one row from that weighting
//!
//! The weighting here is the *unsquared* Euclidean distance D(x), not the
//! D(x)² of Arthur & Vassilvitskii (2007). Distances are recomputed against
//! every chosen centroid each round, so seeding costs O(k²·n·d).
//!
//! ## Random
//!
//! Every coordinate is |z| with z ~ N(0, 1). Ignores the data entirely.

use core::fmt;
use core::str::FromStr;

use ndarray::{Array2, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use super::distance::row_l2;
use crate::error::{Error, Result};

/// Strategy used to pick the starting centroids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InitAlgorithm {
    /// Distance-weighted row sampling.
    #[default]
    #[serde(rename = "kmeans++")]
    KmeansPlusPlus,
    /// Half-normal coordinates.
    #[serde(rename = "random")]
    Random,
}

impl fmt::Display for InitAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitAlgorithm::KmeansPlusPlus => write!(f, "kmeans++"),
            InitAlgorithm::Random => write!(f, "random"),
        }
    }
}

impl FromStr for InitAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "kmeans++" => Ok(InitAlgorithm::KmeansPlusPlus),
            "random" => Ok(InitAlgorithm::Random),
            other => Err(Error::Other(format!("invalid init algorithm: {other}"))),
        }
    }
}

/// Generator for one fit, seeded from the thread RNG when `seed` is unset.
pub(crate) fn rng_from_seed(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    StdRng::seed_from_u64(seed)
}

/// Reject `k == 0` and `k > n`.
pub(crate) fn check_cluster_count(k: usize, n_items: usize) -> Result<()> {
    if k == 0 || k > n_items {
        return Err(Error::InvalidClusterCount {
            requested: k,
            n_items,
        });
    }
    Ok(())
}

/// Build the `k × d` starting centroid matrix.
pub fn initial_centroids<R: Rng + ?Sized>(
    init: InitAlgorithm,
    data: ArrayView2<'_, f64>,
    k: usize,
    rng: &mut R,
) -> Result<Array2<f64>> {
    check_cluster_count(k, data.nrows())?;

    Ok(match init {
        InitAlgorithm::KmeansPlusPlus => kmeans_plus_plus(data, k, rng),
        InitAlgorithm::Random => random(data.ncols(), k, rng),
    })
}

fn random<R: Rng + ?Sized>(d: usize, k: usize, rng: &mut R) -> Array2<f64> {
    Array2::from_shape_simple_fn((k, d), || rng.sample::<f64, _>(StandardNormal).abs())
}

fn kmeans_plus_plus<R: Rng + ?Sized>(data: ArrayView2<'_, f64>, k: usize, rng: &mut R) -> Array2<f64> {
    let n = data.nrows();
    let mut centroids = Array2::zeros((k, data.ncols()));

    let first = rng.random_range(0..n);
    centroids.row_mut(0).assign(&data.row(first));

    let mut cumulative = vec![0.0f64; n];
    for i in 1..k {
        let mut total = 0.0;
        for (j, slot) in cumulative.iter_mut().enumerate() {
            let point = data.row(j);
            let nearest = (0..i)
                .map(|c| row_l2(point, centroids.row(c)))
                .fold(f64::MAX, f64::min);
            total += nearest;
            *slot = total;
        }

        // First cumulative entry >= r. With all-zero weights r is 0 and row 0 wins.
        let r = total * rng.random::<f64>();
        let selected = cumulative.partition_point(|&c| c < r).min(n - 1);
        centroids.row_mut(i).assign(&data.row(selected));
    }

    centroids
}
