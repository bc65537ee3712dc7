//! Nearest-centroid assignment.
//!
//! One pass labels every listed sample with its nearest centroid. The sample
//! list is partitioned into chunks; each chunk becomes one pool task that owns
//! its slice of the label buffer and its own inertia slot. Partial inertias
//! are summed in chunk order after the barrier, so the total does not depend
//! on which task finished first.

use ndarray::{ArrayView1, ArrayView2};

use super::distance::row_l2;
use super::partition::Partition;
use super::pool::WorkerPool;

/// Index and distance of the centroid nearest to `point`.
///
/// Ties go to the lowest index.
pub fn nearest_centroid(point: ArrayView1<'_, f64>, centroids: ArrayView2<'_, f64>) -> (usize, f64) {
    let mut best_cluster = 0;
    let mut best_dist = f64::MAX;

    for (c, centroid) in centroids.rows().into_iter().enumerate() {
        let dist = row_l2(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best_cluster = c;
        }
    }

    (best_cluster, best_dist)
}

/// Label one chunk. `labels[j]` receives the cluster of `data.row(samples[j])`.
///
/// Returns the chunk's inertia: the sum of nearest-centroid distances.
pub fn assign_chunk(
    data: ArrayView2<'_, f64>,
    centroids: ArrayView2<'_, f64>,
    samples: &[usize],
    labels: &mut [usize],
) -> f64 {
    debug_assert_eq!(samples.len(), labels.len());

    let mut inertia = 0.0;
    for (&i, label) in samples.iter().zip(labels.iter_mut()) {
        let (cluster, dist) = nearest_centroid(data.row(i), centroids);
        *label = cluster;
        inertia += dist;
    }
    inertia
}

struct ChunkTask<'a> {
    samples: &'a [usize],
    labels: &'a mut [usize],
    inertia: &'a mut f64,
}

/// Label every sample in `samples` on the pool and return the pass inertia.
///
/// `partition` must cover `samples.len()` positions; `labels` is positional
/// with `samples`.
pub(crate) fn assign_pass(
    pool: &WorkerPool,
    data: ArrayView2<'_, f64>,
    centroids: ArrayView2<'_, f64>,
    samples: &[usize],
    partition: &Partition,
    labels: &mut [usize],
) -> f64 {
    debug_assert_eq!(partition.len(), samples.len());

    let mut partials = vec![0.0f64; partition.chunks().len()];
    let tasks: Vec<ChunkTask<'_>> = partition
        .chunks()
        .iter()
        .zip(partition.split_mut(labels))
        .zip(partials.iter_mut())
        .map(|((range, labels), inertia)| ChunkTask {
            samples: &samples[range.clone()],
            labels,
            inertia,
        })
        .collect();

    pool.scatter(tasks, |task| {
        *task.inertia = assign_chunk(data, centroids, task.samples, task.labels);
    });

    partials.iter().sum()
}
