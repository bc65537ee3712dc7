//! Euclidean distance kernels.
//!
//! The assignment step calls these O(n·k) times per iteration, so the slice
//! kernel is unrolled four lanes wide. Rows that are not contiguous in memory
//! fall back to a plain zipped iterator.

use ndarray::ArrayView1;

/// Squared Euclidean distance between two equal-length slices.
#[inline]
pub fn squared_l2(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());

    let mut lanes = [0.0f64; 4];
    let a_chunks = a.chunks_exact(4);
    let b_chunks = b.chunks_exact(4);
    let a_tail = a_chunks.remainder();
    let b_tail = b_chunks.remainder();

    for (x, y) in a_chunks.zip(b_chunks) {
        for lane in 0..4 {
            let diff = x[lane] - y[lane];
            lanes[lane] += diff * diff;
        }
    }

    let tail: f64 = a_tail
        .iter()
        .zip(b_tail)
        .map(|(x, y)| (x - y) * (x - y))
        .sum();

    (lanes[0] + lanes[1]) + (lanes[2] + lanes[3]) + tail
}

/// Euclidean (unsquared) distance between two equal-length slices.
#[inline]
pub fn l2(a: &[f64], b: &[f64]) -> f64 {
    squared_l2(a, b).sqrt()
}

/// Euclidean distance between two matrix rows.
#[inline]
pub fn row_l2(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    match (a.as_slice(), b.as_slice()) {
        (Some(a), Some(b)) => l2(a, b),
        _ => a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_squared_l2_matches_naive() {
        // Lengths exercise the unrolled body, the tail, and both together.
        for len in [0usize, 1, 3, 4, 5, 8, 11] {
            let a: Vec<f64> = (0..len).map(|i| i as f64 * 0.5).collect();
            let b: Vec<f64> = (0..len).map(|i| (len - i) as f64).collect();
            let naive: f64 = a.iter().zip(&b).map(|(x, y)| (x - y).powi(2)).sum();
            assert!((squared_l2(&a, &b) - naive).abs() < 1e-9, "len={len}");
        }
    }

    #[test]
    fn test_l2_is_unsquared() {
        assert!((l2(&[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < 1e-12);
        assert_eq!(l2(&[1.5, -2.0], &[1.5, -2.0]), 0.0);
    }

    #[test]
    fn test_row_l2_non_contiguous_rows() {
        // Columns of a row-major matrix are strided views.
        let m = array![[0.0, 3.0], [0.0, 4.0]];
        let zeros = array![[0.0, 0.0], [0.0, 0.0]];
        let d = row_l2(m.column(1), zeros.column(0));
        assert!((d - 5.0).abs() < 1e-12);
    }
}
