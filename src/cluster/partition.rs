//! Splitting a position range into contiguous chunks.
//!
//! A partition of `0..len` is the work list for one assignment pass: one
//! worker task per chunk. Chunks are disjoint and cover every position
//! exactly once, so each task can own the matching slice of the label
//! buffer outright.

use core::ops::Range;

use crate::error::{Error, Result};

/// Ordered, disjoint chunks covering `0..len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    chunks: Vec<Range<usize>>,
    len: usize,
}

impl Partition {
    /// Partition `0..len` into chunks of `chunk_size`; the last chunk takes
    /// the remainder.
    pub fn new(len: usize, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidParameter {
                name: "chunk_size",
                message: "must be at least 1",
            });
        }

        let chunks = (0..len)
            .step_by(chunk_size)
            .map(|start| start..(start + chunk_size).min(len))
            .collect();

        Ok(Self { chunks, len })
    }

    /// Chunk ranges in order.
    pub fn chunks(&self) -> &[Range<usize>] {
        &self.chunks
    }

    /// Number of positions covered.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the partition covers no positions.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Split `buf` along the chunk boundaries into disjoint mutable slices.
    pub fn split_mut<'a, T>(&self, buf: &'a mut [T]) -> Vec<&'a mut [T]> {
        debug_assert_eq!(buf.len(), self.len);

        let mut out = Vec::with_capacity(self.chunks.len());
        let mut rest = buf;
        for chunk in &self.chunks {
            let (head, tail) = core::mem::take(&mut rest).split_at_mut(chunk.len());
            out.push(head);
            rest = tail;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_remainder_goes_last() {
        let p = Partition::new(10, 4).unwrap();
        assert_eq!(p.chunks(), &[0..4, 4..8, 8..10]);
    }

    #[test]
    fn test_chunk_larger_than_len() {
        let p = Partition::new(3, 1024).unwrap();
        assert_eq!(p.chunks(), &[0..3]);
    }

    #[test]
    fn test_empty_range_has_no_chunks() {
        let p = Partition::new(0, 8).unwrap();
        assert!(p.chunks().is_empty());
        assert!(p.is_empty());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(matches!(
            Partition::new(5, 0),
            Err(Error::InvalidParameter {
                name: "chunk_size",
                ..
            })
        ));
    }

    #[test]
    fn test_split_mut_matches_chunks() {
        let p = Partition::new(7, 3).unwrap();
        let mut buf: Vec<usize> = (0..7).collect();
        let parts = p.split_mut(&mut buf);

        assert_eq!(parts.len(), 3);
        assert_eq!(&*parts[0], &[0, 1, 2]);
        assert_eq!(&*parts[1], &[3, 4, 5]);
        assert_eq!(&*parts[2], &[6]);
    }

    proptest! {
        #[test]
        fn prop_chunks_cover_each_position_once(len in 0usize..500, chunk_size in 1usize..64) {
            let p = Partition::new(len, chunk_size).unwrap();

            let flat: Vec<usize> = p.chunks().iter().cloned().flatten().collect();
            prop_assert_eq!(flat, (0..len).collect::<Vec<_>>());

            for chunk in p.chunks() {
                prop_assert!(!chunk.is_empty());
                prop_assert!(chunk.len() <= chunk_size);
            }
            let (last, full) = p.chunks().split_last().map_or((None, &[][..]), |(l, f)| (Some(l), f));
            for chunk in full {
                prop_assert_eq!(chunk.len(), chunk_size);
            }
            prop_assert_eq!(last.is_none(), len == 0);
        }
    }
}
