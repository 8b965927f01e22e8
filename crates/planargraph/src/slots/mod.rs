//! Handle allocation: ref-counted slots with free-list reuse, backed by
//! segmented storage.
//!
//! Purpose
//! - Hand out small, stable integer handles for vertices and edges. A handle is
//!   live while its ref count is positive; at zero it is pushed on the free list
//!   and only a later `allocate` may reissue it.
//! - `BlockArray` stores every per-handle field so that growth never moves
//!   existing elements.

mod blocks;

pub use blocks::{BlockArray, BLOCK_SIZE};

use crate::error::{GraphError, Result};

/// Ref-counted index allocator with free-list reuse.
///
/// Invariants:
/// - `h` is valid iff `h < max_index()` and `ref_counts[h] > 0`.
/// - Every index on `free_list` has ref count zero, and appears once.
/// - `count == number of indices with positive ref count`.
#[derive(Clone, Debug, Default)]
pub struct SlotAllocator {
    ref_counts: BlockArray<u32>,
    free_list: Vec<usize>,
    count: usize,
}

impl SlotAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a free handle with ref count 1. Reuses the free list first.
    pub fn allocate(&mut self) -> usize {
        self.count += 1;
        if let Some(h) = self.free_list.pop() {
            self.ref_counts[h] = 1;
            h
        } else {
            self.ref_counts.push(1)
        }
    }

    #[inline]
    pub fn is_valid(&self, h: usize) -> bool {
        self.ref_counts.get(h).is_some_and(|&rc| rc > 0)
    }

    /// Current ref count; zero for freed or never-issued handles.
    #[inline]
    pub fn ref_count(&self, h: usize) -> u32 {
        self.ref_counts.get(h).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, h: usize, by: u32) -> Result<u32> {
        if !self.is_valid(h) {
            return Err(GraphError::InvalidHandle(h));
        }
        let rc = &mut self.ref_counts[h];
        *rc += by;
        Ok(*rc)
    }

    /// Lower the ref count; at zero the handle is freed.
    ///
    /// Fails without mutation if `h` is not live or `by` exceeds the count.
    pub fn decrement(&mut self, h: usize, by: u32) -> Result<u32> {
        if !self.is_valid(h) || self.ref_counts[h] < by {
            return Err(GraphError::InvalidHandle(h));
        }
        let rc = &mut self.ref_counts[h];
        *rc -= by;
        let left = *rc;
        if left == 0 {
            self.free_list.push(h);
            self.count -= 1;
        }
        Ok(left)
    }

    /// One past the highest handle ever issued.
    #[inline]
    pub fn max_index(&self) -> usize {
        self.ref_counts.len()
    }

    /// Number of live handles.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// No holes: every issued index is live.
    #[inline]
    pub fn is_dense(&self) -> bool {
        self.free_list.is_empty()
    }

    /// Fraction of issued indices that are live (1.0 when nothing was issued).
    pub fn compactness(&self) -> f64 {
        if self.max_index() == 0 {
            1.0
        } else {
            self.count as f64 / self.max_index() as f64
        }
    }

    /// Live handles in increasing order; freed slots are skipped.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.ref_counts
            .iter()
            .enumerate()
            .filter(|&(_, &rc)| rc > 0)
            .map(|(h, _)| h)
    }
}
