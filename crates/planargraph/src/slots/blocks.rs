//! Segmented growable buffer with stable element addresses.
//!
//! Elements live in fixed-size boxed blocks; growth appends a block instead of
//! reallocating, so references into earlier blocks are never moved. Block size
//! is a power of two and indexing is a shift plus a mask.

use std::ops::{Index, IndexMut};

const BLOCK_SHIFT: usize = 8;
pub const BLOCK_SIZE: usize = 1 << BLOCK_SHIFT;
const BLOCK_MASK: usize = BLOCK_SIZE - 1;

/// Append-friendly, randomly indexable buffer of fixed-size blocks.
///
/// Invariants:
/// - `len <= blocks.len() * BLOCK_SIZE`.
/// - Slots in `[len, capacity)` hold `T::default()`.
#[derive(Clone, Debug, Default)]
pub struct BlockArray<T> {
    blocks: Vec<Box<[T]>>,
    len: usize,
}

impl<T: Default> BlockArray<T> {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.blocks.len() * BLOCK_SIZE
    }

    fn grow_to(&mut self, capacity: usize) {
        while self.capacity() < capacity {
            let block: Box<[T]> = std::iter::repeat_with(T::default)
                .take(BLOCK_SIZE)
                .collect();
            self.blocks.push(block);
        }
    }

    /// Append `value`, returning its index.
    pub fn push(&mut self, value: T) -> usize {
        let i = self.len;
        self.grow_to(i + 1);
        self.blocks[i >> BLOCK_SHIFT][i & BLOCK_MASK] = value;
        self.len += 1;
        i
    }

    /// Write `value` at `i`, growing with defaults if `i` is past the end.
    pub fn insert_at(&mut self, i: usize, value: T) {
        if i >= self.len {
            self.grow_to(i + 1);
            self.len = i + 1;
        }
        self.blocks[i >> BLOCK_SHIFT][i & BLOCK_MASK] = value;
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<&T> {
        if i < self.len {
            Some(&self.blocks[i >> BLOCK_SHIFT][i & BLOCK_MASK])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        if i < self.len {
            Some(&mut self.blocks[i >> BLOCK_SHIFT][i & BLOCK_MASK])
        } else {
            None
        }
    }

    /// Drop all elements; keeps allocated blocks.
    pub fn clear(&mut self) {
        for block in &mut self.blocks {
            for v in block.iter_mut() {
                *v = T::default();
            }
        }
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.blocks.iter().flat_map(|b| b.iter()).take(self.len)
    }
}

impl<T: Default> Index<usize> for BlockArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        assert!(i < self.len, "BlockArray index {i} out of range (len {})", self.len);
        &self.blocks[i >> BLOCK_SHIFT][i & BLOCK_MASK]
    }
}

impl<T: Default> IndexMut<usize> for BlockArray<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        assert!(i < self.len, "BlockArray index {i} out of range (len {})", self.len);
        &mut self.blocks[i >> BLOCK_SHIFT][i & BLOCK_MASK]
    }
}

impl<T: Default> FromIterator<T> for BlockArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut out = BlockArray::new();
        for v in iter {
            out.push(v);
        }
        out
    }
}
