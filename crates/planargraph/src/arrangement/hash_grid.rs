//! Uniform spatial hash over vertex handles.
//!
//! Divides the plane into square cells of side `cell_size`. A query for the
//! nearest handle within radius `r` visits the cells overlapping the query box
//! `[p - r, p + r]`, or every occupied cell when that box covers more cells
//! than are occupied. Any radius is accepted, including infinity.

use std::collections::HashMap;

use nalgebra::Vector2;

use crate::cfg::{CELLS_PER_AXIS, DEFAULT_CELL_SIZE};
use crate::graph::VertexId;
use crate::planar::Aabb2;

/// Cell → handles whose position falls in that cell.
#[derive(Clone, Debug)]
pub struct PointHashGrid {
    cells: HashMap<(i64, i64), Vec<VertexId>>,
    cell_size: f64,
    len: usize,
}

impl Default for PointHashGrid {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl PointHashGrid {
    /// Non-positive or non-finite sizes fall back to the default.
    pub fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            DEFAULT_CELL_SIZE
        };
        Self {
            cells: HashMap::new(),
            cell_size,
            len: 0,
        }
    }

    /// Cell size derived from the extent of the expected input.
    pub fn for_bounds(bounds: &Aabb2) -> Self {
        Self::new(bounds.max_dim() / CELLS_PER_AXIS)
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
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
    fn cell_of(&self, p: Vector2<f64>) -> (i64, i64) {
        let discretize = |v: f64| (v / self.cell_size).floor() as i64;
        (discretize(p.x), discretize(p.y))
    }

    /// Register `v` at `p` (no duplicate check).
    pub fn insert(&mut self, v: VertexId, p: Vector2<f64>) {
        self.cells.entry(self.cell_of(p)).or_default().push(v);
        self.len += 1;
    }

    /// Unregister `v` previously inserted at `p`. Returns whether it was found.
    pub fn remove(&mut self, v: VertexId, p: Vector2<f64>) -> bool {
        let key = self.cell_of(p);
        let Some(list) = self.cells.get_mut(&key) else {
            return false;
        };
        let Some(i) = list.iter().position(|&x| x == v) else {
            return false;
        };
        list.swap_remove(i);
        if list.is_empty() {
            self.cells.remove(&key);
        }
        self.len -= 1;
        true
    }

    /// Closest handle within `radius` of `p`, skipping handles for which `ignore` is true.
    ///
    /// `pos` resolves a handle to its current position.
    pub fn find_nearest_in_radius<P, I>(
        &self,
        p: Vector2<f64>,
        radius: f64,
        pos: P,
        ignore: I,
    ) -> Option<VertexId>
    where
        P: Fn(VertexId) -> Vector2<f64>,
        I: Fn(VertexId) -> bool,
    {
        if !(radius >= 0.0) || self.cells.is_empty() {
            return None;
        }
        let r2 = radius * radius;
        let mut best: Option<(f64, VertexId)> = None;
        let mut consider = |list: &[VertexId]| {
            for &v in list {
                if ignore(v) {
                    continue;
                }
                let d2 = (pos(v) - p).norm_squared();
                if d2 <= r2 && best.map_or(true, |(bd, _)| d2 < bd) {
                    best = Some((d2, v));
                }
            }
        };

        // cell span of the query box, counted in f64 so huge or infinite radii
        // never reach the i64 conversion
        let lo = (p.add_scalar(-radius) / self.cell_size).map(f64::floor);
        let hi = (p.add_scalar(radius) / self.cell_size).map(f64::floor);
        let span = (hi.x - lo.x + 1.0) * (hi.y - lo.y + 1.0);
        if !span.is_finite() || span > self.cells.len() as f64 {
            for list in self.cells.values() {
                consider(list);
            }
        } else {
            let (x0, y0) = (lo.x as i64, lo.y as i64);
            let (x1, y1) = (hi.x as i64, hi.y as i64);
            for cx in x0..=x1 {
                for cy in y0..=y1 {
                    if let Some(list) = self.cells.get(&(cx, cy)) {
                        consider(list);
                    }
                }
            }
        }
        best.map(|(_, v)| v)
    }
}
