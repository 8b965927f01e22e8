//! Incremental planar arrangement: insert segments so the graph never crosses itself.
//!
//! Purpose
//! - `Arrangement` owns a `PlanarGraph` and a `PointHashGrid`. Each inserted
//!   segment is intersected against every existing edge; hit edges are split
//!   at the intersection and the new segment is added as a chain of edges
//!   between consecutive hit vertices.
//! - `LineCutter` splits an existing graph along an infinite line and adds the
//!   on-line spans between consecutive crossings, optionally filtered by an
//!   inside test.
//!
//! Tolerances
//! - A single distance, `vertex_snap_tol`, drives every comparison: vertex
//!   reuse, the side pre-filter, and the segment intersection slack.
//!
//! Known limitation
//! - A colinear overlap that is also crossed by a third edge can still produce
//!   parallel overlapping edges. Only pairs of hits coming from the same
//!   overlap are suppressed.

mod cutter;
mod hash_grid;
mod insert;

pub use cutter::{cut_graph, CutResult, LineCutter};
pub use hash_grid::PointHashGrid;
pub use insert::Arrangement;

use crate::cfg::VERTEX_SNAP_TOL;
use crate::graph::{GroupId, NO_GROUP};

/// Knobs for `Arrangement`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrangementCfg {
    /// Merge distance for vertices; also the slack of every geometric test.
    pub vertex_snap_tol: f64,
    /// Hash cell size; `None` derives one from the bounds hint (or the default).
    pub cell_size: Option<f64>,
}

impl Default for ArrangementCfg {
    fn default() -> Self {
        Self {
            vertex_snap_tol: VERTEX_SNAP_TOL,
            cell_size: None,
        }
    }
}

/// Knobs for `LineCutter`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CutterCfg {
    /// Vertices closer than this to the line count as on it.
    pub tol: f64,
    /// Group assigned to the inserted on-line edges.
    pub group: GroupId,
}

impl Default for CutterCfg {
    fn default() -> Self {
        Self {
            tol: VERTEX_SNAP_TOL,
            group: NO_GROUP,
        }
    }
}

#[cfg(test)]
mod tests;
