//! Turn a graph back into geometry: face loops and maximal curves.
//!
//! Cells
//! - Require a crossing-free graph (an `Arrangement` output). Each vertex
//!   contributes one wedge per incident edge; walking the wedges visits every
//!   directed edge exactly once and yields one loop per face side.
//! - Orientation: incident edges are sorted counter-clockwise, and a walk
//!   leaves through the edge just clockwise of the one it arrived by. Bounded
//!   faces therefore close counter-clockwise (positive area); the outer face of
//!   each connected component closes clockwise or, for trees, has zero area.
//!
//! Curves
//! - Work on any graph. Open chains run between boundary and junction
//!   vertices; leftover valence-2 cycles become closed loops.

mod cells;
mod curves;

pub use cells::{cell_polygon, extract_cells, Cell, CellExtractor};
pub use curves::{chain_group, curve_points, extract_curves, Curve, CurveExtractor};
