//! Tolerance defaults.
//!
//! Policy
//! - Fixed constants cover the predicates that should not need tuning. The
//!   caller-facing knobs (snap distance, hash cell size) live in
//!   `arrangement::ArrangementCfg` and `arrangement::CutterCfg`.

/// Default merge distance for arrangement vertices.
pub const VERTEX_SNAP_TOL: f64 = 1e-5;
/// Below this squared length a direction is treated as degenerate.
pub(crate) const ZERO_LEN_SQ: f64 = 1e-24;
/// Relative threshold for `perp(d0, d1)` when deciding that two segments are parallel.
pub(crate) const PARALLEL_EPS: f64 = 1e-12;
/// Parameters along a segment closer than this are treated as the same point.
pub(crate) const PARAM_EPS: f64 = 1e-9;
/// Default hash cell size when the caller gives no bounding-box hint.
pub(crate) const DEFAULT_CELL_SIZE: f64 = 0.1;
/// Target cells per axis when deriving the cell size from a bounding box.
pub(crate) const CELLS_PER_AXIS: f64 = 64.0;
/// Face loops with `signed_area <= AREA_EPS * extent²` are classified as outer.
pub(crate) const AREA_EPS: f64 = 1e-12;
