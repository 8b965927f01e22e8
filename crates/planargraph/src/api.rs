//! Curated API surface (UNSTABLE).
//!
//! Important
//! - Convenience re-exports for the CLI, benches, and downstream geometry
//!   code. Breaking changes are allowed while the engine settles.

// Handles and storage
pub use crate::slots::{BlockArray, SlotAllocator};
// Topology
pub use crate::graph::{
    CollapseInfo, EdgeId, EdgeInfo, EdgeInsert, Graph, GroupId, SplitInfo, ValidityMode,
    VertexId, NO_GROUP,
};
// Planar geometry
pub use crate::planar::{
    intersect_segments, polygon_contains, signed_area, Aabb2, Affine2, CompactMaps, Line2,
    PlanarGraph, Segment2, SegmentIntersection, Side,
};
// Arrangement and cutting
pub use crate::arrangement::{
    cut_graph, Arrangement, ArrangementCfg, CutResult, CutterCfg, LineCutter, PointHashGrid,
};
// Extraction
pub use crate::extract::{
    cell_polygon, chain_group, curve_points, extract_cells, extract_curves, Cell, CellExtractor,
    Curve, CurveExtractor,
};
// Random inputs
pub use crate::sample::{
    draw_segment_soup, draw_star_polygon, RadialCfg, ReplayToken, SoupCfg, VertexCount,
};
// Tolerances
pub use crate::cfg::VERTEX_SNAP_TOL;
