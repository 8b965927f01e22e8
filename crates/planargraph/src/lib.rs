//! Planar arrangement and topological graph engine.
//!
//! Layers, bottom-up:
//! - `slots`: ref-counted handle allocator and a segmented array with stable addresses.
//! - `graph`: undirected graph topology over handles (no geometry).
//! - `planar`: 2D positions, angular order, tolerant geometric predicates.
//! - `arrangement`: crossing-free insertion of segments, polylines, polygons; line cuts.
//! - `extract`: face loops (cells) and maximal curves.
//! - `sample`: seeded random inputs for tests and benches.
//!
//! API Policy
//! - Mutation goes through the operations on `Graph`, `PlanarGraph`, and
//!   `Arrangement`; adjacency lists are never exposed mutably.
//! - See `api` for the curated surface.

pub mod api;
pub mod arrangement;
pub mod cfg;
pub mod error;
pub mod extract;
pub mod graph;
pub mod planar;
pub mod sample;
pub mod slots;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{GraphError, Result};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::arrangement::{Arrangement, ArrangementCfg, CutterCfg, LineCutter};
    pub use crate::error::{GraphError, Result};
    pub use crate::extract::{extract_cells, extract_curves, Cell, CellExtractor, Curve};
    pub use crate::graph::{EdgeId, EdgeInsert, Graph, GroupId, ValidityMode, VertexId, NO_GROUP};
    pub use crate::planar::{Aabb2, Affine2, Line2, PlanarGraph, Segment2};
    pub use nalgebra::Vector2 as Vec2;
}
