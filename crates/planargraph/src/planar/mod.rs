//! Planar specialization: 2D positions, angular order, and geometric helpers.
//!
//! Purpose
//! - `PlanarGraph` pairs the topology core with one finite `Vector2<f64>` per
//!   vertex and derives what the arrangement and extractors need: angularly
//!   sorted incident edges, opening angles, bounds.
//! - `geom` holds the tolerant predicates (side test, segment intersection).
//!
//! Conventions
//! - Angles are `atan2` normalised to `[0, 2π)`, increasing counter-clockwise
//!   with y up. The cell extractor relies on this order and nothing else.

pub mod geom;
mod graph2;

pub use geom::{
    intersect_segments, polygon_contains, signed_area, Aabb2, Affine2, Line2, Segment2,
    SegmentIntersection, Side,
};
pub use graph2::{CompactMaps, PlanarGraph};

#[cfg(test)]
mod tests;
