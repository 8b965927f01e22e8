//! Topology core: undirected graph with ref-counted vertex/edge handles.
//!
//! Purpose
//! - Own all adjacency bookkeeping behind a handful of checked mutators
//!   (`append_edge`, `remove_edge`, `split_edge`, `collapse_edge`, plus
//!   `remove_vertex`). Nothing else writes adjacency lists.
//!
//! Conventions
//! - Edges store endpoints as (min, max) so duplicate detection is a single
//!   adjacency lookup.
//! - A vertex's ref count is `valence + 1`; the extra reference keeps an
//!   isolated vertex alive until it is removed explicitly.
//! - Each mutator checks its preconditions before touching state, so a failing
//!   call leaves the graph as it was.
//!
//! Code cross-refs: `slots::{SlotAllocator, BlockArray}`, `planar::PlanarGraph`.

mod topology;
mod types;
mod validity;

pub use topology::Graph;
pub use types::{
    CollapseInfo, EdgeId, EdgeInfo, EdgeInsert, GroupId, SplitInfo, ValidityMode, VertexId,
    NO_GROUP,
};
