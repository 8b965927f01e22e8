//! Handle newtypes and small result types for the topology core.

/// Identifier types for clarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// Source tag carried by every edge; `NO_GROUP` marks untagged edges.
pub type GroupId = i32;
pub const NO_GROUP: GroupId = -1;

/// Outcome of `Graph::append_edge`.
///
/// `Duplicate` is the benign "edge already there" signal; arrangement code
/// re-adds shared boundary edges routinely and treats it as a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeInsert {
    Added(EdgeId),
    Duplicate(EdgeId),
}

impl EdgeInsert {
    /// The edge joining the two endpoints, new or pre-existing.
    #[inline]
    pub fn edge(self) -> EdgeId {
        match self {
            EdgeInsert::Added(e) | EdgeInsert::Duplicate(e) => e,
        }
    }
    #[inline]
    pub fn is_added(self) -> bool {
        matches!(self, EdgeInsert::Added(_))
    }
}

/// Live edge snapshot: endpoints in canonical (min, max) order plus group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeInfo {
    pub id: EdgeId,
    pub a: VertexId,
    pub b: VertexId,
    pub group: GroupId,
}

/// Result of `Graph::split_edge` on edge `(a, b)`.
///
/// The original edge is rewritten in place to `(a, new_vertex)`; `new_edge`
/// is `(new_vertex, b)` and carries the same group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitInfo {
    pub a: VertexId,
    pub b: VertexId,
    pub new_vertex: VertexId,
    pub new_edge: EdgeId,
}

/// Result of `Graph::collapse_edge(keep, remove)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollapseInfo {
    pub kept: VertexId,
    pub removed: VertexId,
    pub collapsed_edge: EdgeId,
    /// Edges dropped because they would have duplicated an edge at `kept`.
    pub discarded_edges: Vec<EdgeId>,
}

/// How `Graph::check_validity` reacts to a broken invariant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ValidityMode {
    /// Panic on the first violation (tests, debug builds).
    #[default]
    Panic,
    /// Emit a `tracing` warning per violation and keep going.
    Log,
    /// Return the first violation as `GraphError::InvariantViolated`.
    Error,
}
