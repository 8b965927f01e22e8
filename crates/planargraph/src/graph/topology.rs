//! Topology core: vertices, edges, adjacency, and the four mutators that are
//! the only code allowed to touch adjacency lists.

use tracing::trace;

use crate::error::{GraphError, Result};
use crate::slots::{BlockArray, SlotAllocator};

use super::types::{
    CollapseInfo, EdgeInfo, EdgeInsert, EdgeId, GroupId, SplitInfo, VertexId, NO_GROUP,
};

/// Undirected graph with arbitrary valence and ref-counted handles.
///
/// Invariants (checked by `check_validity`):
/// - Both endpoints of every live edge are live vertices.
/// - Edge `(a, b)` appears exactly once in the adjacency lists of `a` and `b`.
/// - Vertex ref count is `valence + 1`.
/// - At most one edge per unordered vertex pair; endpoints stored as (min, max).
/// - Every group id is `< max_group_id`.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    vertices: SlotAllocator,
    vertex_edges: BlockArray<Vec<EdgeId>>,
    edges: SlotAllocator,
    edge_ends: BlockArray<[usize; 2]>,
    edge_groups: BlockArray<GroupId>,
    max_group_id: GroupId,
    timestamp: u64,
}

#[inline]
fn canonical(a: usize, b: usize) -> [usize; 2] {
    if a < b {
        [a, b]
    } else {
        [b, a]
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- counts and handles -------------------------------------------------

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.count()
    }
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.count()
    }
    /// One past the highest vertex handle ever issued.
    #[inline]
    pub fn max_vertex_id(&self) -> usize {
        self.vertices.max_index()
    }
    #[inline]
    pub fn max_edge_id(&self) -> usize {
        self.edges.max_index()
    }
    #[inline]
    pub fn is_compact(&self) -> bool {
        self.vertices.is_dense() && self.edges.is_dense()
    }
    /// `(vertex density, edge density)` of the two allocators.
    pub fn compactness(&self) -> (f64, f64) {
        (self.vertices.compactness(), self.edges.compactness())
    }

    #[inline]
    pub fn is_vertex(&self, v: VertexId) -> bool {
        self.vertices.is_valid(v.0)
    }
    #[inline]
    pub fn is_edge(&self, e: EdgeId) -> bool {
        self.edges.is_valid(e.0)
    }

    /// Monotone mutation counter; bumps on every successful mutation.
    #[inline]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.iter().map(VertexId)
    }
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().map(EdgeId)
    }
    pub fn edges(&self) -> impl Iterator<Item = EdgeInfo> + '_ {
        self.edges.iter().map(move |e| {
            let [a, b] = self.edge_ends[e];
            EdgeInfo {
                id: EdgeId(e),
                a: VertexId(a),
                b: VertexId(b),
                group: self.edge_groups[e],
            }
        })
    }

    /// Record a mutation made outside the topology (e.g. a moved vertex).
    #[inline]
    pub(crate) fn touch(&mut self) {
        self.timestamp += 1;
    }

    pub(crate) fn vertex_ref_count(&self, v: VertexId) -> u32 {
        self.vertices.ref_count(v.0)
    }

    // ---- groups -------------------------------------------------------------

    /// One more than the largest group id seen so far.
    #[inline]
    pub fn max_group_id(&self) -> GroupId {
        self.max_group_id
    }

    /// Reserve a fresh group id.
    pub fn allocate_group(&mut self) -> GroupId {
        let g = self.max_group_id;
        self.max_group_id += 1;
        g
    }

    fn observe_group(&mut self, group: GroupId) {
        if group >= self.max_group_id {
            self.max_group_id = group + 1;
        }
    }

    pub fn edge_group(&self, e: EdgeId) -> Result<GroupId> {
        self.check_edge(e)?;
        Ok(self.edge_groups[e.0])
    }

    pub fn set_edge_group(&mut self, e: EdgeId, group: GroupId) -> Result<()> {
        self.check_edge(e)?;
        self.edge_groups[e.0] = group;
        self.observe_group(group);
        self.timestamp += 1;
        Ok(())
    }

    pub fn edges_for_group(&self, group: GroupId) -> impl Iterator<Item = EdgeId> + '_ {
        self.edge_ids()
            .filter(move |e| self.edge_groups[e.0] == group)
    }

    // ---- queries ------------------------------------------------------------

    #[inline]
    pub(crate) fn check_vertex(&self, v: VertexId) -> Result<()> {
        if self.is_vertex(v) {
            Ok(())
        } else {
            Err(GraphError::NotAVertex(v))
        }
    }
    #[inline]
    pub(crate) fn check_edge(&self, e: EdgeId) -> Result<()> {
        if self.is_edge(e) {
            Ok(())
        } else {
            Err(GraphError::NotAnEdge(e))
        }
    }

    /// Endpoints of `e` in canonical (min, max) order.
    pub fn edge_v(&self, e: EdgeId) -> Result<[VertexId; 2]> {
        self.check_edge(e)?;
        let [a, b] = self.edge_ends[e.0];
        Ok([VertexId(a), VertexId(b)])
    }

    /// Endpoint of `e` opposite to `v`; `None` if `v` is not an endpoint.
    pub fn edge_other_v(&self, e: EdgeId, v: VertexId) -> Option<VertexId> {
        let [a, b] = *self.edge_ends.get(e.0)?;
        if !self.is_edge(e) {
            None
        } else if a == v.0 {
            Some(VertexId(b))
        } else if b == v.0 {
            Some(VertexId(a))
        } else {
            None
        }
    }

    /// Incident edges of `v` in insertion order.
    pub fn vtx_edges(&self, v: VertexId) -> Result<&[EdgeId]> {
        self.check_vertex(v)?;
        Ok(&self.vertex_edges[v.0])
    }

    pub fn vtx_neighbours(&self, v: VertexId) -> Result<impl Iterator<Item = VertexId> + '_> {
        let list = self.vtx_edges(v)?;
        Ok(list
            .iter()
            .filter_map(move |&e| self.edge_other_v(e, v)))
    }

    /// Number of incident edges; zero for dead handles.
    #[inline]
    pub fn valence(&self, v: VertexId) -> usize {
        if self.is_vertex(v) {
            self.vertex_edges[v.0].len()
        } else {
            0
        }
    }
    #[inline]
    pub fn is_boundary_vertex(&self, v: VertexId) -> bool {
        self.valence(v) == 1
    }
    #[inline]
    pub fn is_regular_vertex(&self, v: VertexId) -> bool {
        self.valence(v) == 2
    }
    #[inline]
    pub fn is_junction_vertex(&self, v: VertexId) -> bool {
        self.valence(v) >= 3
    }

    /// Edge joining `a` and `b`, if any.
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        if !self.is_vertex(a) || !self.is_vertex(b) {
            return None;
        }
        // scan the shorter list
        let (from, to) = if self.vertex_edges[a.0].len() <= self.vertex_edges[b.0].len() {
            (a, b)
        } else {
            (b, a)
        };
        self.vertex_edges[from.0]
            .iter()
            .copied()
            .find(|&e| self.edge_other_v(e, from) == Some(to))
    }

    // ---- mutators -----------------------------------------------------------

    /// New isolated vertex (ref count 1).
    pub fn append_vertex(&mut self) -> VertexId {
        let v = self.vertices.allocate();
        self.vertex_edges.insert_at(v, Vec::new());
        self.timestamp += 1;
        VertexId(v)
    }

    /// Connect `a` and `b`. An existing edge is reported as `Duplicate`.
    pub fn append_edge(&mut self, a: VertexId, b: VertexId, group: GroupId) -> Result<EdgeInsert> {
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        self.check_vertex(a)?;
        self.check_vertex(b)?;
        if let Some(e) = self.find_edge(a, b) {
            return Ok(EdgeInsert::Duplicate(e));
        }
        let e = self.edges.allocate();
        self.edge_ends.insert_at(e, canonical(a.0, b.0));
        self.edge_groups.insert_at(e, group);
        self.vertex_edges[a.0].push(EdgeId(e));
        self.vertex_edges[b.0].push(EdgeId(e));
        self.vertices.increment(a.0, 1)?;
        self.vertices.increment(b.0, 1)?;
        self.observe_group(group);
        self.timestamp += 1;
        Ok(EdgeInsert::Added(EdgeId(e)))
    }

    /// Remove `e`; with `remove_isolated`, endpoints left without edges are freed too.
    pub fn remove_edge(&mut self, e: EdgeId, remove_isolated: bool) -> Result<()> {
        self.check_edge(e)?;
        let [a, b] = self.edge_ends[e.0];
        for v in [a, b] {
            self.vertex_edges[v].retain(|&x| x != e);
            self.vertices.decrement(v, 1)?;
        }
        self.edges.decrement(e.0, 1)?;
        if remove_isolated {
            for v in [a, b] {
                if self.vertices.ref_count(v) == 1 {
                    self.vertices.decrement(v, 1)?;
                }
            }
        }
        self.timestamp += 1;
        Ok(())
    }

    /// Remove every edge at `v`, then `v` itself.
    ///
    /// With `remove_isolated`, neighbours left without edges are freed as well.
    pub fn remove_vertex(&mut self, v: VertexId, remove_isolated: bool) -> Result<()> {
        self.check_vertex(v)?;
        let incident = self.vertex_edges[v.0].clone();
        for e in incident {
            let other = self.edge_other_v(e, v);
            self.remove_edge(e, false)?;
            if let Some(o) = other {
                if remove_isolated && self.vertices.ref_count(o.0) == 1 {
                    self.vertices.decrement(o.0, 1)?;
                }
            }
        }
        self.vertices.decrement(v.0, 1)?;
        self.timestamp += 1;
        Ok(())
    }

    /// Split `(a, b)` into `(a, f)` + `(f, b)`, keeping the handle of the original edge.
    ///
    /// The new vertex has no attributes here; `PlanarGraph::split_edge_at` places it.
    pub fn split_edge(&mut self, e: EdgeId) -> Result<SplitInfo> {
        self.check_edge(e)?;
        let [a, b] = self.edge_ends[e.0];
        let group = self.edge_groups[e.0];
        let f = self.append_vertex();
        // rewrite e in place: (a, b) -> (a, f)
        self.vertex_edges[b].retain(|&x| x != e);
        self.vertices.decrement(b, 1)?;
        self.edge_ends[e.0] = canonical(a, f.0);
        self.vertex_edges[f.0].push(e);
        self.vertices.increment(f.0, 1)?;
        let new_edge = match self.append_edge(f, VertexId(b), group)? {
            EdgeInsert::Added(ne) => ne,
            EdgeInsert::Duplicate(_) => {
                return Err(GraphError::InvariantViolated(format!(
                    "split of {e:?} produced a duplicate edge"
                )))
            }
        };
        trace!(edge = e.0, new_vertex = f.0, new_edge = new_edge.0, "split_edge");
        Ok(SplitInfo {
            a: VertexId(a),
            b: VertexId(b),
            new_vertex: f,
            new_edge,
        })
    }

    /// Merge `remove` into `keep` along their shared edge.
    ///
    /// Edges at `remove` whose far end already connects to `keep` are discarded
    /// (repeated until none is left) before the rest are re-pointed to `keep`.
    /// Fails with `NoSuchEdge` when the two are not adjacent.
    pub fn collapse_edge(&mut self, keep: VertexId, remove: VertexId) -> Result<CollapseInfo> {
        self.check_vertex(keep)?;
        self.check_vertex(remove)?;
        let collapsed = self
            .find_edge(keep, remove)
            .ok_or(GraphError::NoSuchEdge(keep, remove))?;

        let mut discarded = Vec::new();
        loop {
            let dup = self.vertex_edges[remove.0]
                .iter()
                .copied()
                .filter(|&re| re != collapsed)
                .find(|&re| {
                    self.edge_other_v(re, remove)
                        .is_some_and(|o| self.find_edge(o, keep).is_some())
                });
            match dup {
                Some(re) => {
                    self.remove_edge(re, false)?;
                    discarded.push(re);
                }
                None => break,
            }
        }

        let moving: Vec<EdgeId> = self.vertex_edges[remove.0]
            .iter()
            .copied()
            .filter(|&re| re != collapsed)
            .collect();
        for re in &moving {
            let Some(other) = self.edge_other_v(*re, remove) else {
                continue;
            };
            self.edge_ends[re.0] = canonical(keep.0, other.0);
            self.vertex_edges[keep.0].push(*re);
        }
        self.vertices.increment(keep.0, moving.len() as u32)?;

        self.vertex_edges[keep.0].retain(|&x| x != collapsed);
        self.vertices.decrement(keep.0, 1)?;
        self.edges.decrement(collapsed.0, 1)?;
        self.vertex_edges[remove.0].clear();
        let rc = self.vertices.ref_count(remove.0);
        self.vertices.decrement(remove.0, rc)?;
        self.timestamp += 1;
        trace!(
            keep = keep.0,
            remove = remove.0,
            discarded = discarded.len(),
            "collapse_edge"
        );
        Ok(CollapseInfo {
            kept: keep,
            removed: remove,
            collapsed_edge: collapsed,
            discarded_edges: discarded,
        })
    }

    /// Group of `e`, or `NO_GROUP` when `e` is dead.
    #[inline]
    pub fn edge_group_or_none(&self, e: EdgeId) -> GroupId {
        if self.is_edge(e) {
            self.edge_groups[e.0]
        } else {
            NO_GROUP
        }
    }
}
