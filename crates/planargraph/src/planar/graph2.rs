//! `PlanarGraph`: the topology core plus a 2D position per vertex.

use std::ops::Deref;

use nalgebra::{Vector2, Vector3};

use crate::error::{GraphError, Result};
use crate::graph::{
    CollapseInfo, EdgeId, EdgeInsert, Graph, GroupId, SplitInfo, ValidityMode, VertexId,
};
use crate::slots::BlockArray;

use super::geom::{angle_of, is_finite, Aabb2, Affine2, Segment2};

/// Undirected graph embedded in the plane.
///
/// Read-only topology queries are reached through `Deref<Target = Graph>`;
/// every mutation goes through the methods here so positions stay in step
/// with vertex handles.
///
/// Invariants:
/// - Every live vertex has a finite position.
/// - When colors are enabled, every live vertex has a color.
#[derive(Clone, Debug, Default)]
pub struct PlanarGraph {
    graph: Graph,
    positions: BlockArray<Vector2<f64>>,
    colors: Option<BlockArray<Vector3<f32>>>,
    bounds_cache: Option<(u64, Aabb2)>,
}

impl Deref for PlanarGraph {
    type Target = Graph;
    #[inline]
    fn deref(&self) -> &Graph {
        &self.graph
    }
}

/// Old-to-new handle maps produced by `PlanarGraph::compact_copy`.
#[derive(Clone, Debug, Default)]
pub struct CompactMaps {
    pub vertices: Vec<Option<VertexId>>,
    pub edges: Vec<Option<EdgeId>>,
}

fn check_finite(p: Vector2<f64>) -> Result<()> {
    if is_finite(p) {
        Ok(())
    } else {
        Err(GraphError::NonFiniteInput { x: p.x, y: p.y })
    }
}

impl PlanarGraph {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    // ---- vertices -----------------------------------------------------------

    pub fn append_vertex(&mut self, pos: Vector2<f64>) -> Result<VertexId> {
        check_finite(pos)?;
        let v = self.graph.append_vertex();
        self.positions.insert_at(v.0, pos);
        if let Some(colors) = self.colors.as_mut() {
            colors.insert_at(v.0, Vector3::zeros());
        }
        Ok(v)
    }

    pub fn vertex(&self, v: VertexId) -> Result<Vector2<f64>> {
        self.graph.check_vertex(v)?;
        Ok(self.positions[v.0])
    }

    /// Position lookup for handles already known to be live.
    #[inline]
    pub(crate) fn pos(&self, v: VertexId) -> Vector2<f64> {
        self.positions[v.0]
    }

    pub fn set_vertex(&mut self, v: VertexId, pos: Vector2<f64>) -> Result<()> {
        self.graph.check_vertex(v)?;
        check_finite(pos)?;
        self.positions[v.0] = pos;
        self.graph.touch();
        Ok(())
    }

    /// Turn on per-vertex colors; existing vertices get `default`.
    pub fn enable_vertex_colors(&mut self, default: Vector3<f32>) {
        if self.colors.is_some() {
            return;
        }
        let mut colors = BlockArray::new();
        for v in self.graph.vertex_ids() {
            colors.insert_at(v.0, default);
        }
        self.colors = Some(colors);
    }

    #[inline]
    pub fn has_vertex_colors(&self) -> bool {
        self.colors.is_some()
    }

    pub fn vertex_color(&self, v: VertexId) -> Option<Vector3<f32>> {
        if !self.graph.is_vertex(v) {
            return None;
        }
        self.colors.as_ref().and_then(|c| c.get(v.0).copied())
    }

    pub fn set_vertex_color(&mut self, v: VertexId, color: Vector3<f32>) -> Result<()> {
        self.graph.check_vertex(v)?;
        if let Some(colors) = self.colors.as_mut() {
            colors.insert_at(v.0, color);
        }
        Ok(())
    }

    // ---- topology mutators ----------------------------------------------------

    #[inline]
    pub fn append_edge(&mut self, a: VertexId, b: VertexId, group: GroupId) -> Result<EdgeInsert> {
        self.graph.append_edge(a, b, group)
    }

    #[inline]
    pub fn remove_edge(&mut self, e: EdgeId, remove_isolated: bool) -> Result<()> {
        self.graph.remove_edge(e, remove_isolated)
    }

    #[inline]
    pub fn remove_vertex(&mut self, v: VertexId, remove_isolated: bool) -> Result<()> {
        self.graph.remove_vertex(v, remove_isolated)
    }

    /// Merge `remove` into `keep`; `keep` keeps its position.
    #[inline]
    pub fn collapse_edge(&mut self, keep: VertexId, remove: VertexId) -> Result<CollapseInfo> {
        self.graph.collapse_edge(keep, remove)
    }

    #[inline]
    pub fn allocate_group(&mut self) -> GroupId {
        self.graph.allocate_group()
    }

    #[inline]
    pub fn set_edge_group(&mut self, e: EdgeId, group: GroupId) -> Result<()> {
        self.graph.set_edge_group(e, group)
    }

    /// Split at the midpoint; color is the endpoint average.
    #[inline]
    pub fn split_edge(&mut self, e: EdgeId) -> Result<SplitInfo> {
        self.split_edge_at(e, 0.5)
    }

    /// Split with the new vertex at `lerp(a, b, alpha)`, where `[a, b] = edge_v(e)`.
    pub fn split_edge_at(&mut self, e: EdgeId, alpha: f64) -> Result<SplitInfo> {
        let [a, b] = self.graph.edge_v(e)?;
        let (pa, pb) = (self.pos(a), self.pos(b));
        let pos = pa + (pb - pa) * alpha;
        check_finite(pos)?;
        let color = self.colors.as_ref().map(|c| {
            let (ca, cb) = (c[a.0], c[b.0]);
            (ca + cb) * 0.5
        });
        let info = self.graph.split_edge(e)?;
        self.positions.insert_at(info.new_vertex.0, pos);
        if let (Some(colors), Some(col)) = (self.colors.as_mut(), color) {
            colors.insert_at(info.new_vertex.0, col);
        }
        Ok(info)
    }

    /// Split every edge longer than `max_len` by repeated bisection.
    ///
    /// Returns the number of splits performed.
    pub fn split_to_max_edge_length(&mut self, max_len: f64) -> Result<usize> {
        if !(max_len > 0.0) {
            return Ok(0);
        }
        let mut work: Vec<EdgeId> = self.graph.edge_ids().collect();
        let mut splits = 0;
        while let Some(e) = work.pop() {
            if self.edge_length(e)? <= max_len {
                continue;
            }
            let info = self.split_edge(e)?;
            work.push(e);
            work.push(info.new_edge);
            splits += 1;
        }
        Ok(splits)
    }

    /// Append a closed loop as-is (no snapping, no intersection tests).
    pub fn append_polygon(&mut self, pts: &[Vector2<f64>], group: GroupId) -> Result<Vec<VertexId>> {
        let vs = self.append_polyline(pts, group)?;
        if vs.len() > 2 {
            self.graph.append_edge(vs[vs.len() - 1], vs[0], group)?;
        }
        Ok(vs)
    }

    /// Append an open chain as-is.
    pub fn append_polyline(&mut self, pts: &[Vector2<f64>], group: GroupId) -> Result<Vec<VertexId>> {
        for &p in pts {
            check_finite(p)?;
        }
        let mut vs = Vec::with_capacity(pts.len());
        for &p in pts {
            vs.push(self.append_vertex(p)?);
        }
        for w in vs.windows(2) {
            self.graph.append_edge(w[0], w[1], group)?;
        }
        Ok(vs)
    }

    // ---- geometric queries --------------------------------------------------

    pub fn edge_segment(&self, e: EdgeId) -> Result<Segment2> {
        let [a, b] = self.graph.edge_v(e)?;
        Ok(Segment2::new(self.pos(a), self.pos(b)))
    }

    pub fn edge_center(&self, e: EdgeId) -> Result<Vector2<f64>> {
        Ok(self.edge_segment(e)?.center())
    }

    pub fn edge_length(&self, e: EdgeId) -> Result<f64> {
        Ok(self.edge_segment(e)?.length())
    }

    /// Incident edges of `v` by increasing angle of `v → other` in `[0, 2π)`.
    ///
    /// Two edges leaving in the same direction have no defined order.
    pub fn sorted_vtx_edges(&self, v: VertexId) -> Result<Vec<EdgeId>> {
        let p = self.vertex(v)?;
        let mut keyed: Vec<(f64, EdgeId)> = self
            .graph
            .vtx_edges(v)?
            .iter()
            .filter_map(|&e| {
                let o = self.graph.edge_other_v(e, v)?;
                Some((angle_of(self.pos(o) - p), e))
            })
            .collect();
        keyed.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(std::cmp::Ordering::Equal));
        Ok(keyed.into_iter().map(|(_, e)| e).collect())
    }

    /// Angle in degrees between the two edges at a valence-2 vertex.
    ///
    /// `None` for any other valence or when an incident edge has zero length.
    pub fn opening_angle(&self, v: VertexId) -> Option<f64> {
        let edges = self.graph.vtx_edges(v).ok()?;
        if edges.len() != 2 {
            return None;
        }
        let p = self.pos(v);
        let d0 = self.pos(self.graph.edge_other_v(edges[0], v)?) - p;
        let d1 = self.pos(self.graph.edge_other_v(edges[1], v)?) - p;
        let (n0, n1) = (d0.norm(), d1.norm());
        if n0 <= 0.0 || n1 <= 0.0 {
            return None;
        }
        let c = (d0.dot(&d1) / (n0 * n1)).clamp(-1.0, 1.0);
        Some(c.acos().to_degrees())
    }

    pub fn bounds(&self) -> Aabb2 {
        Aabb2::from_points(self.graph.vertex_ids().map(|v| self.pos(v)))
    }

    /// `bounds()` memoised on the graph timestamp.
    pub fn cached_bounds(&mut self) -> Aabb2 {
        let ts = self.graph.timestamp();
        match self.bounds_cache {
            Some((t, b)) if t == ts => b,
            _ => {
                let b = self.bounds();
                self.bounds_cache = Some((ts, b));
                b
            }
        }
    }

    // ---- whole-graph transforms ---------------------------------------------

    pub fn translate(&mut self, d: Vector2<f64>) {
        self.transform(&Affine2::translation(d));
    }

    pub fn transform(&mut self, f: &Affine2) {
        let ids: Vec<VertexId> = self.graph.vertex_ids().collect();
        for v in ids {
            self.positions[v.0] = f.apply(self.positions[v.0]);
        }
        self.graph.touch();
    }

    /// Dense copy (no free-list holes) plus old-to-new handle maps.
    pub fn compact_copy(&self) -> Result<(PlanarGraph, CompactMaps)> {
        let mut out = PlanarGraph::new();
        if self.colors.is_some() {
            out.enable_vertex_colors(Vector3::zeros());
        }
        let mut maps = CompactMaps {
            vertices: vec![None; self.graph.max_vertex_id()],
            edges: vec![None; self.graph.max_edge_id()],
        };
        for v in self.graph.vertex_ids() {
            let nv = out.append_vertex(self.pos(v))?;
            if let Some(c) = self.vertex_color(v) {
                out.set_vertex_color(nv, c)?;
            }
            maps.vertices[v.0] = Some(nv);
        }
        for info in self.graph.edges() {
            let (Some(a), Some(b)) = (maps.vertices[info.a.0], maps.vertices[info.b.0]) else {
                return Err(GraphError::NotAVertex(info.a));
            };
            let ne = out.graph.append_edge(a, b, info.group)?.edge();
            maps.edges[info.id.0] = Some(ne);
        }
        Ok((out, maps))
    }

    /// Topology invariants plus finite positions for every live vertex.
    pub fn check_validity(&self, mode: ValidityMode) -> Result<()> {
        self.graph.check_validity(mode)?;
        for v in self.graph.vertex_ids() {
            let p = self.pos(v);
            if !is_finite(p) {
                let msg = format!("vertex {v:?} has non-finite position ({}, {})", p.x, p.y);
                match mode {
                    ValidityMode::Panic => panic!("graph invariant violated: {msg}"),
                    ValidityMode::Log => tracing::warn!(violation = %msg, "graph invariant violated"),
                    ValidityMode::Error => return Err(GraphError::InvariantViolated(msg)),
                }
            }
        }
        Ok(())
    }
}
