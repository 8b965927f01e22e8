use nalgebra::Vector2;
use tracing::{debug, trace};

use crate::cfg::PARAM_EPS;
use crate::error::{GraphError, Result};
use crate::graph::{EdgeId, EdgeInsert, GroupId, VertexId, NO_GROUP};
use crate::planar::{
    geom::is_finite, intersect_segments, Aabb2, Line2, PlanarGraph, Segment2,
    SegmentIntersection, Side,
};

use super::cutter::{CutResult, LineCutter};
use super::hash_grid::PointHashGrid;
use super::{ArrangementCfg, CutterCfg};

/// A vertex on the segment being inserted, keyed by its parameter along it.
#[derive(Clone, Copy, Debug)]
struct Hit {
    t: f64,
    v: VertexId,
    /// Hits produced by the same colinear overlap share this tag.
    overlap: Option<usize>,
}

/// Planar graph kept free of crossings under segment insertion.
///
/// Invariants (given no colinear overlaps crossed by a third edge):
/// - No two edges cross in their interiors.
/// - No two live vertices lie within `vertex_snap_tol` of each other, unless
///   a split placed them there.
/// - Every live vertex is registered in the hash grid.
#[derive(Clone, Debug)]
pub struct Arrangement {
    graph: PlanarGraph,
    grid: PointHashGrid,
    cfg: ArrangementCfg,
}

impl Default for Arrangement {
    fn default() -> Self {
        Self::new(ArrangementCfg::default())
    }
}

impl Arrangement {
    pub fn new(cfg: ArrangementCfg) -> Self {
        let grid = match cfg.cell_size {
            Some(s) => PointHashGrid::new(s),
            None => PointHashGrid::default(),
        };
        Self {
            graph: PlanarGraph::new(),
            grid,
            cfg,
        }
    }

    /// Size the hash grid for input expected inside `bounds`.
    pub fn with_bounds_hint(bounds: &Aabb2, cfg: ArrangementCfg) -> Self {
        let grid = match cfg.cell_size {
            Some(s) => PointHashGrid::new(s),
            None if !bounds.is_empty() => PointHashGrid::for_bounds(bounds),
            None => PointHashGrid::default(),
        };
        Self {
            graph: PlanarGraph::new(),
            grid,
            cfg,
        }
    }

    #[inline]
    pub fn graph(&self) -> &PlanarGraph {
        &self.graph
    }

    pub fn into_graph(self) -> PlanarGraph {
        self.graph
    }

    #[inline]
    pub fn cfg(&self) -> &ArrangementCfg {
        &self.cfg
    }

    #[inline]
    fn tol(&self) -> f64 {
        self.cfg.vertex_snap_tol
    }

    // ---- lookup ---------------------------------------------------------------

    /// Live vertex within the snap tolerance of `p`, if any.
    pub fn find_existing_vertex(&self, p: Vector2<f64>) -> Option<VertexId> {
        self.find_nearest_vertex(p, self.tol(), |_| false)
    }

    /// Closest live vertex within `radius` of `p` for which `ignore` is false.
    pub fn find_nearest_vertex<I>(&self, p: Vector2<f64>, radius: f64, ignore: I) -> Option<VertexId>
    where
        I: Fn(VertexId) -> bool,
    {
        let g = &self.graph;
        self.grid.find_nearest_in_radius(p, radius, |v| g.pos(v), ignore)
    }

    fn new_vertex(&mut self, p: Vector2<f64>) -> Result<VertexId> {
        let v = self.graph.append_vertex(p)?;
        self.grid.insert(v, p);
        Ok(v)
    }

    fn existing_or_new_vertex(&mut self, p: Vector2<f64>) -> Result<VertexId> {
        match self.find_existing_vertex(p) {
            Some(v) => Ok(v),
            None => self.new_vertex(p),
        }
    }

    // ---- insertion ------------------------------------------------------------

    /// Insert isolated points, reusing vertices within the snap tolerance.
    pub fn insert_points(&mut self, pts: &[Vector2<f64>]) -> Result<Vec<VertexId>> {
        check_all_finite(pts)?;
        pts.iter().map(|&p| self.existing_or_new_vertex(p)).collect()
    }

    /// Open chain; each consecutive pair goes through `insert_segment`.
    pub fn insert_polyline(&mut self, pts: &[Vector2<f64>], group: GroupId) -> Result<Vec<EdgeId>> {
        check_all_finite(pts)?;
        let mut out = Vec::new();
        for w in pts.windows(2) {
            out.extend(self.insert_segment(w[0], w[1], group)?);
        }
        Ok(out)
    }

    /// Closed loop; the closing segment is added when `pts.len() > 2`.
    pub fn insert_polygon(&mut self, pts: &[Vector2<f64>], group: GroupId) -> Result<Vec<EdgeId>> {
        check_all_finite(pts)?;
        let mut out = self.insert_polyline(pts, group)?;
        if pts.len() > 2 {
            out.extend(self.insert_segment(pts[pts.len() - 1], pts[0], group)?);
        }
        Ok(out)
    }

    /// Insert segment `[a, b]` with edge group `group`.
    ///
    /// Endpoints within the snap tolerance of an existing vertex reuse it.
    /// Every edge the segment touches is split at the contact point, and the
    /// segment is added as edges between consecutive contact vertices. Returns
    /// the edges created for the segment (existing edges it ran along are not
    /// included).
    ///
    /// A segment shorter than the tolerance adds no edges; at most one new
    /// vertex is placed, at `a`, when neither endpoint snapped.
    pub fn insert_segment(
        &mut self,
        a: Vector2<f64>,
        b: Vector2<f64>,
        group: GroupId,
    ) -> Result<Vec<EdgeId>> {
        check_all_finite(&[a, b])?;
        let tol = self.tol();

        let a_idx = self.find_existing_vertex(a);
        let b_idx = self.find_existing_vertex(b);
        if a_idx.is_some() && a_idx == b_idx {
            return Ok(Vec::new());
        }
        let a = a_idx.map_or(a, |v| self.graph.pos(v));
        let b = b_idx.map_or(b, |v| self.graph.pos(v));

        if (b - a).norm() < tol {
            if a_idx.is_none() && b_idx.is_none() {
                self.new_vertex(a)?;
            }
            return Ok(Vec::new());
        }

        let seg = Segment2::new(a, b);
        let contacts = self.find_intersecting_edges(&seg)?;
        trace!(a = ?a, b = ?b, contacts = contacts.len(), "insert_segment");

        let mut hits: Vec<Hit> = Vec::with_capacity(contacts.len() + 2);
        for (k, (eid, contact)) in contacts.into_iter().enumerate() {
            match contact {
                SegmentIntersection::Empty => {}
                SegmentIntersection::Point { p, .. } => {
                    let (v, _) = self.split_at_point(eid, p)?;
                    hits.push(Hit {
                        t: seg.project(self.graph.pos(v)),
                        v,
                        overlap: None,
                    });
                }
                SegmentIntersection::Overlap { p0, p1, .. } => {
                    let (v0, new_e) = self.split_at_point(eid, p0)?;
                    // p1 lies on one of the two halves left by the first split
                    let target = match new_e {
                        Some(ne) => {
                            let d_new = self.graph.edge_segment(ne)?.distance(p1);
                            let d_old = self.graph.edge_segment(eid)?.distance(p1);
                            if d_new < d_old {
                                ne
                            } else {
                                eid
                            }
                        }
                        None => eid,
                    };
                    let (v1, _) = self.split_at_point(target, p1)?;
                    for v in [v0, v1] {
                        hits.push(Hit {
                            t: seg.project(self.graph.pos(v)),
                            v,
                            overlap: Some(k),
                        });
                    }
                }
            }
        }

        let va = match a_idx {
            Some(v) => v,
            None => self.existing_or_new_vertex(a)?,
        };
        let vb = match b_idx {
            Some(v) => v,
            None => self.existing_or_new_vertex(b)?,
        };
        hits.push(Hit {
            t: 0.0,
            v: va,
            overlap: None,
        });
        hits.push(Hit {
            t: 1.0,
            v: vb,
            overlap: None,
        });
        hits.sort_by(|x, y| x.t.partial_cmp(&y.t).unwrap_or(std::cmp::Ordering::Equal));

        let mut added = Vec::new();
        for w in hits.windows(2) {
            let (h0, h1) = (w[0], w[1]);
            if h0.v == h1.v {
                continue;
            }
            if h0.overlap.is_some() && h0.overlap == h1.overlap {
                continue;
            }
            if (h1.t - h0.t).abs() < PARAM_EPS {
                debug!(v0 = ?h0.v, v1 = ?h1.v, t = h0.t, "distinct vertices at the same parameter");
                continue;
            }
            match self.graph.append_edge(h0.v, h1.v, group)? {
                EdgeInsert::Added(e) => added.push(e),
                EdgeInsert::Duplicate(_) => {}
            }
        }
        self.graph.debug_check_validity();
        Ok(added)
    }

    /// Existing edges touching `seg`, paired with the contact.
    ///
    /// Runs before any mutation so a failed consistency check leaves the graph untouched.
    fn find_intersecting_edges(
        &self,
        seg: &Segment2,
    ) -> Result<Vec<(EdgeId, SegmentIntersection)>> {
        let tol = self.tol();
        let line = Line2::through(seg.a, seg.b);
        let mut out = Vec::new();
        for info in self.graph.edges() {
            let edge = Segment2::new(self.graph.pos(info.a), self.graph.pos(info.b));
            let sa = seg.which_side(edge.a, tol);
            let sb = seg.which_side(edge.b, tol);
            if sa == sb && sa != Side::On {
                continue;
            }
            let contact = intersect_segments(&edge, seg, tol);
            if contact.is_empty() {
                let strict = matches!(
                    (sa, sb),
                    (Side::Positive, Side::Negative) | (Side::Negative, Side::Positive)
                );
                if strict && crossing_is_interior(line.as_ref(), &edge, seg, tol) {
                    return Err(GraphError::ArrangementInvariantViolated(format!(
                        "edge {:?} straddles the segment but no intersection was found",
                        info.id
                    )));
                }
                continue;
            }
            out.push((info.id, contact));
        }
        Ok(out)
    }

    /// Vertex at `p` on edge `e`: an endpoint when within tolerance, else a split.
    ///
    /// Returns the vertex and the edge created by the split, if any.
    fn split_at_point(&mut self, e: EdgeId, p: Vector2<f64>) -> Result<(VertexId, Option<EdgeId>)> {
        let tol = self.tol();
        let [va, vb] = self.graph.edge_v(e)?;
        let seg = Segment2::new(self.graph.pos(va), self.graph.pos(vb));
        if (p - seg.a).norm() < tol {
            return Ok((va, None));
        }
        if (p - seg.b).norm() < tol {
            return Ok((vb, None));
        }
        let t = seg.project(p).clamp(0.0, 1.0);
        let info = self.graph.split_edge_at(e, t)?;
        self.grid.insert(info.new_vertex, self.graph.pos(info.new_vertex));
        trace!(edge = ?e, t, vertex = ?info.new_vertex, "split at contact");
        Ok((info.new_vertex, Some(info.new_edge)))
    }

    // ---- repair and cutting -------------------------------------------------------

    /// Join each valence-1 vertex to the nearest other valence-1 vertex within `dist`.
    ///
    /// Pairs already joined by an edge are skipped. Joins are inserted through
    /// `insert_segment` with `NO_GROUP`, so they are split against the graph
    /// like any other input. Returns the number of joins attempted.
    pub fn connect_open_boundaries(&mut self, dist: f64) -> Result<usize> {
        let open: Vec<VertexId> = self
            .graph
            .vertex_ids()
            .filter(|&v| self.graph.is_boundary_vertex(v))
            .collect();
        let mut joins = 0;
        for v in open {
            if !self.graph.is_vertex(v) || !self.graph.is_boundary_vertex(v) {
                continue;
            }
            let p = self.graph.pos(v);
            let g = &self.graph;
            let nearest = self.find_nearest_vertex(p, dist, |u| {
                u == v || !g.is_boundary_vertex(u) || g.find_edge(u, v).is_some()
            });
            if let Some(u) = nearest {
                let q = self.graph.pos(u);
                debug!(from = ?v, to = ?u, "joining open boundary");
                self.insert_segment(p, q, NO_GROUP)?;
                joins += 1;
            }
        }
        Ok(joins)
    }

    /// Cut the arrangement along `line`; new vertices are registered in the grid.
    pub fn cut(
        &mut self,
        line: &Line2,
        inside: Option<&dyn Fn(Vector2<f64>) -> bool>,
    ) -> Result<CutResult> {
        let cfg = CutterCfg {
            tol: self.tol(),
            ..CutterCfg::default()
        };
        let res = LineCutter::new(&mut self.graph, cfg).cut(line, inside)?;
        for &v in &res.new_vertices {
            self.grid.insert(v, self.graph.pos(v));
        }
        Ok(res)
    }
}

fn check_all_finite(pts: &[Vector2<f64>]) -> Result<()> {
    match pts.iter().find(|p| !is_finite(**p)) {
        Some(p) => Err(GraphError::NonFiniteInput { x: p.x, y: p.y }),
        None => Ok(()),
    }
}

/// Whether the supporting line of `seg` crosses `edge` strictly inside `seg`.
fn crossing_is_interior(line: Option<&Line2>, edge: &Segment2, seg: &Segment2, tol: f64) -> bool {
    let Some(line) = line else {
        return false;
    };
    let Some(t) = line.intersect_segment_param(edge) else {
        return false;
    };
    let s = line.param(edge.point_at(t));
    let len = seg.length();
    s > tol && s < len - tol
}
