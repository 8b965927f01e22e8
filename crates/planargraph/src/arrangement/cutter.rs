use nalgebra::Vector2;
use tracing::{debug, trace};

use crate::error::{GraphError, Result};
use crate::graph::{EdgeId, EdgeInsert, VertexId};
use crate::planar::{Line2, PlanarGraph, Segment2, Side};

use super::CutterCfg;

/// What a cut added to the graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CutResult {
    /// Vertices created by splitting edges that straddle the line.
    pub new_vertices: Vec<VertexId>,
    /// On-line edges inserted between consecutive crossings.
    pub new_edges: Vec<EdgeId>,
}

#[derive(Clone, Copy, Debug)]
struct LineHit {
    s: f64,
    v: VertexId,
    /// Set when the hit is an endpoint of an edge lying on the line.
    on_edge: Option<EdgeId>,
}

/// Splits a planar graph along an infinite line.
pub struct LineCutter<'a> {
    graph: &'a mut PlanarGraph,
    cfg: CutterCfg,
}

impl<'a> LineCutter<'a> {
    pub fn new(graph: &'a mut PlanarGraph, cfg: CutterCfg) -> Self {
        Self { graph, cfg }
    }

    /// Cut every edge crossing `line`, then connect consecutive crossings along it.
    ///
    /// Edges whose endpoints lie strictly on opposite sides are split at the
    /// crossing. Vertices within `cfg.tol` of the line count as crossings
    /// themselves. Consecutive crossings are joined by a new edge unless they
    /// are the same vertex, are the two ends of an edge already on the line, or
    /// `inside` rejects the midpoint of the span.
    pub fn cut(
        &mut self,
        line: &Line2,
        inside: Option<&dyn Fn(Vector2<f64>) -> bool>,
    ) -> Result<CutResult> {
        let tol = self.cfg.tol;
        let mut res = CutResult::default();
        let mut hits: Vec<LineHit> = Vec::new();

        let edges: Vec<_> = self.graph.edges().collect();
        for info in edges {
            let (pa, pb) = (self.graph.pos(info.a), self.graph.pos(info.b));
            let sa = line.which_side(pa, tol);
            let sb = line.which_side(pb, tol);
            match (sa, sb) {
                (Side::On, Side::On) => {
                    for (v, p) in [(info.a, pa), (info.b, pb)] {
                        hits.push(LineHit {
                            s: line.param(p),
                            v,
                            on_edge: Some(info.id),
                        });
                    }
                }
                (Side::On, _) => hits.push(LineHit {
                    s: line.param(pa),
                    v: info.a,
                    on_edge: None,
                }),
                (_, Side::On) => hits.push(LineHit {
                    s: line.param(pb),
                    v: info.b,
                    on_edge: None,
                }),
                (Side::Positive, Side::Negative) | (Side::Negative, Side::Positive) => {
                    let seg = Segment2::new(pa, pb);
                    let t = line.intersect_segment_param(&seg).ok_or_else(|| {
                        GraphError::ArrangementInvariantViolated(format!(
                            "edge {:?} straddles the cut line but is parallel to it",
                            info.id
                        ))
                    })?;
                    let t = t.clamp(0.0, 1.0);
                    // split_edge_at interpolates from edge_v[0], which is info.a
                    let split = self.graph.split_edge_at(info.id, t)?;
                    let v = split.new_vertex;
                    trace!(edge = ?info.id, t, vertex = ?v, "cut edge");
                    res.new_vertices.push(v);
                    hits.push(LineHit {
                        s: line.param(self.graph.pos(v)),
                        v,
                        on_edge: None,
                    });
                }
                _ => {}
            }
        }

        hits.sort_by(|x, y| x.s.partial_cmp(&y.s).unwrap_or(std::cmp::Ordering::Equal));

        for w in hits.windows(2) {
            let (h0, h1) = (w[0], w[1]);
            if h0.v == h1.v {
                continue;
            }
            if h0.on_edge.is_some() && h0.on_edge == h1.on_edge {
                continue;
            }
            if (h1.s - h0.s).abs() <= tol {
                debug!(v0 = ?h0.v, v1 = ?h1.v, "coincident crossings");
                continue;
            }
            if let Some(test) = inside {
                let mid = (self.graph.pos(h0.v) + self.graph.pos(h1.v)) * 0.5;
                if !test(mid) {
                    continue;
                }
            }
            if let EdgeInsert::Added(e) = self.graph.append_edge(h0.v, h1.v, self.cfg.group)? {
                res.new_edges.push(e);
            }
        }
        self.graph.debug_check_validity();
        Ok(res)
    }
}

/// One-shot cut with default settings apart from `tol`.
pub fn cut_graph(graph: &mut PlanarGraph, line: &Line2, tol: f64) -> Result<CutResult> {
    let cfg = CutterCfg {
        tol,
        ..CutterCfg::default()
    };
    LineCutter::new(graph, cfg).cut(line, None)
}
