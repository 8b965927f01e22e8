use nalgebra::Vector2;

use crate::graph::{EdgeId, Graph, GroupId, VertexId};
use crate::planar::PlanarGraph;

/// Maximal chain of edges through valence-2 vertices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Curve {
    pub vertices: Vec<VertexId>,
    /// `edges.len() == vertices.len() - 1` when open, `== vertices.len()` when closed.
    pub edges: Vec<EdgeId>,
    /// Closed curves do not repeat their first vertex.
    pub closed: bool,
}

/// Positions along `curve`; closed curves are not repeated at the end.
pub fn curve_points(graph: &PlanarGraph, curve: &Curve) -> Vec<Vector2<f64>> {
    curve.vertices.iter().map(|&v| graph.pos(v)).collect()
}

/// The group shared by every edge of `curve`, if there is exactly one.
pub fn chain_group(graph: &Graph, curve: &Curve) -> Option<GroupId> {
    let mut groups = curve.edges.iter().map(|&e| graph.edge_group_or_none(e));
    let first = groups.next()?;
    groups.all(|g| g == first).then_some(first)
}

pub fn extract_curves(graph: &Graph) -> Vec<Curve> {
    CurveExtractor::new(graph).extract()
}

/// Splits a graph into open chains and closed loops; each edge lands in exactly one curve.
pub struct CurveExtractor<'a> {
    graph: &'a Graph,
    used: Vec<bool>,
}

impl<'a> CurveExtractor<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            used: vec![false; graph.max_edge_id()],
        }
    }

    pub fn extract(mut self) -> Vec<Curve> {
        let g = self.graph;
        let mut out = Vec::new();

        // chains anchored at boundary and junction vertices
        for v in g.vertex_ids() {
            if g.valence(v) == 0 || g.is_regular_vertex(v) {
                continue;
            }
            let incident: Vec<EdgeId> = g.vtx_edges(v).map(|es| es.to_vec()).unwrap_or_default();
            for e in incident {
                if !self.used[e.0] {
                    out.push(self.walk(v, e));
                }
            }
        }

        // what is left are pure valence-2 cycles
        for e in g.edge_ids() {
            if self.used[e.0] {
                continue;
            }
            if let Ok([a, _]) = g.edge_v(e) {
                out.push(self.walk(a, e));
            }
        }
        out
    }

    /// Follow `first` out of `start` until a non-regular vertex or `start` itself.
    fn walk(&mut self, start: VertexId, first: EdgeId) -> Curve {
        let g = self.graph;
        let mut vertices = vec![start];
        let mut edges = Vec::new();
        let (mut cur, mut e) = (start, first);
        let mut closed = false;
        loop {
            self.used[e.0] = true;
            edges.push(e);
            let Some(next) = g.edge_other_v(e, cur) else {
                break;
            };
            if next == start {
                closed = true;
                break;
            }
            vertices.push(next);
            if !g.is_regular_vertex(next) {
                break;
            }
            let Some(&cont) = g
                .vtx_edges(next)
                .ok()
                .and_then(|es| es.iter().find(|&&x| x != e))
            else {
                break;
            };
            if self.used[cont.0] {
                break;
            }
            cur = next;
            e = cont;
        }
        Curve {
            vertices,
            edges,
            closed,
        }
    }
}
