use nalgebra::Vector2;
use tracing::debug;

use crate::cfg::{AREA_EPS, PARAM_EPS};
use crate::error::{GraphError, Result};
use crate::graph::{EdgeId, VertexId};
use crate::planar::geom::angle_of;
use crate::planar::{polygon_contains, signed_area, Aabb2, PlanarGraph};

/// One side of a face: the closed walk around it.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    /// Loop vertices; the closing vertex is not repeated.
    pub vertices: Vec<VertexId>,
    /// `edges[i]` joins `vertices[i]` and `vertices[i + 1]` (cyclically).
    pub edges: Vec<EdgeId>,
    /// Shoelace area; positive for bounded faces.
    pub signed_area: f64,
    outer: bool,
}

impl Cell {
    /// Outer (unbounded) face of a connected component.
    #[inline]
    pub fn is_outer(&self) -> bool {
        self.outer
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Positions of the loop vertices of `cell`.
pub fn cell_polygon(graph: &PlanarGraph, cell: &Cell) -> Vec<Vector2<f64>> {
    cell.vertices.iter().map(|&v| graph.pos(v)).collect()
}

/// All face loops of a crossing-free graph.
pub fn extract_cells(graph: &PlanarGraph) -> Result<Vec<Cell>> {
    Ok(CellExtractor::new(graph)?.into_cells())
}

/// Incident edges of one vertex in counter-clockwise order.
///
/// Wedge `k` is entered through `ring[k]` and left through `ring[k - 1]`.
#[derive(Clone, Debug, Default)]
struct Ring {
    edges: Vec<EdgeId>,
    used: Vec<bool>,
}

impl Ring {
    #[inline]
    fn outgoing(&self, k: usize) -> EdgeId {
        let n = self.edges.len();
        self.edges[(k + n - 1) % n]
    }
}

/// Face loops of a crossing-free `PlanarGraph`.
#[derive(Debug)]
pub struct CellExtractor<'a> {
    graph: &'a PlanarGraph,
    cells: Vec<Cell>,
}

impl<'a> CellExtractor<'a> {
    /// Build the wedges and walk them all.
    ///
    /// Fails with `MalformedArrangement` when two edges leave a vertex in the
    /// same direction, and with `ArrangementInvariantViolated` if a walk runs
    /// into a wedge that another loop already used.
    pub fn new(graph: &'a PlanarGraph) -> Result<Self> {
        let mut rings = build_rings(graph)?;
        let mut cells = Vec::new();
        for v in graph.vertex_ids() {
            for k in 0..rings[v.0].edges.len() {
                if rings[v.0].used[k] {
                    continue;
                }
                cells.push(walk(graph, &mut rings, v, k)?);
            }
        }
        debug!(cells = cells.len(), "extracted face loops");
        Ok(Self { graph, cells })
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    pub fn bounded_cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(|c| !c.is_outer())
    }

    /// One per connected component with at least one edge.
    pub fn outer_cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(|c| c.is_outer())
    }

    pub fn cell_polygon(&self, cell: &Cell) -> Vec<Vector2<f64>> {
        cell_polygon(self.graph, cell)
    }

    /// Smallest bounded cell whose loop contains `p`.
    pub fn find_containing_cell(&self, p: Vector2<f64>) -> Option<&Cell> {
        self.bounded_cells()
            .filter(|c| polygon_contains(&self.cell_polygon(c), p))
            .min_by(|a, b| {
                a.signed_area
                    .partial_cmp(&b.signed_area)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

fn build_rings(graph: &PlanarGraph) -> Result<Vec<Ring>> {
    let mut rings = vec![Ring::default(); graph.max_vertex_id()];
    for v in graph.vertex_ids() {
        let edges = graph.sorted_vtx_edges(v)?;
        let p = graph.pos(v);
        let angles: Vec<f64> = edges
            .iter()
            .filter_map(|&e| graph.edge_other_v(e, v))
            .map(|o| angle_of(graph.pos(o) - p))
            .collect();
        let n = angles.len();
        if n > 1 {
            for i in 0..n {
                let next = (i + 1) % n;
                let mut gap = angles[next] - angles[i];
                if next == 0 {
                    gap += std::f64::consts::TAU;
                }
                if gap.abs() < PARAM_EPS {
                    return Err(GraphError::MalformedArrangement {
                        vertex: v,
                        edge: edges[next],
                    });
                }
            }
        }
        rings[v.0] = Ring {
            used: vec![false; edges.len()],
            edges,
        };
    }
    Ok(rings)
}

fn walk(graph: &PlanarGraph, rings: &mut [Ring], v0: VertexId, k0: usize) -> Result<Cell> {
    let mut vertices = Vec::new();
    let mut edges = Vec::new();
    let (mut v, mut k) = (v0, k0);
    loop {
        rings[v.0].used[k] = true;
        let out = rings[v.0].outgoing(k);
        vertices.push(v);
        edges.push(out);
        let w = graph
            .edge_other_v(out, v)
            .ok_or(GraphError::NotAnEdge(out))?;
        let kw = rings[w.0]
            .edges
            .iter()
            .position(|&e| e == out)
            .ok_or(GraphError::MalformedArrangement { vertex: w, edge: out })?;
        if w == v0 && kw == k0 {
            break;
        }
        if rings[w.0].used[kw] {
            return Err(GraphError::ArrangementInvariantViolated(format!(
                "face walk from {v0:?} re-entered a used wedge at {w:?}"
            )));
        }
        v = w;
        k = kw;
    }

    let pts: Vec<Vector2<f64>> = vertices.iter().map(|&u| graph.pos(u)).collect();
    let signed_area = signed_area(&pts);
    let scale = Aabb2::from_points(pts.iter().copied()).max_dim();
    let outer = signed_area <= AREA_EPS * scale * scale;
    Ok(Cell {
        vertices,
        edges,
        signed_area,
        outer,
    })
}
