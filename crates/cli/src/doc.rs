//! JSON documents read and written by the CLI.
//!
//! Input: segments, polylines and polygons, each with an optional group id.
//! Output: a dense copy of the arranged graph plus its cells and curves, with
//! vertex indices into `vertices`.

use anyhow::{Context, Result};
use planargraph::api::{
    chain_group, extract_curves, Arrangement, CellExtractor, GroupId, PlanarGraph, NO_GROUP,
};
use planargraph::Vec2;
use serde::{Deserialize, Serialize};

fn no_group() -> GroupId {
    NO_GROUP
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct InputDoc {
    #[serde(default)]
    pub segments: Vec<SegmentIn>,
    #[serde(default)]
    pub polylines: Vec<ChainIn>,
    #[serde(default)]
    pub polygons: Vec<ChainIn>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SegmentIn {
    pub a: [f64; 2],
    pub b: [f64; 2],
    #[serde(default = "no_group")]
    pub group: GroupId,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ChainIn {
    pub points: Vec<[f64; 2]>,
    #[serde(default = "no_group")]
    pub group: GroupId,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct EdgeOut {
    pub a: usize,
    pub b: usize,
    pub group: GroupId,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CellOut {
    pub vertices: Vec<usize>,
    pub signed_area: f64,
    pub outer: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CurveOut {
    pub vertices: Vec<usize>,
    pub closed: bool,
    pub group: Option<GroupId>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct OutputDoc {
    pub vertices: Vec<[f64; 2]>,
    pub edges: Vec<EdgeOut>,
    pub cells: Vec<CellOut>,
    pub curves: Vec<CurveOut>,
}

#[inline]
fn pt(p: [f64; 2]) -> Vec2<f64> {
    Vec2::new(p[0], p[1])
}

fn pts(ps: &[[f64; 2]]) -> Vec<Vec2<f64>> {
    ps.iter().copied().map(pt).collect()
}

impl InputDoc {
    /// Feed every input item into `arr`: segments, then polylines, then polygons.
    pub fn insert_into(&self, arr: &mut Arrangement) -> Result<()> {
        for (i, s) in self.segments.iter().enumerate() {
            arr.insert_segment(pt(s.a), pt(s.b), s.group)
                .with_context(|| format!("inserting segment {i}"))?;
        }
        for (i, c) in self.polylines.iter().enumerate() {
            arr.insert_polyline(&pts(&c.points), c.group)
                .with_context(|| format!("inserting polyline {i}"))?;
        }
        for (i, c) in self.polygons.iter().enumerate() {
            arr.insert_polygon(&pts(&c.points), c.group)
                .with_context(|| format!("inserting polygon {i}"))?;
        }
        Ok(())
    }

    pub fn item_count(&self) -> usize {
        self.segments.len() + self.polylines.len() + self.polygons.len()
    }
}

impl OutputDoc {
    /// Compact `graph`, then extract cells (when `with_cells`) and curves.
    pub fn from_graph(graph: &PlanarGraph, with_cells: bool) -> Result<Self> {
        let (dense, _) = graph.compact_copy().context("compacting graph")?;
        let vertices = dense
            .vertex_ids()
            .map(|v| dense.vertex(v).map(|p| [p.x, p.y]))
            .collect::<Result<Vec<_>, _>>()?;
        let edges = dense
            .edges()
            .map(|e| EdgeOut {
                a: e.a.0,
                b: e.b.0,
                group: e.group,
            })
            .collect();
        let cells = if with_cells {
            CellExtractor::new(&dense)
                .context("extracting cells")?
                .cells()
                .iter()
                .map(|c| CellOut {
                    vertices: c.vertices.iter().map(|v| v.0).collect(),
                    signed_area: c.signed_area,
                    outer: c.is_outer(),
                })
                .collect()
        } else {
            Vec::new()
        };
        let curves = extract_curves(&dense)
            .iter()
            .map(|c| CurveOut {
                vertices: c.vertices.iter().map(|v| v.0).collect(),
                closed: c.closed,
                group: chain_group(&dense, c),
            })
            .collect();
        Ok(Self {
            vertices,
            edges,
            cells,
            curves,
        })
    }
}
