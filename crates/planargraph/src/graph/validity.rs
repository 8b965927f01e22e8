//! Invariant walk over the whole graph (tests and debug builds).

use std::collections::HashSet;

use tracing::warn;

use crate::error::{GraphError, Result};

use super::topology::Graph;
use super::types::{ValidityMode, VertexId};

impl Graph {
    /// Walk every vertex and edge and check the five graph invariants.
    ///
    /// `mode` selects whether a violation panics, is logged, or is returned.
    /// In `Log` mode the walk continues and the call returns `Ok(())`.
    pub fn check_validity(&self, mode: ValidityMode) -> Result<()> {
        let report = |msg: String| -> Result<()> {
            match mode {
                ValidityMode::Panic => panic!("graph invariant violated: {msg}"),
                ValidityMode::Log => {
                    warn!(violation = %msg, "graph invariant violated");
                    Ok(())
                }
                ValidityMode::Error => Err(GraphError::InvariantViolated(msg)),
            }
        };

        let mut pairs: HashSet<(VertexId, VertexId)> = HashSet::new();
        for info in self.edges() {
            let (a, b) = (info.a, info.b);
            if !self.is_vertex(a) || !self.is_vertex(b) {
                report(format!("edge {:?} has dead endpoint ({a:?}, {b:?})", info.id))?;
                continue;
            }
            if a >= b {
                report(format!("edge {:?} endpoints not canonical ({a:?}, {b:?})", info.id))?;
            }
            for v in [a, b] {
                let hits = self
                    .vtx_edges(v)?
                    .iter()
                    .filter(|&&x| x == info.id)
                    .count();
                if hits != 1 {
                    report(format!(
                        "edge {:?} listed {hits} times at vertex {v:?}",
                        info.id
                    ))?;
                }
            }
            if !pairs.insert((a.min(b), a.max(b))) {
                report(format!("duplicate edge between {a:?} and {b:?}"))?;
            }
            if info.group >= self.max_group_id() {
                report(format!(
                    "edge {:?} group {} >= max_group_id {}",
                    info.id,
                    info.group,
                    self.max_group_id()
                ))?;
            }
        }

        for v in self.vertex_ids() {
            let list = self.vtx_edges(v)?;
            for &e in list {
                if self.edge_other_v(e, v).is_none() {
                    report(format!("vertex {v:?} lists {e:?} which does not touch it"))?;
                }
            }
            let rc = self.vertex_ref_count(v) as usize;
            if rc != list.len() + 1 {
                report(format!(
                    "vertex {v:?} ref count {rc} != valence {} + 1",
                    list.len()
                ))?;
            }
        }
        Ok(())
    }

    /// Panics on the first broken invariant in debug builds; no-op in release.
    #[inline]
    pub fn debug_check_validity(&self) {
        #[cfg(debug_assertions)]
        {
            if let Err(err) = self.check_validity(ValidityMode::Error) {
                panic!("graph invariant violated: {err}");
            }
        }
    }
}
