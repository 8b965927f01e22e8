//! Error type shared by the slot allocator, the graph core, and the arrangement.
//!
//! Classes
//! - Programming errors: bad handles, self-loops, operations on non-edges. The
//!   failing call leaves the graph untouched.
//! - Numerical-robustness failures: the input broke the "no crossings, no
//!   coincident directions" precondition (`MalformedArrangement`,
//!   `ArrangementInvariantViolated`).
//!
//! Benign outcomes (duplicate edge, zero-length span) are not errors; see
//! `graph::EdgeInsert`.

use thiserror::Error;

use crate::graph::{EdgeId, VertexId};

#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
    /// Handle was never issued or its ref count already dropped to zero.
    #[error("invalid handle {0}")]
    InvalidHandle(usize),

    #[error("vertex {0:?} is not a live vertex")]
    NotAVertex(VertexId),

    #[error("edge {0:?} is not a live edge")]
    NotAnEdge(EdgeId),

    #[error("no edge between {0:?} and {1:?}")]
    NoSuchEdge(VertexId, VertexId),

    #[error("self-loop requested at vertex {0:?}")]
    SelfLoop(VertexId),

    #[error("non-finite coordinate in input: ({x}, {y})")]
    NonFiniteInput { x: f64, y: f64 },

    /// Face walk reached a vertex with no wedge accepting the incoming edge.
    #[error("malformed arrangement at vertex {vertex:?}: no wedge for incoming edge {edge:?}")]
    MalformedArrangement { vertex: VertexId, edge: EdgeId },

    /// A sign test promised an intersection the segment test did not find, or a
    /// walk failed to close.
    #[error("arrangement invariant violated: {0}")]
    ArrangementInvariantViolated(String),

    /// Reported by `Graph::check_validity` in `ValidityMode::Error`.
    #[error("graph invariant violated: {0}")]
    InvariantViolated(String),
}

pub type Result<T, E = GraphError> = std::result::Result<T, E>;
