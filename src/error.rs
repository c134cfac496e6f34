use thiserror::Error;

use crate::graphs::{Distance, VertexId};

/// Convenient result alias for the pathfinding core.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the pathfinding core.
///
/// Everything except [`Error::ContradictoryPaths`] and [`Error::NoPath`] is an
/// input-contract violation and is raised before any search state is touched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Two arrays that must describe the same vertex set differ in length.
    #[error("{what} has length {actual}, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The relaxation divisor is outside `(0, 1]`.
    #[error("divisor must be positive and <= 1.0, got {divisor}")]
    InvalidDivisor { divisor: f64 },

    /// An edge weight is zero, negative, or not finite.
    #[error("edge {tail}-{head} has invalid weight {weight}; weights must be positive and finite")]
    InvalidWeight {
        tail: VertexId,
        head: VertexId,
        weight: f64,
    },

    /// A seed's starting distance is negative or not finite.
    #[error("seed {vertex} has invalid starting distance {offset}")]
    InvalidOffset { vertex: VertexId, offset: Distance },

    /// A sector's star density is not a probability.
    #[error("star density must lie in [0, 1], got {density}")]
    InvalidDensity { density: f64 },

    /// An edge connects a vertex to itself.
    #[error("edge {vertex}-{vertex} is a self loop")]
    SelfLoop { vertex: VertexId },

    /// A vertex id does not address a vertex of the graph.
    #[error("vertex {vertex} out of range for graph with {number_of_vertices} vertices")]
    VertexOutOfRange {
        vertex: VertexId,
        number_of_vertices: usize,
    },

    /// The edge to be modified does not exist.
    #[error("no edge between {tail} and {head}")]
    UnknownEdge { tail: VertexId, head: VertexId },

    /// A lightened weight would make the edge heavier.
    #[error("edge {tail}-{head} cannot be lightened from {current} to {weight}")]
    NotLighter {
        tail: VertexId,
        head: VertexId,
        current: Distance,
        weight: Distance,
    },

    /// A relaxation reached an already settled vertex with a strictly smaller
    /// distance, or produced a candidate no larger than its tail. Signals a
    /// corrupt graph or corrupt restart state.
    #[error("contradictory paths found at vertex {vertex}: settled at {settled}, relaxed to {candidate}")]
    ContradictoryPaths {
        vertex: VertexId,
        settled: Distance,
        candidate: Distance,
    },

    /// A* exhausted its frontier without reaching the target under the bound.
    #[error("vertex {target} not reachable from {from}")]
    NoPath { from: VertexId, target: VertexId },
}

pub(crate) fn check_length(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

pub(crate) fn check_divisor(divisor: f64) -> Result<()> {
    if !(divisor > 0.0 && divisor <= 1.0) {
        return Err(Error::InvalidDivisor { divisor });
    }
    Ok(())
}

pub(crate) fn check_vertex(vertex: VertexId, number_of_vertices: usize) -> Result<()> {
    if vertex as usize >= number_of_vertices {
        return Err(Error::VertexOutOfRange {
            vertex,
            number_of_vertices,
        });
    }
    Ok(())
}
