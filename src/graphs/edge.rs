use serde::{Deserialize, Serialize};

use super::{Distance, VertexId};
use crate::error::{Error, Result};

/// Undirected jump between two star systems. Both arcs carry the same weight.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct WeightedEdge {
    tail: VertexId,
    head: VertexId,
    weight: Distance,
}

impl WeightedEdge {
    pub fn new(tail: VertexId, head: VertexId, weight: Distance) -> Result<WeightedEdge> {
        if tail == head {
            return Err(Error::SelfLoop { vertex: tail });
        }
        if !(weight > 0.0 && weight.is_finite()) {
            return Err(Error::InvalidWeight { tail, head, weight });
        }

        Ok(WeightedEdge { tail, head, weight })
    }

    pub fn tail(&self) -> VertexId {
        self.tail
    }

    pub fn head(&self) -> VertexId {
        self.head
    }

    pub fn weight(&self) -> Distance {
        self.weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_weights() {
        assert!(WeightedEdge::new(0, 1, 0.0).is_err());
        assert!(WeightedEdge::new(0, 1, -2.0).is_err());
        assert!(WeightedEdge::new(0, 1, f64::INFINITY).is_err());
        assert!(WeightedEdge::new(0, 1, f64::NAN).is_err());
        assert!(WeightedEdge::new(0, 1, 0.5).is_ok());
    }

    #[test]
    fn rejects_self_loops() {
        assert_eq!(
            WeightedEdge::new(3, 3, 1.0),
            Err(Error::SelfLoop { vertex: 3 })
        );
    }
}
