use super::DistanceHeuristic;
use crate::{
    error::Result,
    graphs::{Distance, VertexId},
};

pub mod landmark;
pub mod landmark_table;

impl DistanceHeuristic for landmark_table::LandmarkTable {
    fn lower_bounds(&self, target: VertexId) -> Result<Vec<Distance>> {
        self.lower_bound_bulk(target)
    }

    fn upper_bound(&self, source: VertexId, target: VertexId) -> Result<Distance> {
        self.triangle_upbound(source, target)
    }
}
