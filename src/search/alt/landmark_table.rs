use indicatif::ParallelProgressIterator;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::landmark::{LandmarkSelector, LandmarkSet};
use crate::{
    error::{check_divisor, check_vertex, Result},
    graphs::{
        distance_graph::DistanceGraph, graph_functions::connected_components,
        position::HexPosition, Distance, VertexId,
    },
    search::shortest_path_tree::ShortestPathTree,
    utility::get_progressbar,
};

/// Returned by [`LandmarkTable::triangle_upbound`] when no landmark covers
/// both ends.
pub const NO_UPBOUND: Distance = Distance::MAX / 2.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkConfig {
    /// Landmarks per connected component.
    pub slots: usize,
    /// Edge weight multiplier in `(0, 1]` used while building the table.
    /// Below one the table is cheaper to build and the bounds get looser,
    /// but stay admissible.
    pub divisor: f64,
}

impl Default for LandmarkConfig {
    fn default() -> Self {
        LandmarkConfig {
            slots: 6,
            divisor: 1.0,
        }
    }
}

/// Distances from every vertex to the landmarks of its component, one
/// shortest-path forest per slot.
#[derive(Clone, Debug)]
pub struct LandmarkTable {
    trees: Vec<ShortestPathTree>,
    components: Vec<u32>,
    divisor: f64,
}

impl LandmarkTable {
    pub fn build(
        graph: &DistanceGraph,
        landmarks: &LandmarkSet,
        divisor: f64,
    ) -> Result<LandmarkTable> {
        check_divisor(divisor)?;
        for &landmark in landmarks.slots().iter().flatten() {
            check_vertex(landmark, graph.number_of_vertices())?;
        }

        info!(
            "building landmark table: {} slots, {} landmarks, divisor {}",
            landmarks.number_of_slots(),
            landmarks.vertices().len(),
            divisor
        );
        let trees = landmarks
            .slots()
            .par_iter()
            .progress_with(get_progressbar(
                "Building landmark table",
                landmarks.number_of_slots() as u64,
            ))
            .map(|slot| ShortestPathTree::from_sources(graph, slot, divisor))
            .collect::<Result<Vec<_>>>()?;

        let mut components = vec![0; graph.number_of_vertices()];
        for (id, component) in connected_components(graph).iter().enumerate() {
            for &vertex in component {
                components[vertex as usize] = id as u32;
            }
        }

        Ok(LandmarkTable {
            trees,
            components,
            divisor,
        })
    }

    /// Selects landmarks and builds their table in one go.
    pub fn with_config(
        graph: &DistanceGraph,
        positions: &[HexPosition],
        config: &LandmarkConfig,
    ) -> Result<(LandmarkSet, LandmarkTable)> {
        let landmarks = LandmarkSelector::select(graph, positions, config.slots)?;
        let table = LandmarkTable::build(graph, &landmarks, config.divisor)?;
        Ok((landmarks, table))
    }

    pub fn number_of_slots(&self) -> usize {
        self.trees.len()
    }

    pub fn divisor(&self) -> f64 {
        self.divisor
    }

    /// Distances to the landmark of `slot`, scaled by the divisor.
    pub fn distances(&self, slot: usize) -> &[Distance] {
        self.trees[slot].distances()
    }

    /// Admissible lower bound on the distance from every vertex to `target`.
    ///
    /// Only slots with a landmark in the target's component take part. If
    /// none does, every bound inside that component is zero. Vertices in
    /// another component than the target get infinity.
    pub fn lower_bound_bulk(&self, target: VertexId) -> Result<Vec<Distance>> {
        check_vertex(target, self.components.len())?;
        let mut bounds = vec![0.0; self.components.len()];

        for tree in &self.trees {
            let distances = tree.distances();
            let target_distance = distances[target as usize];
            if !target_distance.is_finite() {
                continue;
            }
            for (bound, &distance) in bounds.iter_mut().zip(distances) {
                *bound = Distance::max(*bound, (distance - target_distance).abs());
            }
        }

        let component = self.components[target as usize];
        for (bound, &other) in bounds.iter_mut().zip(&self.components) {
            if other != component {
                *bound = Distance::INFINITY;
            }
        }
        Ok(bounds)
    }

    pub fn lower_bound(&self, source: VertexId, target: VertexId) -> Result<Distance> {
        check_vertex(source, self.components.len())?;
        check_vertex(target, self.components.len())?;
        if self.components[source as usize] != self.components[target as usize] {
            return Ok(Distance::INFINITY);
        }
        Ok(self
            .trees
            .iter()
            .map(|tree| (tree.distances()[source as usize], tree.distances()[target as usize]))
            .filter(|(_, target_distance)| target_distance.is_finite())
            .map(|(source_distance, target_distance)| (source_distance - target_distance).abs())
            .fold(0.0, Distance::max))
    }

    /// Upper bound through the nearest common landmark, or [`NO_UPBOUND`].
    pub fn triangle_upbound(&self, source: VertexId, target: VertexId) -> Result<Distance> {
        check_vertex(source, self.components.len())?;
        check_vertex(target, self.components.len())?;
        if self.components[source as usize] != self.components[target as usize] {
            return Ok(NO_UPBOUND);
        }

        Ok(self
            .trees
            .iter()
            .map(|tree| tree.distances()[source as usize] + tree.distances()[target as usize])
            .filter(|distance| distance.is_finite())
            .map(|distance| distance / self.divisor)
            .fold(NO_UPBOUND, Distance::min))
    }

    /// Brings the table up to date after the given edges got lighter.
    /// `graph` must already carry the new weights. Returns the number of
    /// slots that needed a restart.
    pub fn update_edges(
        &mut self,
        graph: &DistanceGraph,
        edges: &[(VertexId, VertexId)],
    ) -> Result<usize> {
        let restarted = self
            .trees
            .par_iter_mut()
            .map(|tree| {
                let seeds = tree.violated_endpoints(graph, edges)?;
                if seeds.is_empty() {
                    return Ok(0);
                }
                tree.restart(graph, &seeds)?;
                Ok(1)
            })
            .collect::<Result<Vec<usize>>>()?
            .into_iter()
            .sum();

        debug!(
            "{} lightened edges restarted {} of {} landmark slots",
            edges.len(),
            restarted,
            self.trees.len()
        );
        Ok(restarted)
    }
}

/// Element-wise maximum of two admissible lower bounds.
pub fn combine_bounds(a: &[Distance], b: &[Distance]) -> Vec<Distance> {
    a.iter()
        .zip(b)
        .map(|(&a, &b)| Distance::max(a, b))
        .collect()
}
