use serde::{Deserialize, Serialize};

use super::{edge::WeightedEdge, Distance, VertexId};
use crate::error::{check_vertex, Error, Result};

/// Outgoing arcs of a single vertex, stored as two equal-length columns sorted
/// by head.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ArcList {
    heads: Vec<VertexId>,
    weights: Vec<Distance>,
}

impl ArcList {
    pub fn heads(&self) -> &[VertexId] {
        &self.heads
    }

    pub fn weights(&self) -> &[Distance] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.heads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heads.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (VertexId, Distance)> + '_ {
        self.heads
            .iter()
            .copied()
            .zip(self.weights.iter().copied())
    }

    fn weight(&self, head: VertexId) -> Option<Distance> {
        let index = self.heads.binary_search(&head).ok()?;
        Some(self.weights[index])
    }

    /// Inserts the arc, keeping the lighter weight if it already exists.
    fn set_min(&mut self, head: VertexId, weight: Distance) {
        match self.heads.binary_search(&head) {
            Ok(index) => {
                if weight < self.weights[index] {
                    self.weights[index] = weight;
                }
            }
            Err(index) => {
                self.heads.insert(index, head);
                self.weights.insert(index, weight);
            }
        }
    }
}

/// Undirected weighted graph over dense vertex ids.
///
/// The topology is fixed after construction. Edge weights change through
/// [`DistanceGraph::lighten_edge`] and [`DistanceGraph::set_edge_weight`],
/// which keep the cached min-cost vectors in step with the arcs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DistanceGraph {
    arcs: Vec<ArcList>,
    min_cost: Vec<Distance>,
    min_indirect: Vec<Distance>,
}

impl DistanceGraph {
    pub fn new(number_of_vertices: usize, edges: &[WeightedEdge]) -> Result<DistanceGraph> {
        let mut arcs = vec![ArcList::default(); number_of_vertices];

        for edge in edges {
            check_vertex(edge.tail(), number_of_vertices)?;
            check_vertex(edge.head(), number_of_vertices)?;
            arcs[edge.tail() as usize].set_min(edge.head(), edge.weight());
            arcs[edge.head() as usize].set_min(edge.tail(), edge.weight());
        }

        let min_cost: Vec<Distance> = arcs
            .iter()
            .map(|arc_list| {
                arc_list
                    .weights
                    .iter()
                    .copied()
                    .reduce(Distance::min)
                    .unwrap_or(0.0)
            })
            .collect();

        let min_indirect = arcs
            .iter()
            .map(|arc_list| {
                arc_list
                    .heads
                    .iter()
                    .map(|&head| min_cost[head as usize])
                    .reduce(Distance::min)
                    .unwrap_or(0.0)
            })
            .collect();

        Ok(DistanceGraph {
            arcs,
            min_cost,
            min_indirect,
        })
    }

    pub fn number_of_vertices(&self) -> usize {
        self.arcs.len()
    }

    /// Number of undirected edges.
    pub fn number_of_edges(&self) -> usize {
        self.arcs.iter().map(ArcList::len).sum::<usize>() / 2
    }

    pub fn arcs(&self, vertex: VertexId) -> &ArcList {
        &self.arcs[vertex as usize]
    }

    pub fn get_weight(&self, tail: VertexId, head: VertexId) -> Option<Distance> {
        self.arcs.get(tail as usize)?.weight(head)
    }

    /// Cheapest outgoing edge per vertex; zero for vertices without arcs.
    pub fn min_cost(&self) -> &[Distance] {
        &self.min_cost
    }

    /// Lower bound on the remaining cost from each vertex to `target`. Every
    /// vertex other than the target needs at least one more jump.
    pub fn min_cost_towards(&self, target: VertexId) -> Vec<Distance> {
        let mut min_cost = self.min_cost.clone();
        if let Some(entry) = min_cost.get_mut(target as usize) {
            *entry = 0.0;
        }
        min_cost
    }

    /// Like [`DistanceGraph::min_cost_towards`], plus the cheapest second jump
    /// for vertices that are neither the target nor adjacent to it.
    pub fn min_cost_indirect_towards(&self, target: VertexId) -> Vec<Distance> {
        let mut min_indirect = self.min_indirect.clone();
        if let Some(entry) = min_indirect.get_mut(target as usize) {
            *entry = 0.0;
            for &head in self.arcs[target as usize].heads() {
                min_indirect[head as usize] = 0.0;
            }
        }

        self.min_cost_towards(target)
            .into_iter()
            .zip(min_indirect)
            .map(|(direct, indirect)| direct + indirect)
            .collect()
    }

    /// Lowers the weight of the existing edge `u`-`v` in both directions. The
    /// new weight must be strictly below the current one.
    pub fn lighten_edge(&mut self, u: VertexId, v: VertexId, weight: Distance) -> Result<()> {
        let current = self.checked_weight(u, v)?;
        if weight >= current {
            return Err(Error::NotLighter {
                tail: u,
                head: v,
                current,
                weight,
            });
        }
        self.set_edge_weight(u, v, weight)?;
        Ok(())
    }

    /// Replaces the weight of the existing edge `u`-`v` in both directions and
    /// returns the previous weight.
    pub fn set_edge_weight(
        &mut self,
        u: VertexId,
        v: VertexId,
        weight: Distance,
    ) -> Result<Distance> {
        let current = self.checked_weight(u, v)?;
        let edge = WeightedEdge::new(u, v, weight)?;

        for (tail, head) in [(u, v), (v, u)] {
            let arc_list = &mut self.arcs[tail as usize];
            if let Ok(index) = arc_list.heads.binary_search(&head) {
                arc_list.weights[index] = edge.weight();
            }
        }

        for endpoint in [u, v] {
            self.min_cost[endpoint as usize] = self.arcs[endpoint as usize]
                .weights
                .iter()
                .copied()
                .reduce(Distance::min)
                .unwrap_or(0.0);
        }
        // min_indirect of a vertex reads the min cost of its neighbours
        for endpoint in [u, v] {
            for &head in self.arcs[endpoint as usize].heads() {
                self.min_indirect[head as usize] = self.arcs[head as usize]
                    .heads
                    .iter()
                    .map(|&next| self.min_cost[next as usize])
                    .reduce(Distance::min)
                    .unwrap_or(0.0);
            }
        }

        Ok(current)
    }

    fn checked_weight(&self, u: VertexId, v: VertexId) -> Result<Distance> {
        check_vertex(u, self.number_of_vertices())?;
        check_vertex(v, self.number_of_vertices())?;
        self.get_weight(u, v)
            .ok_or(Error::UnknownEdge { tail: u, head: v })
    }
}
