use crate::{
    error::{check_vertex, Error, Result},
    graphs::{
        distance_graph::DistanceGraph,
        path::{Path, ShortestPathRequest},
        Distance, VertexId,
    },
};

pub mod alt;
pub mod astar;
pub mod collections;
pub mod dijkstra;
pub mod shortest_path_tree;

/// Source of admissible A* potentials.
pub trait DistanceHeuristic: Send + Sync {
    /// Lower bound on the distance from every vertex to `target`.
    fn lower_bounds(&self, target: VertexId) -> Result<Vec<Distance>>;

    /// Cost of some route from `source` to `target`, if one is known.
    fn upper_bound(&self, _source: VertexId, _target: VertexId) -> Result<Distance> {
        Ok(Distance::MAX)
    }
}

pub trait PathFinding: Send + Sync {
    fn shortest_path(&self, request: &ShortestPathRequest) -> Result<Option<Path>>;

    fn shortest_path_distance(&self, request: &ShortestPathRequest) -> Result<Option<Distance>> {
        Ok(self.shortest_path(request)?.map(|path| path.distance))
    }
}

/// Zero potentials, which turn A* into plain Dijkstra.
pub struct TrivialHeuristic {
    pub number_of_vertices: usize,
}

impl DistanceHeuristic for TrivialHeuristic {
    fn lower_bounds(&self, target: VertexId) -> Result<Vec<Distance>> {
        check_vertex(target, self.number_of_vertices)?;
        Ok(vec![0.0; self.number_of_vertices])
    }
}

impl PathFinding for DistanceGraph {
    fn shortest_path(&self, request: &ShortestPathRequest) -> Result<Option<Path>> {
        check_vertex(request.target(), self.number_of_vertices())?;
        let data = dijkstra::dijkstra_one_to_all(self, request.source())?;
        Ok(data.get_path(request.target()))
    }
}

/// A* over a graph, guided by any heuristic.
pub struct AStarRouter<'a, H: DistanceHeuristic> {
    pub graph: &'a DistanceGraph,
    pub heuristic: &'a H,
}

impl<'a, H: DistanceHeuristic> AStarRouter<'a, H> {
    pub fn new(graph: &'a DistanceGraph, heuristic: &'a H) -> Self {
        AStarRouter { graph, heuristic }
    }
}

impl<'a, H: DistanceHeuristic> PathFinding for AStarRouter<'a, H> {
    fn shortest_path(&self, request: &ShortestPathRequest) -> Result<Option<Path>> {
        let potentials = self.heuristic.lower_bounds(request.target())?;
        match astar::astar(
            self.graph,
            request.source(),
            request.target(),
            &potentials,
            None,
            None,
        ) {
            Ok(outcome) => Ok(outcome.found().map(|result| Path {
                vertices: result.path,
                distance: result.cost,
            })),
            Err(Error::NoPath { .. }) => Ok(None),
            Err(error) => Err(error),
        }
    }
}
