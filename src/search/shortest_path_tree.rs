use ahash::AHashSet;
use log::debug;

use super::{
    collections::dijkstra_data::{DijkstraData, TreeLink},
    dijkstra::{restart_dijkstra, run_dijkstra_with_offsets, DijkstraDiagnostics},
};
use crate::{
    error::{check_length, check_vertex, Error, Result},
    graphs::{distance_graph::DistanceGraph, path::Path, Distance, VertexId},
};

/// A restartable shortest-path tree.
///
/// Owns the state of one engine run together with its seeds, so that a local
/// change to the graph can be repaired by clearing the affected subtree and
/// resuming from its boundary instead of running again from scratch.
#[derive(Clone, Debug)]
pub struct ShortestPathTree {
    data: DijkstraData,
    seeds: Vec<(VertexId, Distance)>,
    divisor: f64,
    diagnostics: DijkstraDiagnostics,
}

impl ShortestPathTree {
    /// Grows a tree from seeds that each start at their own offset.
    pub fn new(
        graph: &DistanceGraph,
        seeds: &[(VertexId, Distance)],
        divisor: f64,
    ) -> Result<ShortestPathTree> {
        let mut data = DijkstraData::new(graph.number_of_vertices());
        let diagnostics = run_dijkstra_with_offsets(graph, &mut data, divisor, seeds)?;

        let mut seeds = seeds.to_vec();
        seeds.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
        seeds.dedup_by_key(|seed| seed.0);

        Ok(ShortestPathTree {
            data,
            seeds,
            divisor,
            diagnostics,
        })
    }

    /// Grows a tree from sources that all start at distance zero.
    pub fn from_sources(
        graph: &DistanceGraph,
        sources: &[VertexId],
        divisor: f64,
    ) -> Result<ShortestPathTree> {
        let seeds: Vec<_> = sources.iter().map(|&source| (source, 0.0)).collect();
        ShortestPathTree::new(graph, &seeds, divisor)
    }

    pub fn distances(&self) -> &[Distance] {
        &self.data.distances
    }

    pub fn parents(&self) -> &[TreeLink] {
        &self.data.parents
    }

    pub fn data(&self) -> &DijkstraData {
        &self.data
    }

    pub fn divisor(&self) -> f64 {
        self.divisor
    }

    /// Seeds with their offsets, sorted by vertex.
    pub fn seeds(&self) -> &[(VertexId, Distance)] {
        &self.seeds
    }

    /// Counters of the most recent run or restart.
    pub fn diagnostics(&self) -> DijkstraDiagnostics {
        self.diagnostics
    }

    pub fn path_to(&self, target: VertexId) -> Option<Path> {
        self.data.get_path(target)
    }

    /// All vertices whose parent chain passes through `root`, `root` included.
    /// Empty if `root` is unreached or not a vertex of the tree.
    pub fn subtree(&self, root: VertexId) -> Vec<VertexId> {
        match self.data.parents.get(root as usize) {
            None | Some(TreeLink::Unvisited) => return Vec::new(),
            Some(_) => (),
        }

        let children = self.data.children();
        let mut subtree = vec![root];
        let mut stack = vec![root];
        while let Some(vertex) = stack.pop() {
            for &child in &children[vertex as usize] {
                subtree.push(child);
                stack.push(child);
            }
        }
        subtree.sort_unstable();
        subtree
    }

    /// Clears the labels of `vertices` and returns the seeds a restart needs to
    /// regrow them.
    ///
    /// The seeds are the still-labelled neighbours of the cleared region plus
    /// any cleared seed of the tree, which gets its offset back.
    pub fn invalidate(
        &mut self,
        graph: &DistanceGraph,
        vertices: &[VertexId],
    ) -> Result<Vec<VertexId>> {
        check_length(
            "shortest path tree",
            graph.number_of_vertices(),
            self.data.len(),
        )?;
        for &vertex in vertices {
            check_vertex(vertex, graph.number_of_vertices())?;
        }

        let invalidated: AHashSet<VertexId> = vertices.iter().copied().collect();
        for &vertex in &invalidated {
            let index = vertex as usize;
            self.data.distances[index] = Distance::INFINITY;
            self.data.parents[index] = TreeLink::Unvisited;
        }

        let mut boundary = Vec::new();
        for &vertex in &invalidated {
            if let Ok(index) = self.seeds.binary_search_by_key(&vertex, |seed| seed.0) {
                let offset = self.seeds[index].1;
                self.data.distances[vertex as usize] = offset;
                self.data.parents[vertex as usize] = TreeLink::Root;
                boundary.push(vertex);
            }
            boundary.extend(graph.arcs(vertex).heads().iter().copied().filter(|head| {
                !invalidated.contains(head) && self.data.distances[*head as usize].is_finite()
            }));
        }
        boundary.sort_unstable();
        boundary.dedup();

        debug!(
            "invalidated {} vertices, {} boundary seeds",
            invalidated.len(),
            boundary.len()
        );
        Ok(boundary)
    }

    /// Convenience for [`ShortestPathTree::invalidate`] on the subtree below
    /// `root`.
    pub fn invalidate_subtree(
        &mut self,
        graph: &DistanceGraph,
        root: VertexId,
    ) -> Result<Vec<VertexId>> {
        check_vertex(root, self.data.len())?;
        let subtree = self.subtree(root);
        self.invalidate(graph, &subtree)
    }

    /// Resumes the run from `seeds`, keeping every label that was not cleared.
    pub fn restart(
        &mut self,
        graph: &DistanceGraph,
        seeds: &[VertexId],
    ) -> Result<DijkstraDiagnostics> {
        self.diagnostics = restart_dijkstra(graph, &mut self.data, self.divisor, seeds)?;
        Ok(self.diagnostics)
    }

    /// Repairs the tree after the weight of edge `u`-`v` went up. `graph` must
    /// already carry the new weight.
    ///
    /// Only a tree edge can change any label; in that case the subtree below
    /// it is cleared and regrown from its boundary.
    pub fn repair_raised_edge(
        &mut self,
        graph: &DistanceGraph,
        u: VertexId,
        v: VertexId,
    ) -> Result<DijkstraDiagnostics> {
        check_vertex(u, graph.number_of_vertices())?;
        check_vertex(v, graph.number_of_vertices())?;
        if graph.get_weight(u, v).is_none() {
            return Err(Error::UnknownEdge { tail: u, head: v });
        }

        let child = if self.data.get_parent(v) == TreeLink::Parent(u) {
            v
        } else if self.data.get_parent(u) == TreeLink::Parent(v) {
            u
        } else {
            self.diagnostics = DijkstraDiagnostics::default();
            return Ok(self.diagnostics);
        };

        let seeds = self.invalidate_subtree(graph, child)?;
        self.restart(graph, &seeds)
    }

    /// Repairs the tree after the given edges became lighter. `graph` must
    /// already carry the new weights.
    ///
    /// Labels can only drop, so nothing is cleared: the endpoints of every
    /// edge that now violates `|L(u) - L(v)| <= divisor * w` are restarted
    /// at their current labels.
    pub fn repair_lightened_edges(
        &mut self,
        graph: &DistanceGraph,
        edges: &[(VertexId, VertexId)],
    ) -> Result<DijkstraDiagnostics> {
        let seeds = self.violated_endpoints(graph, edges)?;
        if seeds.is_empty() {
            self.diagnostics = DijkstraDiagnostics::default();
            return Ok(self.diagnostics);
        }
        self.restart(graph, &seeds)
    }

    /// Endpoints of the edges whose labels no longer satisfy the triangle
    /// inequality.
    pub fn violated_endpoints(
        &self,
        graph: &DistanceGraph,
        edges: &[(VertexId, VertexId)],
    ) -> Result<Vec<VertexId>> {
        let mut seeds = Vec::new();
        for &(u, v) in edges {
            check_vertex(u, graph.number_of_vertices())?;
            check_vertex(v, graph.number_of_vertices())?;
            let weight = graph
                .get_weight(u, v)
                .ok_or(Error::UnknownEdge { tail: u, head: v })?;
            let delta = (self.data.get_distance(u) - self.data.get_distance(v)).abs();
            // NaN when both ends are unreached, which never compares greater
            if delta > self.divisor * weight {
                seeds.push(u);
                seeds.push(v);
            }
        }
        seeds.sort_unstable();
        seeds.dedup();
        Ok(seeds)
    }
}
