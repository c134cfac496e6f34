use log::trace;
use serde::{Deserialize, Serialize};

use super::collections::dijkstra_data::{DijkstraData, TreeLink};
use crate::{
    error::{check_divisor, check_length, check_vertex, Error, Result},
    graphs::{distance_graph::DistanceGraph, Distance, VertexId},
    queue::{min_max_heap::MinMaxHeap, FrontierQueue, QueueElement},
};

/// Work counters of a single engine run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DijkstraDiagnostics {
    pub nodes_processed: u64,
    pub nodes_queued: u64,
    /// Popped with a distance above the vertex's current label.
    pub nodes_exceeded: u64,
    /// Popped too close to the vertex's max-neighbour label to improve anything.
    pub nodes_min_exceeded: u64,
    /// Processed without improving any neighbour.
    pub nodes_tailed: u64,
}

/// Runs the restartable multi-source Dijkstra over explicit state slices.
///
/// Every seed is queued at its current label; seeds with an infinite label are
/// ignored. Parent links of seeds are left as they are, so a restart keeps the
/// surrounding tree intact. Relaxations use `distance + divisor * weight`,
/// with `divisor` in `(0, 1]`; a divisor below one under-estimates every
/// distance.
///
/// `max_neighbour_labels` must not under-estimate the current labels of any
/// vertex's neighbours. Raising a label therefore requires resetting the
/// max-neighbour labels of that vertex and of its neighbours to infinity.
#[allow(clippy::too_many_arguments)]
pub fn dijkstra_core<Q: FrontierQueue<QueueElement>>(
    graph: &DistanceGraph,
    distances: &mut [Distance],
    parents: &mut [TreeLink],
    max_neighbour_labels: &mut [Distance],
    min_cost: &[Distance],
    divisor: f64,
    seeds: &[VertexId],
    queue: &mut Q,
) -> Result<DijkstraDiagnostics> {
    let number_of_vertices = graph.number_of_vertices();
    check_length("distance labels", number_of_vertices, distances.len())?;
    check_length("parents", number_of_vertices, parents.len())?;
    check_length(
        "max neighbour labels",
        number_of_vertices,
        max_neighbour_labels.len(),
    )?;
    check_length("min cost", number_of_vertices, min_cost.len())?;
    check_divisor(divisor)?;
    for &seed in seeds {
        check_vertex(seed, number_of_vertices)?;
    }

    let mut diagnostics = DijkstraDiagnostics::default();
    let mut settled = vec![false; number_of_vertices];

    queue.clear();
    for &seed in seeds {
        let distance = distances[seed as usize];
        if distance.is_finite() && !graph.arcs(seed).is_empty() {
            queue.insert(QueueElement::new(distance, distance, seed));
            diagnostics.nodes_queued += 1;
        }
    }

    while let Some(QueueElement {
        distance: distance_tail,
        vertex: tail,
        ..
    }) = queue.pop_min()
    {
        let index = tail as usize;
        if distance_tail > distances[index] || settled[index] {
            diagnostics.nodes_exceeded += 1;
            continue;
        }
        if distance_tail + divisor * min_cost[index] > max_neighbour_labels[index] {
            diagnostics.nodes_min_exceeded += 1;
            continue;
        }

        settled[index] = true;
        diagnostics.nodes_processed += 1;

        let arcs = graph.arcs(tail);
        let mut improved = 0;
        for (head, weight) in arcs.iter() {
            let candidate = distance_tail + divisor * weight;
            let head_index = head as usize;
            if candidate < distances[head_index] {
                if candidate <= distance_tail || settled[head_index] {
                    return Err(Error::ContradictoryPaths {
                        vertex: head,
                        settled: distances[head_index],
                        candidate,
                    });
                }
                distances[head_index] = candidate;
                parents[head_index] = TreeLink::Parent(tail);
                queue.insert(QueueElement::new(candidate, candidate, head));
                improved += 1;
            }
        }

        // only after all neighbours are relaxed, so the bound is as low as it gets
        max_neighbour_labels[index] = arcs
            .heads()
            .iter()
            .map(|&head| distances[head as usize])
            .fold(Distance::NEG_INFINITY, Distance::max);

        if improved == 0 {
            diagnostics.nodes_tailed += 1;
        } else {
            diagnostics.nodes_queued += improved;
        }
    }

    trace!("dijkstra finished: {:?}", diagnostics);
    Ok(diagnostics)
}

/// Computes distances from scratch, every seed starting at distance zero.
pub fn run_dijkstra(
    graph: &DistanceGraph,
    data: &mut DijkstraData,
    divisor: f64,
    seeds: &[VertexId],
) -> Result<DijkstraDiagnostics> {
    let seeds: Vec<(VertexId, Distance)> = seeds.iter().map(|&seed| (seed, 0.0)).collect();
    run_dijkstra_with_offsets(graph, data, divisor, &seeds)
}

/// Computes distances from scratch, each seed starting at its own offset.
pub fn run_dijkstra_with_offsets(
    graph: &DistanceGraph,
    data: &mut DijkstraData,
    divisor: f64,
    seeds: &[(VertexId, Distance)],
) -> Result<DijkstraDiagnostics> {
    check_length("dijkstra data", graph.number_of_vertices(), data.len())?;
    for &(seed, offset) in seeds {
        check_vertex(seed, graph.number_of_vertices())?;
        if !(offset.is_finite() && offset >= 0.0) {
            return Err(Error::InvalidOffset {
                vertex: seed,
                offset,
            });
        }
    }

    data.clear();
    for &(seed, offset) in seeds {
        let label = &mut data.distances[seed as usize];
        *label = label.min(offset);
        data.parents[seed as usize] = TreeLink::Root;
    }

    let vertices: Vec<VertexId> = seeds.iter().map(|&(seed, _)| seed).collect();
    restart_dijkstra(graph, data, divisor, &vertices)
}

/// Resumes a previous run from `seeds`, keeping every existing label.
///
/// The caller resets the labels of invalidated vertices to infinity and seeds
/// the labelled boundary around them. Max-neighbour labels next to a cleared
/// vertex are reset here before the run. See
/// [`ShortestPathTree`](super::shortest_path_tree::ShortestPathTree) for a
/// wrapper that also works out the boundary.
pub fn restart_dijkstra(
    graph: &DistanceGraph,
    data: &mut DijkstraData,
    divisor: f64,
    seeds: &[VertexId],
) -> Result<DijkstraDiagnostics> {
    check_length("dijkstra data", graph.number_of_vertices(), data.len())?;
    for (vertex, distance) in data.distances.iter().enumerate() {
        if distance.is_infinite() {
            data.max_neighbour_labels[vertex] = Distance::INFINITY;
            for &head in graph.arcs(vertex as VertexId).heads() {
                data.max_neighbour_labels[head as usize] = Distance::INFINITY;
            }
        }
    }

    let mut queue = MinMaxHeap::with_capacity(seeds.len().max(16));
    dijkstra_core(
        graph,
        &mut data.distances,
        &mut data.parents,
        &mut data.max_neighbour_labels,
        graph.min_cost(),
        divisor,
        seeds,
        &mut queue,
    )
}

/// Exact single-source distances.
pub fn dijkstra_one_to_all(graph: &DistanceGraph, source: VertexId) -> Result<DijkstraData> {
    let mut data = DijkstraData::new(graph.number_of_vertices());
    run_dijkstra(graph, &mut data, 1.0, &[source])?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graphs::{edge::WeightedEdge, graph_functions::bellman_ford},
        queue::heap_queue::HeapQueue,
    };

    // https://jlazarsfeld.github.io/ch.150.project/img/contraction/contract-full-1.png
    fn get_small_graph() -> DistanceGraph {
        let edges = [
            (0, 1, 3.0),
            (0, 2, 5.0),
            (0, 10, 3.0),
            (1, 2, 3.0),
            (1, 3, 5.0),
            (2, 3, 2.0),
            (2, 9, 2.0),
            (3, 4, 7.0),
            (3, 9, 4.0),
            (4, 5, 6.0),
            (4, 9, 3.0),
            (5, 6, 4.0),
            (5, 7, 2.0),
            (6, 7, 3.0),
            (6, 8, 5.0),
            (7, 8, 3.0),
            (7, 9, 2.0),
            (8, 9, 4.0),
            (8, 10, 6.0),
            (9, 10, 3.0),
        ]
        .into_iter()
        .map(|(tail, head, weight)| WeightedEdge::new(tail, head, weight).unwrap())
        .collect::<Vec<_>>();
        DistanceGraph::new(12, &edges).unwrap()
    }

    #[test]
    fn single_source_matches_brute_force() {
        let graph = get_small_graph();
        for source in 0..11 {
            let data = dijkstra_one_to_all(&graph, source).unwrap();
            assert_eq!(data.distances, bellman_ford(&graph, &[source]));
            assert_eq!(data.get_parent(source), TreeLink::Root);
        }
    }

    #[test]
    fn isolated_vertex_stays_unvisited() {
        let graph = get_small_graph();
        let data = dijkstra_one_to_all(&graph, 0).unwrap();
        assert!(data.get_distance(11).is_infinite());
        assert_eq!(data.get_parent(11), TreeLink::Unvisited);

        // a seed without arcs is its own root and nothing else
        let data = dijkstra_one_to_all(&graph, 11).unwrap();
        assert_eq!(data.get_parent(11), TreeLink::Root);
        assert_eq!(data.get_distance(11), 0.0);
        assert_eq!(data.get_parent(0), TreeLink::Unvisited);
    }

    #[test]
    fn multi_source_takes_nearest_seed() {
        let graph = get_small_graph();
        let mut data = DijkstraData::new(graph.number_of_vertices());
        run_dijkstra(&graph, &mut data, 1.0, &[0, 6]).unwrap();
        assert_eq!(data.distances, bellman_ford(&graph, &[0, 6]));
        assert_eq!(data.get_parent(0), TreeLink::Root);
        assert_eq!(data.get_parent(6), TreeLink::Root);
        assert_eq!(data.get_parent(8), TreeLink::Parent(6));
    }

    #[test]
    fn offsets_shift_seed_labels() {
        let graph = get_small_graph();
        let mut data = DijkstraData::new(graph.number_of_vertices());
        run_dijkstra_with_offsets(&graph, &mut data, 1.0, &[(0, 0.0), (6, 20.0)]).unwrap();
        // 6 is 11 away from 0, cheaper than its own offset
        assert_eq!(data.get_distance(6), 11.0);
        assert_eq!(data.get_parent(6), TreeLink::Parent(7));
        assert_eq!(data.get_path(8).unwrap().vertices, vec![0, 10, 8]);
    }

    #[test]
    fn divisor_under_estimates() {
        let graph = get_small_graph();
        let exact = dijkstra_one_to_all(&graph, 0).unwrap();
        let mut relaxed = DijkstraData::new(graph.number_of_vertices());
        run_dijkstra(&graph, &mut relaxed, 0.5, &[0]).unwrap();
        for vertex in 0..11 {
            assert!(relaxed.get_distance(vertex) <= exact.get_distance(vertex));
            assert!(relaxed.get_distance(vertex) >= 0.5 * exact.get_distance(vertex));
        }
    }

    #[test]
    fn contract_violations_fail_fast() {
        let graph = get_small_graph();
        let mut data = DijkstraData::new(graph.number_of_vertices());
        assert_eq!(
            run_dijkstra(&graph, &mut data, 0.0, &[0]),
            Err(Error::InvalidDivisor { divisor: 0.0 })
        );
        assert!(matches!(
            run_dijkstra(&graph, &mut data, 1.5, &[0]),
            Err(Error::InvalidDivisor { .. })
        ));
        assert!(matches!(
            run_dijkstra(&graph, &mut data, 1.0, &[12]),
            Err(Error::VertexOutOfRange { vertex: 12, .. })
        ));
        assert!(matches!(
            run_dijkstra_with_offsets(&graph, &mut data, 1.0, &[(0, -1.0)]),
            Err(Error::InvalidOffset { .. })
        ));

        let mut short = DijkstraData::new(3);
        assert!(matches!(
            run_dijkstra(&graph, &mut short, 1.0, &[0]),
            Err(Error::LengthMismatch { .. })
        ));
    }

    #[test]
    fn absorbed_edge_weight_is_contradictory() {
        let graph = get_small_graph();
        let mut data = DijkstraData::new(graph.number_of_vertices());
        // at this magnitude adding an edge weight no longer changes the sum
        let result = run_dijkstra_with_offsets(&graph, &mut data, 1.0, &[(0, 1e20)]);
        assert!(matches!(
            result,
            Err(Error::ContradictoryPaths { candidate, .. }) if candidate == 1e20
        ));
    }

    #[test]
    fn queue_implementations_agree() {
        let graph = get_small_graph();
        let min_max = dijkstra_one_to_all(&graph, 4).unwrap();

        let mut binary = DijkstraData::new(graph.number_of_vertices());
        binary.distances[4] = 0.0;
        binary.parents[4] = TreeLink::Root;
        let diagnostics = dijkstra_core(
            &graph,
            &mut binary.distances,
            &mut binary.parents,
            &mut binary.max_neighbour_labels,
            graph.min_cost(),
            1.0,
            &[4],
            &mut HeapQueue::new(),
        )
        .unwrap();

        assert_eq!(min_max.distances, binary.distances);
        assert_eq!(diagnostics.nodes_processed, 11);
    }

    #[test]
    fn diagnostics_count_work() {
        let graph = get_small_graph();
        let mut data = DijkstraData::new(graph.number_of_vertices());
        let diagnostics = run_dijkstra(&graph, &mut data, 1.0, &[0]).unwrap();
        // every reachable vertex is processed exactly once
        assert_eq!(diagnostics.nodes_processed, 11);
        assert_eq!(
            diagnostics.nodes_queued,
            diagnostics.nodes_processed
                + diagnostics.nodes_exceeded
                + diagnostics.nodes_min_exceeded
        );
    }

    // 0 - 1 - 2 with a detour 0 - 3 - 2
    fn get_detour_graph() -> DistanceGraph {
        let edges = [(0, 1, 1.0), (1, 2, 1.0), (0, 3, 1.5), (3, 2, 1.0)]
            .into_iter()
            .map(|(tail, head, weight)| WeightedEdge::new(tail, head, weight).unwrap())
            .collect::<Vec<_>>();
        DistanceGraph::new(4, &edges).unwrap()
    }

    #[test]
    fn restart_after_clearing_labels_only() {
        let mut graph = get_detour_graph();
        let mut data = DijkstraData::new(4);
        run_dijkstra(&graph, &mut data, 1.0, &[0]).unwrap();
        assert_eq!(data.get_parent(2), TreeLink::Parent(1));

        graph.set_edge_weight(1, 2, 10.0).unwrap();
        data.distances[2] = Distance::INFINITY;
        data.parents[2] = TreeLink::Unvisited;
        restart_dijkstra(&graph, &mut data, 1.0, &[1, 3]).unwrap();

        assert_eq!(data.distances, vec![0.0, 1.0, 2.5, 1.5]);
        assert_eq!(data.distances, bellman_ford(&graph, &[0]));
        assert_eq!(data.get_parent(2), TreeLink::Parent(3));
    }

    #[test]
    fn settled_labels_prune_restart_seeds() {
        let edges = vec![WeightedEdge::new(0, 1, 1.0).unwrap()];
        let graph = DistanceGraph::new(2, &edges).unwrap();
        let mut data = DijkstraData::new(2);

        let diagnostics = run_dijkstra(&graph, &mut data, 1.0, &[0]).unwrap();
        // 1 has nothing left to improve
        assert_eq!(diagnostics.nodes_tailed, 1);
        assert_eq!(diagnostics.nodes_min_exceeded, 0);

        let diagnostics = restart_dijkstra(&graph, &mut data, 1.0, &[1]).unwrap();
        assert_eq!(diagnostics.nodes_min_exceeded, 1);
        assert_eq!(diagnostics.nodes_processed, 0);
        assert_eq!(data.distances, vec![0.0, 1.0]);
    }

    struct LargestFirst(MinMaxHeap<QueueElement>);

    impl FrontierQueue<QueueElement> for LargestFirst {
        fn insert(&mut self, element: QueueElement) {
            self.0.insert(element);
        }

        fn pop_min(&mut self) -> Option<QueueElement> {
            self.0.pop_max()
        }

        fn len(&self) -> usize {
            self.0.len()
        }

        fn reserve(&mut self, additional: usize) {
            self.0.reserve(additional);
        }

        fn clear(&mut self) {
            self.0.clear();
        }
    }

    #[test]
    fn improving_a_settled_vertex_is_contradictory() {
        //  0 -10- 1
        //   \    /
        //    1  1
        //     \/
        //      2
        let edges = [(0, 1, 10.0), (0, 2, 1.0), (2, 1, 1.0)]
            .into_iter()
            .map(|(tail, head, weight)| WeightedEdge::new(tail, head, weight).unwrap())
            .collect::<Vec<_>>();
        let graph = DistanceGraph::new(3, &edges).unwrap();
        let mut data = DijkstraData::new(3);
        data.distances[0] = 0.0;
        data.parents[0] = TreeLink::Root;

        // settling the farthest vertex first breaks the engine's ordering
        let result = dijkstra_core(
            &graph,
            &mut data.distances,
            &mut data.parents,
            &mut data.max_neighbour_labels,
            graph.min_cost(),
            1.0,
            &[0],
            &mut LargestFirst(MinMaxHeap::new()),
        );
        assert_eq!(
            result,
            Err(Error::ContradictoryPaths {
                vertex: 1,
                settled: 10.0,
                candidate: 2.0
            })
        );
    }
}
