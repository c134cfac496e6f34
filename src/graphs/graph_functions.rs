use std::collections::VecDeque;

use super::{distance_graph::DistanceGraph, path::Path, Distance, VertexId};

/// Connected components, each sorted ascending and ordered by their smallest
/// vertex.
pub fn connected_components(graph: &DistanceGraph) -> Vec<Vec<VertexId>> {
    let mut component_of = vec![usize::MAX; graph.number_of_vertices()];
    let mut components = Vec::new();

    for start in 0..graph.number_of_vertices() as VertexId {
        if component_of[start as usize] != usize::MAX {
            continue;
        }

        let id = components.len();
        let mut members = vec![start];
        let mut queue = VecDeque::from([start]);
        component_of[start as usize] = id;

        while let Some(vertex) = queue.pop_front() {
            for &head in graph.arcs(vertex).heads() {
                if component_of[head as usize] == usize::MAX {
                    component_of[head as usize] = id;
                    members.push(head);
                    queue.push_back(head);
                }
            }
        }

        members.sort_unstable();
        components.push(members);
    }

    components
}

/// Sums the edge weights along `vertices`, or `None` if two consecutive
/// vertices are not adjacent.
pub fn path_distance(graph: &DistanceGraph, vertices: &[VertexId]) -> Option<Distance> {
    let mut distance = 0.0;
    for pair in vertices.windows(2) {
        distance += graph.get_weight(pair[0], pair[1])?;
    }
    Some(distance)
}

/// Check if a path is a valid `source`-`target` path of the expected length.
pub fn validate_path(
    graph: &DistanceGraph,
    source: VertexId,
    target: VertexId,
    expected: Distance,
    path: &Path,
) -> Result<(), String> {
    // Ensure first and last vertex of path are source and target of request.
    if path.vertices.first() != Some(&source) {
        return Err("first vertex of path is not source of request".to_string());
    }
    if path.vertices.last() != Some(&target) {
        return Err("last vertex of path is not target of request".to_string());
    }

    let Some(true_cost) = path_distance(graph, &path.vertices) else {
        return Err("path uses a missing edge".to_string());
    };
    if true_cost != path.distance {
        return Err(format!(
            "path claims distance {} but its edges sum to {}",
            path.distance, true_cost
        ));
    }
    if path.distance != expected {
        return Err(format!(
            "wrong path distance {}, expected {}",
            path.distance, expected
        ));
    }

    Ok(())
}

/// Brute-force multi-source distances by repeated full relaxation. Quadratic;
/// only meant as an independent reference for small graphs.
pub fn bellman_ford(graph: &DistanceGraph, sources: &[VertexId]) -> Vec<Distance> {
    let mut distances = vec![Distance::INFINITY; graph.number_of_vertices()];
    for &source in sources {
        distances[source as usize] = 0.0;
    }

    loop {
        let mut changed = false;
        for tail in 0..graph.number_of_vertices() as VertexId {
            let distance_tail = distances[tail as usize];
            if distance_tail.is_infinite() {
                continue;
            }
            for (head, weight) in graph.arcs(tail).iter() {
                let alternative = distance_tail + weight;
                if alternative < distances[head as usize] {
                    distances[head as usize] = alternative;
                    changed = true;
                }
            }
        }
        if !changed {
            return distances;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::edge::WeightedEdge;

    fn two_islands() -> DistanceGraph {
        let edges = vec![
            WeightedEdge::new(0, 2, 1.0).unwrap(),
            WeightedEdge::new(2, 4, 2.0).unwrap(),
            WeightedEdge::new(1, 3, 5.0).unwrap(),
        ];
        DistanceGraph::new(6, &edges).unwrap()
    }

    #[test]
    fn components_are_ordered() {
        let components = connected_components(&two_islands());
        assert_eq!(components, vec![vec![0, 2, 4], vec![1, 3], vec![5]]);
    }

    #[test]
    fn brute_force_distances() {
        let distances = bellman_ford(&two_islands(), &[4]);
        assert_eq!(distances[0], 3.0);
        assert_eq!(distances[2], 2.0);
        assert!(distances[1].is_infinite());
        assert!(distances[5].is_infinite());
    }

    #[test]
    fn path_validation() {
        let graph = two_islands();
        let path = Path {
            vertices: vec![0, 2, 4],
            distance: 3.0,
        };
        assert_eq!(validate_path(&graph, 0, 4, 3.0, &path), Ok(()));
        assert!(validate_path(&graph, 0, 4, 2.0, &path).is_err());
        assert_eq!(path_distance(&graph, &[0, 4]), None);
    }
}
