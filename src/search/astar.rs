use std::cmp::Ordering;

use log::trace;
use serde::{Deserialize, Serialize};

use super::collections::dijkstra_data::{trace_parents, TreeLink};
use crate::{
    error::{check_length, check_vertex, Error, Result},
    graphs::{distance_graph::DistanceGraph, Distance, VertexId},
    queue::{min_max_heap::MinMaxHeap, FrontierQueue},
    utility::round_to,
};

/// Work counters of a single A* query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AStarDiagnostics {
    pub nodes_expanded: u64,
    pub nodes_queued: u64,
    pub nodes_revisited: u64,
    /// Times a cheaper route to the target tightened the bound.
    pub new_upbounds: u64,
    /// Expansions where no neighbour stayed within its upper limit.
    pub g_exhausted: u64,
    /// Expansions where every neighbour within its limit failed the bound.
    pub f_exhausted: u64,
    /// Expansions that found the target and nothing else worth queueing.
    pub targ_exhausted: u64,
    pub branch_factor: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AStarResult {
    pub path: Vec<VertexId>,
    pub cost: Distance,
    pub diagnostics: AStarDiagnostics,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AStarOutcome {
    /// A route strictly cheaper than the caller's bound.
    Found(AStarResult),
    /// Nothing beats the caller's bound; its known route stands.
    BoundNotImproved(AStarDiagnostics),
}

impl AStarOutcome {
    pub fn diagnostics(&self) -> &AStarDiagnostics {
        match self {
            AStarOutcome::Found(result) => &result.diagnostics,
            AStarOutcome::BoundNotImproved(diagnostics) => diagnostics,
        }
    }

    pub fn found(self) -> Option<AStarResult> {
        match self {
            AStarOutcome::Found(result) => Some(result),
            AStarOutcome::BoundNotImproved(_) => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct AStarElement {
    priority: Distance,
    distance: Distance,
    vertex: VertexId,
    parent: TreeLink,
}

impl Ord for AStarElement {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| self.distance.total_cmp(&other.distance))
            .then_with(|| self.vertex.cmp(&other.vertex))
            .then_with(|| self.parent.cmp(&other.parent))
    }
}

impl PartialOrd for AStarElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for AStarElement {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AStarElement {}

/// Best-first search from `source` to `target` with branch-and-bound pruning.
///
/// `potentials` must be an admissible lower bound on the remaining distance
/// to `target`, e.g. [`LandmarkTable::lower_bound_bulk`]. `upbound` is the
/// cost of a route the caller already knows; only strictly cheaper routes are
/// reported. `upper_limits` caps the distance at which each vertex may be
/// reached and defaults to `upbound` minus the cheapest one or two jumps still
/// needed from there.
///
/// [`LandmarkTable::lower_bound_bulk`]: super::alt::landmark_table::LandmarkTable::lower_bound_bulk
pub fn astar(
    graph: &DistanceGraph,
    source: VertexId,
    target: VertexId,
    potentials: &[Distance],
    upbound: Option<Distance>,
    upper_limits: Option<&[Distance]>,
) -> Result<AStarOutcome> {
    let number_of_vertices = graph.number_of_vertices();
    check_vertex(source, number_of_vertices)?;
    check_vertex(target, number_of_vertices)?;
    check_length("potentials", number_of_vertices, potentials.len())?;
    if let Some(upper_limits) = upper_limits {
        check_length("upper limits", number_of_vertices, upper_limits.len())?;
    }

    let caller_bound = upbound.is_some();
    let mut upbound = upbound.unwrap_or(Distance::MAX);
    let mut diagnostics = AStarDiagnostics::default();

    // nothing reachable from here can beat the bound
    if potentials[source as usize] >= upbound {
        if !caller_bound {
            return Err(Error::NoPath {
                from: source,
                target,
            });
        }
        diagnostics.branch_factor = 1.0;
        return Ok(AStarOutcome::BoundNotImproved(diagnostics));
    }
    if source == target {
        diagnostics.branch_factor = 1.0;
        return Ok(AStarOutcome::Found(AStarResult {
            path: vec![source],
            cost: 0.0,
            diagnostics,
        }));
    }

    let remaining = graph.min_cost_indirect_towards(target);
    let mut upper_limit: Vec<Distance> = match upper_limits {
        Some(upper_limits) => upper_limits.to_vec(),
        None => remaining.iter().map(|cost| upbound - cost).collect(),
    };
    let mut distances = vec![Distance::INFINITY; number_of_vertices];
    let mut parents = vec![TreeLink::Unvisited; number_of_vertices];
    let mut expanded_at = vec![Distance::INFINITY; number_of_vertices];

    distances[source as usize] = 0.0;
    let mut queue = MinMaxHeap::new();
    queue.insert(AStarElement {
        priority: potentials[source as usize],
        distance: 0.0,
        vertex: source,
        parent: TreeLink::Root,
    });

    while let Some(AStarElement {
        distance,
        vertex: tail,
        parent,
        ..
    }) = queue.pop_min()
    {
        let index = tail as usize;

        if tail == target {
            parents[index] = parent;
            let path = trace_parents(&parents, target).ok_or(Error::NoPath {
                from: source,
                target,
            })?;
            diagnostics.branch_factor =
                branching_factor(diagnostics.nodes_queued, path.len() as u64 - 1);
            trace!("astar {} -> {}: {:?}", source, target, diagnostics);
            return Ok(AStarOutcome::Found(AStarResult {
                path,
                cost: distance,
                diagnostics,
            }));
        }

        if expanded_at[index].is_finite() {
            diagnostics.nodes_revisited += 1;
        }
        // stale, or already expanded at no higher cost
        if distance > distances[index] || distance >= expanded_at[index] {
            continue;
        }
        expanded_at[index] = distance;
        parents[index] = parent;
        diagnostics.nodes_expanded += 1;

        let arcs = graph.arcs(tail);
        let mut within_limit = 0;
        let mut found_target = false;
        let mut queued = 0;
        for (head, weight) in arcs.iter() {
            let head_index = head as usize;
            let candidate = distance + weight;
            if candidate > upper_limit[head_index] {
                continue;
            }
            within_limit += 1;

            if head == target {
                if candidate < upbound {
                    upbound = candidate;
                    diagnostics.new_upbounds += 1;
                    distances[head_index] = candidate;
                    for (limit, cost) in upper_limit.iter_mut().zip(&remaining) {
                        *limit = limit.min(upbound - cost);
                    }
                    while queue
                        .peek_max()
                        .map_or(false, |element| element.priority >= upbound)
                    {
                        queue.pop_max();
                    }
                    queue.insert(AStarElement {
                        priority: upbound,
                        distance: upbound,
                        vertex: target,
                        parent: TreeLink::Parent(tail),
                    });
                    diagnostics.nodes_queued += 1;
                    found_target = true;
                }
                continue;
            }

            let augmented = candidate + potentials[head_index];
            if augmented >= upbound || candidate >= distances[head_index] {
                continue;
            }
            distances[head_index] = candidate;
            queue.insert(AStarElement {
                priority: augmented,
                distance: candidate,
                vertex: head,
                parent: TreeLink::Parent(tail),
            });
            queued += 1;
        }

        diagnostics.nodes_queued += queued;
        if queued == 0 {
            if found_target {
                diagnostics.targ_exhausted += 1;
            } else if within_limit == 0 {
                diagnostics.g_exhausted += 1;
            } else {
                diagnostics.f_exhausted += 1;
            }
        }
    }

    trace!("astar {} -> {} exhausted: {:?}", source, target, diagnostics);
    if caller_bound {
        diagnostics.branch_factor = 1.0;
        return Ok(AStarOutcome::BoundNotImproved(diagnostics));
    }
    Err(Error::NoPath {
        from: source,
        target,
    })
}

/// Effective branching factor `r` of a search that queued `nodes_queued`
/// vertices to find a path of `path_len` jumps, i.e. the solution of
/// `r^d = S*r - S + r`, rounded to three decimals.
pub fn branching_factor(nodes_queued: u64, path_len: u64) -> f64 {
    if path_len == nodes_queued || path_len < 1 || nodes_queued < 1 {
        return 1.0;
    }

    let queued = nodes_queued as f64;
    let power = 1.0 / path_len as f64;
    let mut old = 0.0;
    let mut new = 0.5 * (1.0 + queued.powf(power));
    while (new - old).abs() >= 0.001 {
        old = new;
        new = (queued * new - queued + new).powf(power);
    }
    round_to(new, 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::{edge::WeightedEdge, graph_functions::bellman_ford};

    const A: VertexId = 0;
    const B: VertexId = 1;
    const C: VertexId = 2;
    const D: VertexId = 3;

    fn get_diamond() -> DistanceGraph {
        let edges = [(A, B, 1.0), (B, C, 1.0), (C, D, 1.0), (A, D, 5.0)]
            .into_iter()
            .map(|(tail, head, weight)| WeightedEdge::new(tail, head, weight).unwrap())
            .collect::<Vec<_>>();
        DistanceGraph::new(4, &edges).unwrap()
    }

    #[test]
    fn prefers_cheaper_detour() {
        let graph = get_diamond();
        let outcome = astar(&graph, A, D, &[0.0; 4], None, None).unwrap();
        let result = outcome.found().unwrap();
        assert_eq!(result.path, vec![A, B, C, D]);
        assert_eq!(result.cost, 3.0);
    }

    #[test]
    fn exact_potentials_expand_only_the_path() {
        let graph = get_diamond();
        let potentials = bellman_ford(&graph, &[D]);
        let result = astar(&graph, A, D, &potentials, None, None)
            .unwrap()
            .found()
            .unwrap();
        assert_eq!(result.path, vec![A, B, C, D]);
        assert_eq!(result.diagnostics.nodes_expanded, 3);
    }

    #[test]
    fn tight_bound_expands_nothing() {
        let graph = get_diamond();
        let potentials = bellman_ford(&graph, &[D]);
        let outcome = astar(&graph, A, D, &potentials, Some(3.0), None).unwrap();
        assert_eq!(outcome.diagnostics().nodes_expanded, 0);
        assert!(matches!(outcome, AStarOutcome::BoundNotImproved(_)));

        // without a heuristic the bound still stops every route of cost 3
        let outcome = astar(&graph, A, D, &[0.0; 4], Some(3.0), None).unwrap();
        assert!(matches!(outcome, AStarOutcome::BoundNotImproved(_)));
    }

    #[test]
    fn loose_bound_is_improved() {
        let graph = get_diamond();
        let outcome = astar(&graph, A, D, &[0.0; 4], Some(5.0), None).unwrap();
        let result = outcome.found().unwrap();
        assert_eq!(result.cost, 3.0);
    }

    #[test]
    fn upper_limits_restrict_routes() {
        let graph = get_diamond();
        // C may not be reached, so only the direct edge is left
        let limits = [0.0, Distance::MAX, -1.0, Distance::MAX];
        let result = astar(&graph, A, D, &[0.0; 4], None, Some(&limits[..]))
            .unwrap()
            .found()
            .unwrap();
        assert_eq!(result.path, vec![A, D]);
        assert_eq!(result.cost, 5.0);
    }

    #[test]
    fn unreachable_target() {
        let edges = vec![WeightedEdge::new(0, 1, 1.0).unwrap()];
        let graph = DistanceGraph::new(3, &edges).unwrap();
        assert_eq!(
            astar(&graph, 0, 2, &[0.0; 3], None, None),
            Err(Error::NoPath { from: 0, target: 2 })
        );
    }

    #[test]
    fn unbounded_query_across_components() {
        let edges = [(0, 1, 1.0), (1, 2, 1.0), (3, 4, 1.0)]
            .into_iter()
            .map(|(tail, head, weight)| WeightedEdge::new(tail, head, weight).unwrap())
            .collect::<Vec<_>>();
        let graph = DistanceGraph::new(5, &edges).unwrap();
        let potentials = [0.0, 1.0, 2.0, Distance::INFINITY, Distance::INFINITY];
        assert_eq!(
            astar(&graph, 3, 0, &potentials, None, None),
            Err(Error::NoPath { from: 3, target: 0 })
        );
        // with a known route the same query just keeps it
        assert!(matches!(
            astar(&graph, 3, 0, &potentials, Some(10.0), None),
            Ok(AStarOutcome::BoundNotImproved(_))
        ));
    }

    #[test]
    fn source_is_target() {
        let graph = get_diamond();
        let result = astar(&graph, B, B, &[0.0; 4], None, None)
            .unwrap()
            .found()
            .unwrap();
        assert_eq!(result.path, vec![B]);
        assert_eq!(result.cost, 0.0);
    }

    #[test]
    fn bad_inputs_are_rejected() {
        let graph = get_diamond();
        assert!(matches!(
            astar(&graph, A, 9, &[0.0; 4], None, None),
            Err(Error::VertexOutOfRange { vertex: 9, .. })
        ));
        assert!(matches!(
            astar(&graph, A, D, &[0.0; 3], None, None),
            Err(Error::LengthMismatch { .. })
        ));
        assert!(matches!(
            astar(&graph, A, D, &[0.0; 4], None, Some(&[0.0; 2][..])),
            Err(Error::LengthMismatch { .. })
        ));
    }

    #[test]
    fn branching_factor_values() {
        assert_eq!(branching_factor(3, 3), 1.0);
        assert_eq!(branching_factor(0, 2), 1.0);
        assert_eq!(branching_factor(5, 0), 1.0);
        // two children per vertex over three jumps solves to r = 2
        assert!((branching_factor(6, 3) - 2.0).abs() < 0.01);
    }
}
