use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::{check_length, Result},
    graphs::{
        distance_graph::DistanceGraph, graph_functions::connected_components,
        position::HexPosition, Distance, VertexId,
    },
    search::{
        collections::dijkstra_data::{DijkstraData, TreeLink},
        dijkstra::restart_dijkstra,
    },
};

/// Key minimised by the extremal landmark of `slot`, for the first six slots.
fn extreme_key(slot: usize, position: &HexPosition) -> Option<i32> {
    match slot {
        0 => Some(-position.q),
        1 => Some(position.r),
        2 => Some(position.s()),
        3 => Some(position.q),
        4 => Some(-position.r),
        5 => Some(-position.s()),
        _ => None,
    }
}

/// Landmarks grouped into slots.
///
/// Slot `i` holds the `i`-th landmark of every connected component that got
/// one, so a single multi-source run per slot covers the whole graph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkSet {
    slots: Vec<Vec<VertexId>>,
}

impl LandmarkSet {
    pub fn new(slots: Vec<Vec<VertexId>>) -> LandmarkSet {
        LandmarkSet { slots }
    }

    pub fn slots(&self) -> &[Vec<VertexId>] {
        &self.slots
    }

    pub fn number_of_slots(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All landmarks, slot by slot.
    pub fn vertices(&self) -> Vec<VertexId> {
        self.slots.iter().flatten().copied().collect()
    }
}

pub struct LandmarkSelector;

impl LandmarkSelector {
    /// Picks up to `count_hint` landmarks in every connected component with
    /// more than one vertex.
    ///
    /// The first six come from the extremes along the hex axes (max q, min r,
    /// min s, min q, max r, max s). Further landmarks, and replacements for
    /// extremes that were already picked, maximise the graph distance to the
    /// nearest landmark chosen so far. Ties go to the lowest vertex id.
    pub fn select(
        graph: &DistanceGraph,
        positions: &[HexPosition],
        count_hint: usize,
    ) -> Result<LandmarkSet> {
        check_length("positions", graph.number_of_vertices(), positions.len())?;
        if count_hint == 0 {
            return Ok(LandmarkSet::default());
        }

        let components = connected_components(graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .collect_vec();

        let mut slots = vec![Vec::new(); count_hint];
        // distance to the nearest landmark, shared by all components
        let mut nearest = DijkstraData::new(graph.number_of_vertices());

        for component in &components {
            let mut chosen: Vec<VertexId> = Vec::new();
            let mut pending: Vec<VertexId> = Vec::new();

            for (slot, landmarks) in slots.iter_mut().enumerate() {
                let extreme = component
                    .iter()
                    .copied()
                    .filter_map(|vertex| {
                        Some((extreme_key(slot, &positions[vertex as usize])?, vertex))
                    })
                    .min()
                    .map(|(_, vertex)| vertex)
                    .filter(|vertex| !chosen.contains(vertex));

                let landmark = match extreme {
                    Some(vertex) => Some(vertex),
                    None => {
                        for &vertex in &pending {
                            nearest.distances[vertex as usize] = 0.0;
                            nearest.parents[vertex as usize] = TreeLink::Root;
                        }
                        restart_dijkstra(graph, &mut nearest, 1.0, &pending)?;
                        pending.clear();
                        farthest_vertex(component, &nearest.distances)
                    }
                };

                // a component smaller than the slot count runs out of vertices
                if let Some(vertex) = landmark {
                    chosen.push(vertex);
                    pending.push(vertex);
                    landmarks.push(vertex);
                }
            }
        }

        debug!(
            "selected {} landmark slots over {} components",
            slots.len(),
            components.len()
        );
        Ok(LandmarkSet { slots })
    }
}

/// Vertex of `component` farthest from every landmark so far, if any vertex
/// is not a landmark yet.
fn farthest_vertex(component: &[VertexId], nearest: &[Distance]) -> Option<VertexId> {
    let mut best: Option<(VertexId, Distance)> = None;
    for &vertex in component {
        let distance = nearest[vertex as usize];
        if distance > best.map_or(0.0, |(_, best_distance)| best_distance) {
            best = Some((vertex, distance));
        }
    }
    best.map(|(vertex, _)| vertex)
}
