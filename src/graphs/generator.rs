use ahash::{HashMap, HashMapExt};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{distance_graph::DistanceGraph, edge::WeightedEdge, position::HexPosition, VertexId};
use crate::error::{Error, Result};

/// Route cost per jump length in parsecs. Index 0 is unused.
pub const DISTANCE_WEIGHT: [f64; 7] = [0.0, 30.0, 50.0, 75.0, 130.0, 230.0, 490.0];

/// Parameters for a synthetic sector of star systems.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectorConfig {
    /// Hex columns.
    pub width: i32,
    /// Hex rows.
    pub height: i32,
    /// Probability that a hex holds a star system.
    pub density: f64,
    /// Longest jump that produces an edge, at most 6 parsecs.
    pub max_jump: u32,
    pub seed: u64,
}

impl Default for SectorConfig {
    fn default() -> Self {
        SectorConfig {
            width: 32,
            height: 40,
            density: 0.35,
            max_jump: 4,
            seed: 0,
        }
    }
}

/// Star systems of a sector together with their jump graph.
pub struct StarGraph {
    pub graph: DistanceGraph,
    pub positions: Vec<HexPosition>,
}

/// Scatters star systems over a hex grid and links every pair within jump
/// range, weighted by [`DISTANCE_WEIGHT`].
pub fn random_sector(config: &SectorConfig) -> Result<StarGraph> {
    if !(0.0..=1.0).contains(&config.density) {
        return Err(Error::InvalidDensity {
            density: config.density,
        });
    }
    let mut rng = StdRng::seed_from_u64(config.seed);
    let max_jump = config.max_jump.min(DISTANCE_WEIGHT.len() as u32 - 1) as i32;

    let mut positions = Vec::new();
    let mut occupied: HashMap<HexPosition, VertexId> = HashMap::new();
    for column in 0..config.width {
        for row in 0..config.height {
            if rng.gen_bool(config.density) {
                let position = HexPosition::from_offset(column, row);
                occupied.insert(position, positions.len() as VertexId);
                positions.push(position);
            }
        }
    }

    let mut edges = Vec::new();
    for (tail, position) in positions.iter().enumerate() {
        for dq in -max_jump..=max_jump {
            for dr in -max_jump..=max_jump {
                let other = HexPosition::new(position.q + dq, position.r + dr);
                let Some(&head) = occupied.get(&other) else {
                    continue;
                };
                let jump = position.distance(&other);
                if head as usize <= tail || jump as i32 > max_jump {
                    continue;
                }
                edges.push(WeightedEdge::new(
                    tail as VertexId,
                    head,
                    DISTANCE_WEIGHT[jump as usize],
                )?);
            }
        }
    }

    let graph = DistanceGraph::new(positions.len(), &edges)?;
    Ok(StarGraph { graph, positions })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_is_deterministic_per_seed() {
        let config = SectorConfig {
            width: 8,
            height: 10,
            seed: 7,
            ..Default::default()
        };
        let first = random_sector(&config).unwrap();
        let second = random_sector(&config).unwrap();
        assert_eq!(first.positions, second.positions);
        assert_eq!(first.graph.number_of_edges(), second.graph.number_of_edges());
    }

    #[test]
    fn edges_respect_jump_range() {
        let config = SectorConfig {
            width: 10,
            height: 10,
            density: 0.5,
            max_jump: 2,
            seed: 3,
        };
        let sector = random_sector(&config).unwrap();
        for tail in 0..sector.graph.number_of_vertices() as VertexId {
            for (head, weight) in sector.graph.arcs(tail).iter() {
                let jump = sector.positions[tail as usize].distance(&sector.positions[head as usize]);
                assert!((1..=2).contains(&jump));
                assert_eq!(weight, DISTANCE_WEIGHT[jump as usize]);
            }
        }
    }

    #[test]
    fn density_must_be_a_probability() {
        for density in [f64::NAN, -0.1, 1.5] {
            let config = SectorConfig {
                density,
                ..Default::default()
            };
            assert!(matches!(
                random_sector(&config),
                Err(Error::InvalidDensity { .. })
            ));
        }
    }
}
