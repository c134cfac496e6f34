use serde::{Deserialize, Serialize};

use crate::{graphs::generator::SectorConfig, search::alt::landmark_table::LandmarkConfig};

/// Everything a benchmark run needs: the sector to generate, the landmark
/// table to build over it and the queries to answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub sector: SectorConfig,
    pub landmarks: LandmarkConfig,
    /// Random source-target pairs to route.
    pub queries: usize,
    /// Seed for drawing the query pairs.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            sector: SectorConfig::default(),
            landmarks: LandmarkConfig::default(),
            queries: 1_000,
            seed: 0,
        }
    }
}
