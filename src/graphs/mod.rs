pub mod distance_graph;
pub mod edge;
pub mod generator;
pub mod graph_functions;
pub mod path;
pub mod position;

/// Dense star-system identifier in `0..N`.
pub type VertexId = u32;
pub type Distance = f64;
