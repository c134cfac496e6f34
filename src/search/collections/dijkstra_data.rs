use serde::{Deserialize, Serialize};

use crate::graphs::{path::Path, Distance, VertexId};

/// Position of a vertex in a shortest-path tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TreeLink {
    /// Not reached by the current run.
    Unvisited,
    /// Seed of the current run.
    Root,
    /// Reached through the given predecessor.
    Parent(VertexId),
}

impl TreeLink {
    pub fn predecessor(&self) -> Option<VertexId> {
        match self {
            TreeLink::Parent(predecessor) => Some(*predecessor),
            _ => None,
        }
    }
}

/// Per-run state of the shortest-path engine, one slot per vertex.
///
/// Vertices are addressed by index and parents are stored as indices, so a
/// subtree can be cleared and regrown without touching the rest of the tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DijkstraData {
    pub distances: Vec<Distance>,
    pub parents: Vec<TreeLink>,
    pub max_neighbour_labels: Vec<Distance>,
}

impl DijkstraData {
    /// Constructs empty state for `number_of_vertices` vertices.
    pub fn new(number_of_vertices: usize) -> Self {
        DijkstraData {
            distances: vec![Distance::INFINITY; number_of_vertices],
            parents: vec![TreeLink::Unvisited; number_of_vertices],
            max_neighbour_labels: vec![Distance::INFINITY; number_of_vertices],
        }
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Clears all stored data, preparing for a new search.
    pub fn clear(&mut self) {
        self.distances.fill(Distance::INFINITY);
        self.parents.fill(TreeLink::Unvisited);
        self.max_neighbour_labels.fill(Distance::INFINITY);
    }

    pub fn get_distance(&self, vertex: VertexId) -> Distance {
        self.distances[vertex as usize]
    }

    pub fn get_parent(&self, vertex: VertexId) -> TreeLink {
        self.parents[vertex as usize]
    }

    /// Constructs the path from the root of the tree to a target vertex.
    ///
    /// Returns `None` if the target is unreachable or its parent chain does
    /// not end in a root.
    pub fn get_path(&self, target: VertexId) -> Option<Path> {
        let distance = *self.distances.get(target as usize)?;
        if distance == Distance::INFINITY {
            return None;
        }
        let vertices = trace_parents(&self.parents, target)?;
        Some(Path { vertices, distance })
    }

    /// Children lists derived from the parent links.
    pub fn children(&self) -> Vec<Vec<VertexId>> {
        let mut children = vec![Vec::new(); self.len()];
        for (vertex, parent) in self.parents.iter().enumerate() {
            if let TreeLink::Parent(predecessor) = parent {
                children[*predecessor as usize].push(vertex as VertexId);
            }
        }
        children
    }
}

/// Follows parent links from `target` back to a root and returns the vertices
/// in root-to-target order.
pub fn trace_parents(parents: &[TreeLink], target: VertexId) -> Option<Vec<VertexId>> {
    let mut vertices = vec![target];
    let mut current = target;
    loop {
        match *parents.get(current as usize)? {
            TreeLink::Root => break,
            TreeLink::Unvisited => return None,
            TreeLink::Parent(predecessor) => {
                // a chain longer than the vertex count has a cycle
                if vertices.len() > parents.len() {
                    return None;
                }
                vertices.push(predecessor);
                current = predecessor;
            }
        }
    }
    vertices.reverse();
    Some(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_follows_parents_to_root() {
        let mut data = DijkstraData::new(4);
        data.distances = vec![0.0, 1.0, 3.0, Distance::INFINITY];
        data.parents = vec![
            TreeLink::Root,
            TreeLink::Parent(0),
            TreeLink::Parent(1),
            TreeLink::Unvisited,
        ];

        let path = data.get_path(2).unwrap();
        assert_eq!(path.vertices, vec![0, 1, 2]);
        assert_eq!(path.distance, 3.0);
        assert_eq!(data.get_path(3), None);
        assert_eq!(data.get_path(0).unwrap().vertices, vec![0]);
        assert_eq!(data.children()[1], vec![2]);
    }

    #[test]
    fn broken_chain_has_no_path() {
        let mut data = DijkstraData::new(3);
        data.distances = vec![Distance::INFINITY, 2.0, 1.0];
        data.parents = vec![TreeLink::Unvisited, TreeLink::Parent(2), TreeLink::Parent(1)];
        assert_eq!(data.get_path(1), None);
    }

    #[test]
    fn clear_resets_every_column() {
        let mut data = DijkstraData::new(2);
        data.distances[0] = 0.0;
        data.parents[0] = TreeLink::Root;
        data.max_neighbour_labels[0] = 4.0;
        data.clear();
        assert_eq!(data.parents, vec![TreeLink::Unvisited; 2]);
        assert!(data.distances.iter().all(|distance| distance.is_infinite()));
        assert!(data.max_neighbour_labels.iter().all(|label| label.is_infinite()));
        assert_eq!(TreeLink::Parent(5).predecessor(), Some(5));
        assert_eq!(TreeLink::Root.predecessor(), None);
    }
}
