use std::cmp::Ordering;

use crate::graphs::{Distance, VertexId};

pub mod heap_queue;
pub mod min_max_heap;

/// Frontier entry of a shortest-path search.
///
/// For plain Dijkstra `priority == distance`; heuristic searches store the
/// augmented cost in `priority`.
#[derive(Copy, Clone, Debug)]
pub struct QueueElement {
    pub priority: Distance,
    pub distance: Distance,
    pub vertex: VertexId,
}

impl QueueElement {
    pub fn new(priority: Distance, distance: Distance, vertex: VertexId) -> QueueElement {
        QueueElement {
            priority,
            distance,
            vertex,
        }
    }
}

// Ascending order: smallest priority first, ties broken by distance and then
// by vertex so that equal keys never compare as unordered.
impl Ord for QueueElement {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| self.distance.total_cmp(&other.distance))
            .then_with(|| self.vertex.cmp(&other.vertex))
    }
}

impl PartialOrd for QueueElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueElement {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueElement {}

/// Priority queue holding the not yet settled frontier of a search.
///
/// Implementations do not need a decrease-key operation; searches push
/// duplicates and discard stale entries on pop.
pub trait FrontierQueue<T: Ord> {
    fn insert(&mut self, element: T);

    /// Removes and returns the smallest element, or `None` if the queue is
    /// empty.
    fn pop_min(&mut self) -> Option<T>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn reserve(&mut self, additional: usize);

    fn clear(&mut self);
}
