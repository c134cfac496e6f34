use super::FrontierQueue;

/// Double-ended priority queue.
///
/// Elements on even levels are no larger than any of their descendants, and
/// elements on odd levels are no smaller. The root is therefore the minimum
/// and one of its two children the maximum.
#[derive(Clone, Debug)]
pub struct MinMaxHeap<T: Ord> {
    heap: Vec<T>,
}

impl<T: Ord> Default for MinMaxHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> MinMaxHeap<T> {
    pub fn new() -> MinMaxHeap<T> {
        MinMaxHeap { heap: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> MinMaxHeap<T> {
        MinMaxHeap {
            heap: Vec::with_capacity(capacity),
        }
    }

    pub fn peek_min(&self) -> Option<&T> {
        self.heap.first()
    }

    pub fn peek_max(&self) -> Option<&T> {
        self.max_index().map(|index| &self.heap[index])
    }

    /// Removes and returns the largest element, or `None` if the heap is
    /// empty.
    pub fn pop_max(&mut self) -> Option<T> {
        let index = self.max_index()?;
        let element = self.heap.swap_remove(index);
        if index < self.heap.len() {
            self.trickle_down(index);
        }
        Some(element)
    }

    fn max_index(&self) -> Option<usize> {
        match self.heap.len() {
            0 => None,
            1 => Some(0),
            2 => Some(1),
            _ => {
                if self.heap[1] >= self.heap[2] {
                    Some(1)
                } else {
                    Some(2)
                }
            }
        }
    }

    fn is_min_level(index: usize) -> bool {
        (index + 1).ilog2() % 2 == 0
    }

    fn bubble_up(&mut self, index: usize) {
        if index == 0 {
            return;
        }

        let parent = (index - 1) / 2;
        if Self::is_min_level(index) {
            if self.heap[index] > self.heap[parent] {
                self.heap.swap(index, parent);
                self.bubble_up_max(parent);
            } else {
                self.bubble_up_min(index);
            }
        } else if self.heap[index] < self.heap[parent] {
            self.heap.swap(index, parent);
            self.bubble_up_min(parent);
        } else {
            self.bubble_up_max(index);
        }
    }

    fn bubble_up_min(&mut self, mut index: usize) {
        while index >= 3 {
            let grandparent = (index - 3) / 4;
            if self.heap[index] < self.heap[grandparent] {
                self.heap.swap(index, grandparent);
                index = grandparent;
            } else {
                break;
            }
        }
    }

    fn bubble_up_max(&mut self, mut index: usize) {
        while index >= 3 {
            let grandparent = (index - 3) / 4;
            if self.heap[index] > self.heap[grandparent] {
                self.heap.swap(index, grandparent);
                index = grandparent;
            } else {
                break;
            }
        }
    }

    fn trickle_down(&mut self, index: usize) {
        if Self::is_min_level(index) {
            self.trickle_down_by(index, |a, b| a < b);
        } else {
            self.trickle_down_by(index, |a, b| a > b);
        }
    }

    /// Sifts `index` down its own kind of level. `before(a, b)` is true when
    /// `a` belongs nearer the root than `b` on those levels.
    fn trickle_down_by(&mut self, mut index: usize, before: impl Fn(&T, &T) -> bool) {
        loop {
            let first_child = 2 * index + 1;
            if first_child >= self.heap.len() {
                return;
            }

            // best among children and grandchildren
            let first_grandchild = 4 * index + 3;
            let last = (4 * index + 7).min(self.heap.len());
            let mut best = first_child;
            if first_child + 1 < self.heap.len()
                && before(&self.heap[first_child + 1], &self.heap[best])
            {
                best = first_child + 1;
            }
            for candidate in first_grandchild..last {
                if before(&self.heap[candidate], &self.heap[best]) {
                    best = candidate;
                }
            }

            if !before(&self.heap[best], &self.heap[index]) {
                return;
            }
            self.heap.swap(best, index);

            if best < first_grandchild {
                return;
            }
            let parent = (best - 1) / 2;
            if before(&self.heap[parent], &self.heap[best]) {
                self.heap.swap(parent, best);
            }
            index = best;
        }
    }
}

impl<T: Ord> FrontierQueue<T> for MinMaxHeap<T> {
    fn insert(&mut self, element: T) {
        self.heap.push(element);
        self.bubble_up(self.heap.len() - 1);
    }

    fn pop_min(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let element = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.trickle_down(0);
        }
        Some(element)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn reserve(&mut self, additional: usize) {
        self.heap.reserve(additional);
    }

    fn clear(&mut self) {
        self.heap.clear();
    }
}
