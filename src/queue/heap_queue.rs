use std::{cmp::Reverse, collections::BinaryHeap};

use super::FrontierQueue;

/// Min-queue on top of the standard binary (max-)heap.
#[derive(Clone)]
pub struct HeapQueue<T: Ord> {
    heap: BinaryHeap<Reverse<T>>,
}

impl<T: Ord> Default for HeapQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> HeapQueue<T> {
    pub fn new() -> HeapQueue<T> {
        HeapQueue {
            heap: BinaryHeap::new(),
        }
    }
}

impl<T: Ord> FrontierQueue<T> for HeapQueue<T> {
    fn insert(&mut self, element: T) {
        self.heap.push(Reverse(element));
    }

    fn pop_min(&mut self) -> Option<T> {
        let Reverse(element) = self.heap.pop()?;
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
