//! Generic min-priority queue driving the search

/// Binary min-heap over `(key, item)` pairs with `f32` keys.
///
/// Floats aren't `Ord`, so the standard `BinaryHeap` doesn't fit search
/// frontiers directly; this heap orders by `f32::total_cmp` and pops the
/// smallest key first. Duplicate keys and duplicate items are allowed;
/// stale entries are the caller's concern.
#[derive(Debug, Clone)]
pub struct MinQueue<T> {
    heap: Vec<(f32, T)>,
}

impl<T> Default for MinQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MinQueue<T> {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self { heap: Vec::new() }
    }

    /// Creates an empty queue with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
        }
    }

    /// Number of queued entries
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True when nothing is queued
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Removes all entries
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// The entry with the smallest key, without removing it
    pub fn peek(&self) -> Option<(f32, &T)> {
        self.heap.first().map(|(k, v)| (*k, v))
    }

    /// Queues an entry
    pub fn push(&mut self, key: f32, item: T) {
        self.heap.push((key, item));
        self.bubble_up(self.heap.len() - 1);
    }

    /// Removes and returns the entry with the smallest key
    pub fn pop(&mut self) -> Option<(f32, T)> {
        if self.heap.is_empty() {
            return None;
        }

        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let result = self.heap.pop();
        if !self.heap.is_empty() {
            self.trickle_down(0);
        }
        result
    }

    fn bubble_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[i].0.total_cmp(&self.heap[parent].0).is_ge() {
                break;
            }
            self.heap.swap(i, parent);
            i = parent;
        }
    }

    fn trickle_down(&mut self, mut i: usize) {
        loop {
            let child1 = 2 * i + 1;
            if child1 >= self.heap.len() {
                break;
            }

            let child2 = child1 + 1;
            let mut min_child = child1;
            if child2 < self.heap.len()
                && self.heap[child2].0.total_cmp(&self.heap[child1].0).is_lt()
            {
                min_child = child2;
            }

            if self.heap[i].0.total_cmp(&self.heap[min_child].0).is_le() {
                break;
            }
            self.heap.swap(i, min_child);
            i = min_child;
        }
    }
}
