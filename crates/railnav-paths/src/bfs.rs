use std::collections::VecDeque;

use crate::frontier::Frontier;
use crate::grid::Grid;
use crate::space::SearchSpace;

/// Breadth-first frontier: a FIFO queue.
///
/// Routes found with it have the fewest possible edges under the configured
/// connectivity.
#[derive(Debug, Clone, Default)]
pub struct BreadthFirst {
    queue: VecDeque<usize>,
}

impl BreadthFirst {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for BreadthFirst {
    fn clear(&mut self) {
        self.queue.clear();
    }

    fn enqueue(
        &mut self,
        space: &mut SearchSpace,
        grid: &Grid,
        parent: Option<usize>,
        candidate: usize,
    ) -> bool {
        if space.state(candidate).enqueued || !space.admits(grid, candidate) {
            return false;
        }
        let s = space.state_mut(candidate);
        s.parent = parent;
        s.enqueued = true;
        self.queue.push_back(candidate);
        true
    }

    fn dequeue(&mut self, _space: &SearchSpace) -> Option<usize> {
        self.queue.pop_front()
    }

    /// Front of the queue first.
    fn snapshot(&self) -> Vec<usize> {
        self.queue.iter().copied().collect()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}
