use crate::frontier::Frontier;
use crate::grid::Grid;
use crate::space::SearchSpace;

/// Depth-first frontier: a LIFO stack with the same gating as
/// [`BreadthFirst`](crate::BreadthFirst).
///
/// Finds a route whenever one exists, but not necessarily a short one.
#[derive(Debug, Clone, Default)]
pub struct DepthFirst {
    stack: Vec<usize>,
}

impl DepthFirst {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for DepthFirst {
    fn clear(&mut self) {
        self.stack.clear();
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
        self.stack.push(candidate);
        true
    }

    fn dequeue(&mut self, _space: &SearchSpace) -> Option<usize> {
        self.stack.pop()
    }

    /// Top of the stack first.
    fn snapshot(&self) -> Vec<usize> {
        self.stack.iter().rev().copied().collect()
    }

    fn len(&self) -> usize {
        self.stack.len()
    }
}
