use crate::grid::Grid;
use crate::space::SearchSpace;

/// Pending-node container that decides the expansion order of a search.
///
/// Nodes are addressed by their flat grid index. Implementations own the
/// gating and parent bookkeeping rules of their strategy; the engine only
/// pops nodes and offers neighbours.
pub trait Frontier {
    /// Drop every pending node. Called when a search starts.
    fn clear(&mut self);

    /// Offer `candidate`, reached from `parent` (`None` for the start node).
    /// Returns `true` if the candidate was newly added to the frontier.
    fn enqueue(
        &mut self,
        space: &mut SearchSpace,
        grid: &Grid,
        parent: Option<usize>,
        candidate: usize,
    ) -> bool;

    /// Remove and return the next node to expand.
    fn dequeue(&mut self, space: &SearchSpace) -> Option<usize>;

    /// Pending nodes, for inspection.
    fn snapshot(&self) -> Vec<usize>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<F: Frontier + ?Sized> Frontier for Box<F> {
    fn clear(&mut self) {
        (**self).clear()
    }

    fn enqueue(
        &mut self,
        space: &mut SearchSpace,
        grid: &Grid,
        parent: Option<usize>,
        candidate: usize,
    ) -> bool {
        (**self).enqueue(space, grid, parent, candidate)
    }

    fn dequeue(&mut self, space: &SearchSpace) -> Option<usize> {
        (**self).dequeue(space)
    }

    fn snapshot(&self) -> Vec<usize> {
        (**self).snapshot()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}
