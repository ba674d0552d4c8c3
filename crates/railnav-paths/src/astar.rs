use crate::frontier::Frontier;
use crate::grid::Grid;
use crate::space::SearchSpace;

/// How A* treats a neighbour that is already in the open set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Reevaluation {
    /// Re-parent the open node whenever the expanding node's own total cost
    /// is lower than the open node's recorded total, even if the resulting
    /// total is higher than before.
    #[default]
    Literal,
    /// Re-parent only when the total cost through the expanding node is
    /// lower than the open node's recorded total.
    Relax,
}

/// Cost-ordered frontier for A*.
///
/// A node's total cost is `node_cost + heuristic_cost + parent.total_cost`
/// (without the parent term for the start node), saturating at `i32::MAX`.
/// The open set is a plain
/// list scanned linearly on every pop; among equal totals the earliest
/// inserted node wins.
#[derive(Debug, Clone, Default)]
pub struct AStar {
    open: Vec<usize>,
    reevaluation: Reevaluation,
}

impl AStar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reevaluation(reevaluation: Reevaluation) -> Self {
        Self {
            open: Vec::new(),
            reevaluation,
        }
    }

    pub fn reevaluation(&self) -> Reevaluation {
        self.reevaluation
    }
}

impl Frontier for AStar {
    fn clear(&mut self) {
        self.open.clear();
    }

    /// `parent` is the node being expanded. A candidate already in the open
    /// set is never added twice; it may only be re-parented.
    fn enqueue(
        &mut self,
        space: &mut SearchSpace,
        grid: &Grid,
        parent: Option<usize>,
        candidate: usize,
    ) -> bool {
        if !space.admits(grid, candidate) {
            return false;
        }
        let node_cost = grid.cell(candidate).cost;

        if !space.state(candidate).enqueued {
            let heuristic = space.estimate(candidate);
            let inherited = parent.map_or(0, |p| space.state(p).total_cost);
            let s = space.state_mut(candidate);
            s.parent = parent;
            s.heuristic_cost = heuristic;
            s.total_cost = heuristic.saturating_add(node_cost).saturating_add(inherited);
            s.enqueued = true;
            self.open.push(candidate);
            return true;
        }

        let Some(via) = parent else {
            return false;
        };
        let via_total = space.state(via).total_cost;
        let s = space.state_mut(candidate);
        let through_via = s
            .heuristic_cost
            .saturating_add(node_cost)
            .saturating_add(via_total);
        let better = match self.reevaluation {
            Reevaluation::Literal => via_total < s.total_cost,
            Reevaluation::Relax => through_via < s.total_cost,
        };
        if better {
            s.parent = Some(via);
            s.total_cost = through_via;
        }
        false
    }

    fn dequeue(&mut self, space: &SearchSpace) -> Option<usize> {
        // min_by_key keeps the first of several equal minima.
        let (pos, _) = self
            .open
            .iter()
            .enumerate()
            .min_by_key(|&(_, &idx)| space.state(idx).total_cost)?;
        Some(self.open.remove(pos))
    }

    /// Insertion order.
    fn snapshot(&self) -> Vec<usize> {
        self.open.clone()
    }

    fn len(&self) -> usize {
        self.open.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use railnav_core::Point;

    fn setup(end: Point) -> (Grid, SearchSpace) {
        let g = Grid::open(5, 5);
        let mut space = SearchSpace::new(&g);
        space.reset(&g, end);
        (g, space)
    }

    fn idx(g: &Grid, x: i32, y: i32) -> usize {
        g.index(Point::new(x, y)).unwrap()
    }

    #[test]
    fn first_enqueue_computes_costs() {
        let (g, mut space) = setup(Point::new(4, 4));
        g.set_cost(Point::new(1, 0), 2);
        let mut f = AStar::new();
        let start = idx(&g, 0, 0);
        assert!(f.enqueue(&mut space, &g, None, start));
        // Parentless: heuristic + node cost.
        assert_eq!(space.state(start).heuristic_cost, 5);
        assert_eq!(space.state(start).total_cost, 5);

        let n = idx(&g, 1, 0);
        assert!(f.enqueue(&mut space, &g, Some(start), n));
        // floor(sqrt(9 + 16)) + 2 + 5
        assert_eq!(space.state(n).heuristic_cost, 5);
        assert_eq!(space.state(n).total_cost, 12);
        assert_eq!(space.state(n).parent, Some(start));
    }

    #[test]
    fn gating_rejects_blocked_and_visited() {
        let (g, mut space) = setup(Point::new(4, 4));
        g.set_navigable(Point::new(1, 1), false);
        let mut f = AStar::new();
        assert!(!f.enqueue(&mut space, &g, None, idx(&g, 1, 1)));
        space.state_mut(idx(&g, 2, 2)).visited = true;
        assert!(!f.enqueue(&mut space, &g, None, idx(&g, 2, 2)));
        assert!(f.is_empty());
    }

    #[test]
    fn dequeue_lowest_total_first_inserted_on_tie() {
        let (g, mut space) = setup(Point::new(4, 4));
        let mut f = AStar::new();
        let a = idx(&g, 1, 0);
        let b = idx(&g, 0, 1);
        let c = idx(&g, 3, 3);
        f.enqueue(&mut space, &g, None, a);
        f.enqueue(&mut space, &g, None, b);
        f.enqueue(&mut space, &g, None, c);
        assert_eq!(space.state(a).total_cost, space.state(b).total_cost);
        assert_eq!(f.dequeue(&space), Some(c));
        assert_eq!(f.dequeue(&space), Some(a));
        assert_eq!(f.dequeue(&space), Some(b));
        assert_eq!(f.dequeue(&space), None);
    }

    /// The open node's recorded total is compared with the expanding node's
    /// own total, so a re-parent can raise the recorded cost.
    #[test]
    fn literal_reparent_compares_expanding_total() {
        let (g, mut space) = setup(Point::new(4, 4));
        let mut f = AStar::new();
        let open = idx(&g, 3, 1);
        let first = idx(&g, 2, 1);
        let second = idx(&g, 3, 0);
        space.state_mut(first).total_cost = 17;
        space.state_mut(second).total_cost = 18;
        f.enqueue(&mut space, &g, Some(first), open);
        assert_eq!(space.state(open).total_cost, 20);

        assert!(!f.enqueue(&mut space, &g, Some(second), open));
        assert_eq!(space.state(open).parent, Some(second));
        assert_eq!(space.state(open).total_cost, 21);
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn relax_reparents_only_on_cheaper_route() {
        let (g, mut space) = setup(Point::new(4, 4));
        let mut f = AStar::with_reevaluation(Reevaluation::Relax);
        let open = idx(&g, 3, 1);
        let first = idx(&g, 2, 1);
        let second = idx(&g, 3, 0);
        let third = idx(&g, 4, 0);
        space.state_mut(first).total_cost = 17;
        space.state_mut(second).total_cost = 18;
        space.state_mut(third).total_cost = 10;
        f.enqueue(&mut space, &g, Some(first), open);

        f.enqueue(&mut space, &g, Some(second), open);
        assert_eq!(space.state(open).parent, Some(first));
        assert_eq!(space.state(open).total_cost, 20);

        f.enqueue(&mut space, &g, Some(third), open);
        assert_eq!(space.state(open).parent, Some(third));
        assert_eq!(space.state(open).total_cost, 13);
    }

    #[test]
    fn totals_saturate() {
        let (g, mut space) = setup(Point::new(4, 4));
        g.set_cost(Point::new(1, 0), i32::MAX);
        let mut f = AStar::new();
        let parent = idx(&g, 0, 0);
        let open = idx(&g, 1, 0);
        space.state_mut(parent).total_cost = i32::MAX - 1;
        assert!(f.enqueue(&mut space, &g, Some(parent), open));
        assert_eq!(space.state(open).total_cost, i32::MAX);

        // Re-encounter through a cheaper node also saturates.
        let via = idx(&g, 1, 1);
        space.state_mut(via).total_cost = 100;
        f.enqueue(&mut space, &g, Some(via), open);
        assert_eq!(space.state(open).parent, Some(via));
        assert_eq!(space.state(open).total_cost, i32::MAX);
    }

    #[test]
    fn snapshot_in_insertion_order() {
        let (g, mut space) = setup(Point::new(0, 0));
        let mut f = AStar::new();
        for i in [7, 3, 12] {
            f.enqueue(&mut space, &g, None, i);
        }
        assert_eq!(f.snapshot(), vec![7, 3, 12]);
        assert_eq!(f.reevaluation(), Reevaluation::Literal);
    }
}
