//! Per-search node state, kept apart from the [`Grid`] it describes.

use railnav_core::Point;

use crate::distance::euclidean;
use crate::grid::Grid;

/// Search bookkeeping for one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeState {
    pub visited: bool,
    /// Accepted by the frontier at some point during this search.
    pub enqueued: bool,
    /// Flat index of the node this one was reached from.
    pub parent: Option<usize>,
    pub heuristic_cost: i32,
    pub total_cost: i32,
}

/// Read-only snapshot of a node: its static cell data merged with its state
/// in the current search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub pos: Point,
    pub navigable: bool,
    pub visited: bool,
    pub enqueued: bool,
    pub parent: Option<Point>,
    pub node_cost: i32,
    pub heuristic_cost: i32,
    pub total_cost: i32,
    pub tag: i32,
}

/// Arena of [`NodeState`]s indexed by `y * width + x`.
///
/// Each engine owns one, so the parent links form a tree over flat indices
/// and never refer into another search.
#[derive(Debug, Clone)]
pub struct SearchSpace {
    states: Vec<NodeState>,
    width: usize,
    end: Point,
    current: Option<usize>,
}

impl SearchSpace {
    /// An arena sized for `grid`, with every node in its initial state.
    pub fn new(grid: &Grid) -> Self {
        Self {
            states: vec![NodeState::default(); grid.len()],
            width: grid.width().max(1) as usize,
            end: Point::ZERO,
            current: None,
        }
    }

    /// Return every node to its initial state and retarget the arena.
    pub(crate) fn reset(&mut self, grid: &Grid, end: Point) {
        self.states.clear();
        self.states.resize(grid.len(), NodeState::default());
        self.width = grid.width().max(1) as usize;
        self.end = end;
        self.current = None;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[inline]
    pub fn state(&self, idx: usize) -> &NodeState {
        &self.states[idx]
    }

    #[inline]
    pub fn state_mut(&mut self, idx: usize) -> &mut NodeState {
        &mut self.states[idx]
    }

    /// Grid position of a flat index.
    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        Point::new((idx % self.width) as i32, (idx / self.width) as i32)
    }

    /// Goal of the current search.
    #[inline]
    pub fn end(&self) -> Point {
        self.end
    }

    /// The node currently being expanded.
    #[inline]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub(crate) fn set_current(&mut self, idx: usize) {
        self.current = Some(idx);
    }

    /// Truncated Euclidean distance from `idx` to the goal, the only
    /// heuristic [`Heuristic::check`](crate::Heuristic::check) accepts.
    pub fn estimate(&self, idx: usize) -> i32 {
        euclidean(self.point(idx), self.end)
    }

    /// The gate shared by every frontier: the cell must be traversable and
    /// not yet expanded.
    pub fn admits(&self, grid: &Grid, idx: usize) -> bool {
        grid.cell(idx).navigable && !self.states[idx].visited
    }

    /// Number of nodes expanded so far.
    pub fn visited_count(&self) -> usize {
        self.states.iter().filter(|s| s.visited).count()
    }

    /// Walk parent links from `idx` back to the root and return the
    /// positions in root-to-`idx` order.
    pub fn route_to(&self, idx: usize) -> Vec<Point> {
        let mut route = Vec::new();
        let mut cur = Some(idx);
        while let Some(i) = cur {
            route.push(self.point(i));
            if route.len() > self.states.len() {
                // A parent cycle; only a misbehaving frontier can cause this.
                log::warn!("parent links from {} do not reach a root", self.point(idx));
                break;
            }
            cur = self.states[i].parent;
        }
        route.reverse();
        route
    }

    /// Merge the static cell data at `idx` with its search state.
    pub(crate) fn node(&self, grid: &Grid, idx: usize) -> Node {
        let cell = grid.cell(idx);
        let s = self.states[idx];
        Node {
            pos: self.point(idx),
            navigable: cell.navigable,
            visited: s.visited,
            enqueued: s.enqueued,
            parent: s.parent.map(|p| self.point(p)),
            node_cost: cell.cost,
            heuristic_cost: s.heuristic_cost,
            total_cost: s.total_cost,
            tag: cell.tag,
        }
    }
}
