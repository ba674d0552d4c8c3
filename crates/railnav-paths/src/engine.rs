//! The incremental [`SearchEngine`] state machine.
//!
//! ```text
//! NotStarted --start()--> Running <--pause()/resume()--> Paused
//!                            |
//!                            +--goal visited------> Succeeded
//!                            +--frontier empty----> Failed
//! ```
//!
//! All work happens inside [`update`](SearchEngine::update). Each call picks
//! up exactly where the previous one stopped, so a long search can be spread
//! over many application ticks.

use std::fmt;
use std::time::{Duration, Instant};

use railnav_core::Point;

use crate::astar::AStar;
use crate::bfs::BreadthFirst;
use crate::config::{Budget, Connectivity, Heuristic, Orientation, SearchConfig};
use crate::dfs::DepthFirst;
use crate::error::ConfigError;
use crate::frontier::Frontier;
use crate::grid::Grid;
use crate::neighbors::Neighbors;
use crate::path::{Path, Projection};
use crate::space::{Node, SearchSpace};

/// Lifecycle of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchState {
    #[default]
    NotStarted,
    Running,
    Paused,
    /// The goal was reached; a route is available.
    Succeeded,
    /// The frontier ran dry without reaching the goal.
    Failed,
}

impl SearchState {
    /// `Succeeded` or `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, SearchState::Succeeded | SearchState::Failed)
    }
}

/// Work accounting since the last [`start`](SearchEngine::start).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// `update` calls made while the search was running.
    pub update_calls: u32,
    /// Expansions over the whole search.
    pub total_iterations: u64,
    pub total_time: Duration,
    /// Expansions performed by the most recent `update`.
    pub last_iterations: u32,
    pub last_elapsed: Duration,
}

type PointHook = Box<dyn FnMut(Point)>;
type FinishHook = Box<dyn FnMut(bool)>;

#[derive(Default)]
struct Observers {
    enqueued: Vec<PointHook>,
    visited: Vec<PointHook>,
    finished: Vec<FinishHook>,
}

impl Observers {
    fn node_enqueued(&mut self, p: Point) {
        for hook in &mut self.enqueued {
            hook(p);
        }
    }

    fn node_visited(&mut self, p: Point) {
        for hook in &mut self.visited {
            hook(p);
        }
    }

    fn search_finished(&mut self, found: bool) {
        for hook in &mut self.finished {
            hook(found);
        }
    }
}

/// A resumable grid search driven by a [`Frontier`] strategy.
///
/// The engine holds a shared view of its [`Grid`] and keeps all per-search
/// node state in its own arena, so several engines may search one grid.
pub struct SearchEngine<F: Frontier> {
    grid: Grid,
    frontier: F,
    space: SearchSpace,
    config: SearchConfig,
    state: SearchState,
    start: Option<Point>,
    end: Option<Point>,
    route: Option<Vec<Point>>,
    stats: SearchStats,
    observers: Observers,
    nbuf: Neighbors,
}

impl SearchEngine<BreadthFirst> {
    /// Breadth-first search over `grid`.
    pub fn breadth_first(grid: Grid) -> Self {
        Self::new(grid, BreadthFirst::new())
    }
}

impl SearchEngine<DepthFirst> {
    /// Depth-first search over `grid`.
    pub fn depth_first(grid: Grid) -> Self {
        Self::new(grid, DepthFirst::new())
    }
}

impl SearchEngine<AStar> {
    /// A* search over `grid` with the default re-evaluation rule.
    pub fn astar(grid: Grid) -> Self {
        Self::new(grid, AStar::new())
    }
}

impl<F: Frontier> SearchEngine<F> {
    /// Bind `frontier` to `grid` with the default configuration.
    pub fn new(grid: Grid, frontier: F) -> Self {
        let space = SearchSpace::new(&grid);
        Self {
            grid,
            frontier,
            space,
            config: SearchConfig::default(),
            state: SearchState::NotStarted,
            start: None,
            end: None,
            route: None,
            stats: SearchStats::default(),
            observers: Observers::default(),
            nbuf: Neighbors::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Replace the whole configuration. Fails while the search is running or
    /// if the heuristic is unsupported.
    pub fn configure(&mut self, config: SearchConfig) -> Result<(), ConfigError> {
        config.heuristic.check()?;
        self.ensure_not_running()?;
        log::debug!("search reconfigured: {config:?}");
        self.config = config;
        Ok(())
    }

    pub fn set_connectivity(&mut self, connectivity: Connectivity) -> Result<(), ConfigError> {
        self.ensure_not_running()?;
        self.config.connectivity = connectivity;
        Ok(())
    }

    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<(), ConfigError> {
        self.ensure_not_running()?;
        self.config.orientation = orientation;
        Ok(())
    }

    /// Unsupported heuristics are rejected in every state.
    pub fn set_heuristic(&mut self, heuristic: Heuristic) -> Result<(), ConfigError> {
        heuristic.check()?;
        self.ensure_not_running()?;
        self.config.heuristic = heuristic;
        Ok(())
    }

    /// Budget used by [`tick`](Self::tick).
    pub fn set_budget(&mut self, budget: Budget) -> Result<(), ConfigError> {
        self.ensure_not_running()?;
        self.config.budget = budget;
        Ok(())
    }

    fn ensure_not_running(&self) -> Result<(), ConfigError> {
        if self.state == SearchState::Running {
            return Err(ConfigError::SearchRunning);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    /// Called with each node newly accepted by the frontier.
    pub fn on_node_enqueued(&mut self, hook: impl FnMut(Point) + 'static) {
        self.observers.enqueued.push(Box::new(hook));
    }

    /// Called with each node as it is expanded.
    pub fn on_node_visited(&mut self, hook: impl FnMut(Point) + 'static) {
        self.observers.visited.push(Box::new(hook));
    }

    /// Called once per search when it succeeds (`true`) or fails (`false`).
    pub fn on_search_finished(&mut self, hook: impl FnMut(bool) + 'static) {
        self.observers.finished.push(Box::new(hook));
    }

    pub fn clear_observers(&mut self) {
        self.observers = Observers::default();
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Begin a new search from `start` to `end`.
    ///
    /// Both positions must lie inside the grid; otherwise nothing is changed.
    /// Every node is returned to its initial state and the start node is
    /// offered to the frontier. When `start == end` the search succeeds
    /// immediately with a single-node route.
    pub fn start(&mut self, start: Point, end: Point) -> Result<(), ConfigError> {
        let Some(start_idx) = self.grid.index(start) else {
            return Err(ConfigError::InvalidStart(start));
        };
        if !self.grid.contains(end) {
            return Err(ConfigError::InvalidEnd(end));
        }

        self.frontier.clear();
        self.space.reset(&self.grid, end);
        self.route = None;
        self.stats = SearchStats::default();
        self.start = Some(start);
        self.end = Some(end);
        log::debug!("search {start} -> {end} started ({:?})", self.config);

        if start == end {
            self.route = Some(vec![start]);
            self.finish(true);
            return Ok(());
        }

        if self
            .frontier
            .enqueue(&mut self.space, &self.grid, None, start_idx)
        {
            self.observers.node_enqueued(start);
        }
        self.state = SearchState::Running;
        Ok(())
    }

    /// Advance the search using the configured budget.
    pub fn tick(&mut self) -> SearchState {
        self.update(self.config.budget)
    }

    /// Expand nodes until the search ends or `budget` is spent, and return
    /// the resulting state. Does nothing unless the search is running.
    pub fn update(&mut self, budget: Budget) -> SearchState {
        if self.state != SearchState::Running {
            return self.state;
        }

        let began = Instant::now();
        let mut iterations: u32 = 0;
        match budget {
            Budget::Unbounded => {
                while self.state == SearchState::Running {
                    self.step();
                    iterations += 1;
                }
            }
            Budget::IterationBounded(limit) => {
                while iterations < limit && self.state == SearchState::Running {
                    self.step();
                    iterations += 1;
                }
            }
            Budget::TimeBounded(limit) => loop {
                self.step();
                iterations += 1;
                if self.state != SearchState::Running || began.elapsed() >= limit {
                    break;
                }
            },
        }
        let elapsed = began.elapsed();

        self.stats.update_calls += 1;
        self.stats.last_iterations = iterations;
        self.stats.last_elapsed = elapsed;
        self.stats.total_iterations += u64::from(iterations);
        self.stats.total_time += elapsed;
        log::trace!(
            "update #{}: {} expansions in {:?}, {} pending, state {:?}",
            self.stats.update_calls,
            iterations,
            elapsed,
            self.frontier.len(),
            self.state
        );
        self.state
    }

    /// Suspend a running search. No-op in any other state.
    pub fn pause(&mut self) {
        if self.state == SearchState::Running {
            log::debug!("search paused");
            self.state = SearchState::Paused;
        }
    }

    /// Resume a paused search. No-op in any other state.
    pub fn resume(&mut self) {
        if self.state == SearchState::Paused {
            log::debug!("search resumed");
            self.state = SearchState::Running;
        }
    }

    /// Abandon the search. Node state is left as is until the next
    /// [`start`](Self::start) or [`reset`](Self::reset).
    pub fn stop(&mut self) {
        if self.state != SearchState::NotStarted {
            log::debug!("search stopped in state {:?}", self.state);
        }
        self.state = SearchState::NotStarted;
        self.frontier.clear();
        self.route = None;
    }

    /// Abandon the search and return every node to its initial state.
    pub fn reset(&mut self) {
        self.stop();
        let end = self.end.unwrap_or_default();
        self.space.reset(&self.grid, end);
        self.stats = SearchStats::default();
    }

    // -----------------------------------------------------------------------
    // Expansion
    // -----------------------------------------------------------------------

    fn step(&mut self) {
        match self.frontier.dequeue(&self.space) {
            Some(idx) => self.visit(idx),
            None => self.finish(false),
        }
    }

    fn visit(&mut self, idx: usize) {
        self.space.set_current(idx);
        if self.space.state(idx).visited {
            return;
        }
        self.space.state_mut(idx).visited = true;
        let p = self.space.point(idx);
        self.observers.node_visited(p);

        if Some(p) == self.end {
            self.route = Some(self.space.route_to(idx));
            self.finish(true);
            return;
        }

        let mut nbuf = std::mem::take(&mut self.nbuf);
        let grid = &self.grid;
        let neighbors = nbuf.of(
            p,
            self.config.connectivity,
            self.config.orientation,
            |q| grid.contains(q),
        );
        for &n in neighbors {
            let Some(ni) = self.grid.index(n) else {
                continue;
            };
            if self
                .frontier
                .enqueue(&mut self.space, &self.grid, Some(idx), ni)
            {
                self.observers.node_enqueued(n);
            }
        }
        self.nbuf = nbuf;
    }

    fn finish(&mut self, found: bool) {
        self.state = if found {
            SearchState::Succeeded
        } else {
            SearchState::Failed
        };
        if found {
            log::debug!("search reached {}", self.end.unwrap_or_default());
        } else {
            log::debug!("search failed: frontier exhausted");
        }
        self.observers.search_finished(found);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[inline]
    pub fn state(&self) -> SearchState {
        self.state
    }

    #[inline]
    pub fn config(&self) -> SearchConfig {
        self.config
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn frontier(&self) -> &F {
        &self.frontier
    }

    #[inline]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn start_point(&self) -> Option<Point> {
        self.start
    }

    pub fn end_point(&self) -> Option<Point> {
        self.end
    }

    /// The node most recently taken from the frontier.
    pub fn current(&self) -> Option<Point> {
        self.space.current().map(|i| self.space.point(i))
    }

    /// Grid positions from start to end, once the search has succeeded.
    pub fn route(&self) -> Option<&[Point]> {
        self.route.as_deref()
    }

    /// The route as a [`Path`] in grid coordinates.
    pub fn path(&self) -> Option<Path> {
        self.path_with(Projection::IDENTITY)
    }

    /// The route as a [`Path`] mapped to world space by `projection`.
    pub fn path_with(&self, projection: Projection) -> Option<Path> {
        Path::from_route(self.route.as_deref()?, projection)
    }

    /// Static and search state of the node at `p`.
    pub fn node(&self, p: Point) -> Option<Node> {
        let idx = self.grid.index(p)?;
        Some(self.space.node(&self.grid, idx))
    }

    /// Positions currently waiting in the frontier, in the frontier's own
    /// order.
    pub fn snapshot(&self) -> Vec<Point> {
        self.frontier
            .snapshot()
            .into_iter()
            .map(|i| self.space.point(i))
            .collect()
    }

    /// Number of nodes expanded in the current search.
    pub fn visited_count(&self) -> usize {
        self.space.visited_count()
    }
}

impl<F: Frontier + fmt::Debug> fmt::Debug for SearchEngine<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchEngine")
            .field("frontier", &self.frontier)
            .field("config", &self.config)
            .field("state", &self.state)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
