//! Incremental pathfinding on navigability grids.
//!
//! A [`SearchEngine`] runs one search at a time over a shared [`Grid`] and
//! can be advanced in small slices with [`SearchEngine::update`], so a long
//! search can be spread across many frames without ever blocking one.
//!
//! The expansion order is supplied by a [`Frontier`]:
//!
//! | Frontier | Order | Route |
//! |---|---|---|
//! | [`BreadthFirst`] | FIFO | fewest edges |
//! | [`DepthFirst`] | LIFO | any connected route |
//! | [`AStar`] | lowest total cost | cost-guided, see [`Reevaluation`] |
//!
//! A successful search yields a grid route, which [`Path`] turns into
//! world-space waypoints with arc-length position queries.
//!
//! ```
//! use railnav_core::Point;
//! use railnav_paths::{Budget, Grid, SearchEngine, SearchState};
//!
//! let grid = Grid::from_ascii(
//!     "
//!     ....
//!     .##.
//!     ....
//!     ",
//! )
//! .unwrap();
//! let mut search = SearchEngine::astar(grid);
//! search.start(Point::new(0, 0), Point::new(3, 2)).unwrap();
//! while search.update(Budget::IterationBounded(2)) == SearchState::Running {}
//! assert_eq!(search.state(), SearchState::Succeeded);
//! let mut path = search.path().unwrap();
//! while path.advance(0.25) {}
//! assert_eq!(path.position(), railnav_core::Vec2::new(3.0, 2.0));
//! ```

mod astar;
mod bfs;
mod config;
mod dfs;
mod distance;
mod engine;
mod error;
mod frontier;
mod grid;
mod neighbors;
mod path;
mod space;

pub use astar::{AStar, Reevaluation};
pub use bfs::BreadthFirst;
pub use config::{Budget, Connectivity, Heuristic, Orientation, SearchConfig};
pub use dfs::DepthFirst;
pub use distance::{chebyshev, euclidean, manhattan};
pub use engine::{SearchEngine, SearchState, SearchStats};
pub use error::{ConfigError, GridError};
pub use frontier::Frontier;
pub use grid::{Grid, GridIter, NavCell};
pub use neighbors::Neighbors;
pub use path::{Path, Projection};
pub use space::{Node, NodeState, SearchSpace};
