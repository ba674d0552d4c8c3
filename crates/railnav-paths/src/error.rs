use std::fmt;

use railnav_core::Point;

use crate::config::Heuristic;

/// Errors raised when a search is configured or started with invalid input.
///
/// Exhausting the frontier without reaching the goal is *not* an error; it is
/// reported through [`SearchState::Failed`](crate::SearchState::Failed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The start position is outside the bound grid.
    InvalidStart(Point),
    /// The end position is outside the bound grid.
    InvalidEnd(Point),
    /// Connectivity, orientation, heuristic or budget were changed while the
    /// search was running.
    SearchRunning,
    /// Only the Euclidean heuristic is implemented.
    UnsupportedHeuristic(Heuristic),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStart(p) => write!(f, "start node {p} is not part of the grid"),
            Self::InvalidEnd(p) => write!(f, "end node {p} is not part of the grid"),
            Self::SearchRunning => {
                f.write_str("search configuration can only change while the search is not running")
            }
            Self::UnsupportedHeuristic(h) => write!(
                f,
                "heuristic {h:?} is not supported, only {:?} is available",
                Heuristic::Euclidean
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised while building a [`Grid`](crate::Grid) from row data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// No rows, or rows of zero width.
    Empty,
    /// Row `row` has `found` cells where `expected` were required.
    InconsistentSize {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// An ASCII map contains a character with no cell meaning.
    InvalidRune { ch: char, pos: Point },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("grid: no cells"),
            Self::InconsistentSize {
                row,
                expected,
                found,
            } => write!(
                f,
                "grid: row {row} has {found} cells, expected {expected}"
            ),
            Self::InvalidRune { ch, pos } => {
                write!(f, "grid: invalid rune \u{201c}{ch}\u{201d} at {pos}")
            }
        }
    }
}

impl std::error::Error for GridError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_messages() {
        let e = ConfigError::InvalidStart(Point::new(9, 1));
        assert_eq!(e.to_string(), "start node (9, 1) is not part of the grid");
        let e = ConfigError::UnsupportedHeuristic(Heuristic::Manhattan);
        assert!(e.to_string().contains("Manhattan"));
    }

    #[test]
    fn grid_error_messages() {
        let e = GridError::InconsistentSize {
            row: 2,
            expected: 4,
            found: 3,
        };
        assert_eq!(e.to_string(), "grid: row 2 has 3 cells, expected 4");
        let e = GridError::InvalidRune {
            ch: '?',
            pos: Point::new(1, 0),
        };
        assert!(e.to_string().contains("(1, 0)"));
    }
}
