//! Search configuration: neighbourhood shape, enumeration order, heuristic
//! and the per-update work budget.

use std::time::Duration;

use crate::error::ConfigError;

/// Which cells count as neighbours of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Connectivity {
    /// Up, right, down, left.
    #[default]
    FourWay,
    /// The four cardinal cells plus the four diagonals.
    EightWay,
}

/// The rotational order in which neighbours are enumerated.
///
/// Orientation never changes *which* cells are neighbours, only the order in
/// which they are offered to the frontier, and therefore tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Clockwise,
    Counterclockwise,
}

/// Distance estimate used by A*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heuristic {
    /// Not implemented; selecting it is rejected.
    Manhattan,
    /// Straight-line distance, truncated to an integer.
    #[default]
    Euclidean,
}

impl Heuristic {
    /// Fails unless this heuristic is implemented.
    pub fn check(self) -> Result<Self, ConfigError> {
        match self {
            Heuristic::Euclidean => Ok(self),
            other => Err(ConfigError::UnsupportedHeuristic(other)),
        }
    }
}

/// How much work a single [`update`](crate::SearchEngine::update) may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Budget {
    /// Run to a terminal state inside one call.
    #[default]
    Unbounded,
    /// Stop after the first expansion that brings the call's wall-clock time
    /// to at least this duration. At least one expansion always happens.
    TimeBounded(Duration),
    /// Stop after this many expansions.
    IterationBounded(u32),
}

impl Budget {
    /// Convenience constructor for a millisecond time budget.
    pub fn millis(ms: u64) -> Self {
        Budget::TimeBounded(Duration::from_millis(ms))
    }
}

/// Complete configuration of a [`SearchEngine`](crate::SearchEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    pub connectivity: Connectivity,
    pub orientation: Orientation,
    pub heuristic: Heuristic,
    /// Budget used by [`tick`](crate::SearchEngine::tick).
    pub budget: Budget,
}

impl SearchConfig {
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    /// Set the heuristic, failing immediately if it is unsupported.
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Result<Self, ConfigError> {
        self.heuristic = heuristic.check()?;
        Ok(self)
    }
}
