//! **railnav-core**: geometry shared by the *railnav* crates.
//!
//! Grid positions are integer [`Point`]s inside a half-open [`Range`];
//! waypoints handed to movement code are world-space [`Vec2`]s.

pub mod geom;

pub use geom::{Point, Range, RangeIter, Vec2};
