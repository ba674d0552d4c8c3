use railnav_core::Point;

use crate::config::{Connectivity, Orientation};

const UP: Point = Point::new(0, -1);
const RIGHT: Point = Point::new(1, 0);
const DOWN: Point = Point::new(0, 1);
const LEFT: Point = Point::new(-1, 0);
const UP_RIGHT: Point = Point::new(1, -1);
const DOWN_RIGHT: Point = Point::new(1, 1);
const DOWN_LEFT: Point = Point::new(-1, 1);
const UP_LEFT: Point = Point::new(-1, -1);

const FOUR_CW: [Point; 4] = [UP, RIGHT, DOWN, LEFT];
const FOUR_CCW: [Point; 4] = [UP, LEFT, DOWN, RIGHT];
// Clockwise visits the cardinals first, then the diagonals.
const EIGHT_CW: [Point; 8] = [UP, RIGHT, DOWN, LEFT, UP_RIGHT, DOWN_RIGHT, DOWN_LEFT, UP_LEFT];
// Counterclockwise sweeps around the node in a single turn.
const EIGHT_CCW: [Point; 8] = [UP, UP_LEFT, LEFT, DOWN_LEFT, DOWN, DOWN_RIGHT, RIGHT, UP_RIGHT];

/// Cached neighbor computation helper.
///
/// Enumerates the 4- or 8-neighbourhood of a grid point in a fixed rotational
/// order, keeping only the points accepted by a predicate (typically a bounds
/// check).
#[derive(Debug, Clone)]
pub struct Neighbors {
    buf: Vec<Point>,
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbors {
    /// Create a new `Neighbors` helper.
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(8),
        }
    }

    /// Offsets for the given neighbourhood, in enumeration order.
    pub fn directions(connectivity: Connectivity, orientation: Orientation) -> &'static [Point] {
        match (connectivity, orientation) {
            (Connectivity::FourWay, Orientation::Clockwise) => &FOUR_CW,
            (Connectivity::FourWay, Orientation::Counterclockwise) => &FOUR_CCW,
            (Connectivity::EightWay, Orientation::Clockwise) => &EIGHT_CW,
            (Connectivity::EightWay, Orientation::Counterclockwise) => &EIGHT_CCW,
        }
    }

    /// Return the neighbors of `p`, in enumeration order, for which `keep`
    /// returns `true`.
    pub fn of(
        &mut self,
        p: Point,
        connectivity: Connectivity,
        orientation: Orientation,
        keep: impl Fn(Point) -> bool,
    ) -> &[Point] {
        self.buf.clear();
        for &d in Self::directions(connectivity, orientation) {
            let n = p + d;
            if keep(n) {
                self.buf.push(n);
            }
        }
        &self.buf
    }
}
