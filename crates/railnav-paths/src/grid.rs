//! The navigability [`Grid`] searched by the engine.
//!
//! A `Grid` only stores static map data: whether each cell can be traversed,
//! the cost of entering it and an opaque tag. Per-search state lives in the
//! engine's own arena, so any number of searches can read the same grid.
//!
//! Cloning a `Grid` yields another view of the **same** storage, so edits
//! made through one handle (e.g. by a map editor) are seen by every engine
//! holding a clone. Use [`duplicate`](Grid::duplicate) for an independent
//! copy.

use std::cell::RefCell;
use std::rc::Rc;

use railnav_core::{Point, Range};

use crate::config::{Connectivity, Orientation};
use crate::error::GridError;
use crate::neighbors::Neighbors;

/// Static data of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavCell {
    pub navigable: bool,
    /// Cost of entering the cell, added to the accumulated cost by A*.
    pub cost: i32,
    /// Opaque payload, never interpreted by the search.
    pub tag: i32,
}

impl NavCell {
    /// A traversable cell with zero cost.
    pub const OPEN: Self = Self {
        navigable: true,
        cost: 0,
        tag: 0,
    };

    /// An impassable cell.
    pub const BLOCKED: Self = Self {
        navigable: false,
        cost: 0,
        tag: 0,
    };

    pub const fn with_cost(mut self, cost: i32) -> Self {
        self.cost = cost;
        self
    }

    pub const fn with_tag(mut self, tag: i32) -> Self {
        self.tag = tag;
        self
    }
}

// ---------------------------------------------------------------------------
// Internal shared buffer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct GridBuffer {
    cells: Vec<NavCell>,
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A fixed-size 2D array of [`NavCell`]s backed by shared storage.
#[derive(Debug, Clone)]
pub struct Grid {
    buffer: Rc<RefCell<GridBuffer>>,
    bounds: Range,
}

impl Grid {
    /// Create a grid where every cell is impassable.
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, NavCell::BLOCKED)
    }

    /// Create a grid where every cell is navigable with zero cost.
    pub fn open(width: i32, height: i32) -> Self {
        Self::filled(width, height, NavCell::OPEN)
    }

    fn filled(width: i32, height: i32, cell: NavCell) -> Self {
        let bounds = Range::sized(width, height);
        Self {
            buffer: Rc::new(RefCell::new(GridBuffer {
                cells: vec![cell; bounds.len()],
            })),
            bounds,
        }
    }

    /// Build a grid from rows of navigability flags (`rows[y][x]`).
    pub fn from_navigable<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self, GridError> {
        Self::from_rows(rows, |navigable| NavCell {
            navigable,
            ..NavCell::default()
        })
    }

    /// Build a grid from rows of node costs (`rows[y][x]`). A negative cost
    /// marks the cell impassable.
    pub fn from_costs<R: AsRef<[i32]>>(rows: &[R]) -> Result<Self, GridError> {
        Self::from_rows(rows, |cost| {
            if cost < 0 {
                NavCell::BLOCKED
            } else {
                NavCell::OPEN.with_cost(cost)
            }
        })
    }

    /// Build a grid from rows of prepared cells (`rows[y][x]`). The cells are
    /// copied; the grid never refers back to `rows`.
    pub fn from_cells<R: AsRef<[NavCell]>>(rows: &[R]) -> Result<Self, GridError> {
        Self::from_rows(rows, |cell| cell)
    }

    /// Parse an ASCII map: `#` is a wall, `.` a zero-cost floor and a digit
    /// `1`–`9` a floor with that cost. Surrounding whitespace and blank lines
    /// are ignored.
    pub fn from_ascii(map: &str) -> Result<Self, GridError> {
        let mut rows: Vec<Vec<NavCell>> = Vec::new();
        for line in map.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let y = rows.len() as i32;
            let mut row = Vec::with_capacity(line.len());
            for (x, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '#' => NavCell::BLOCKED,
                    '.' => NavCell::OPEN,
                    '1'..='9' => NavCell::OPEN.with_cost(ch as i32 - '0' as i32),
                    _ => {
                        return Err(GridError::InvalidRune {
                            ch,
                            pos: Point::new(x as i32, y),
                        });
                    }
                };
                row.push(cell);
            }
            rows.push(row);
        }
        Self::from_cells(&rows)
    }

    fn from_rows<T: Copy, R: AsRef<[T]>>(
        rows: &[R],
        to_cell: impl Fn(T) -> NavCell,
    ) -> Result<Self, GridError> {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        if width == 0 {
            return Err(GridError::Empty);
        }
        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::InconsistentSize {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            cells.extend(row.iter().copied().map(&to_cell));
        }
        Ok(Self {
            buffer: Rc::new(RefCell::new(GridBuffer { cells })),
            bounds: Range::sized(width as i32, rows.len() as i32),
        })
    }

    /// An independent deep copy of this grid.
    pub fn duplicate(&self) -> Grid {
        let buf = self.buffer.borrow().clone();
        Grid {
            buffer: Rc::new(RefCell::new(buf)),
            bounds: self.bounds,
        }
    }

    /// Whether `self` and `other` are views of the same storage.
    pub fn shares_storage(&self, other: &Grid) -> bool {
        Rc::ptr_eq(&self.buffer, &other.buffer)
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Whether `p` names a cell of this grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// Flat row-major index of `p`, or `None` if `p` is out of bounds.
    #[inline]
    pub fn index(&self, p: Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some(p.y as usize * self.bounds.width() as usize + p.x as usize)
    }

    /// Inverse of [`index`](Grid::index).
    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        let w = self.bounds.width().max(1) as usize;
        Point::new((idx % w) as i32, (idx / w) as i32)
    }

    /// The cell at `p`, or `None` if `p` is out of bounds.
    pub fn at(&self, p: Point) -> Option<NavCell> {
        let i = self.index(p)?;
        Some(self.buffer.borrow().cells[i])
    }

    /// Cell by flat index. Panics if `idx` is out of range.
    pub(crate) fn cell(&self, idx: usize) -> NavCell {
        self.buffer.borrow().cells[idx]
    }

    /// Whether `p` is inside the grid and traversable.
    pub fn navigable(&self, p: Point) -> bool {
        self.at(p).is_some_and(|c| c.navigable)
    }

    /// Replace the cell at `p`. Returns `false` if `p` is out of bounds.
    pub fn set(&self, p: Point, cell: NavCell) -> bool {
        self.update(p, |c| *c = cell)
    }

    pub fn set_navigable(&self, p: Point, navigable: bool) -> bool {
        self.update(p, |c| c.navigable = navigable)
    }

    pub fn set_cost(&self, p: Point, cost: i32) -> bool {
        self.update(p, |c| c.cost = cost)
    }

    pub fn set_tag(&self, p: Point, tag: i32) -> bool {
        self.update(p, |c| c.tag = tag)
    }

    fn update(&self, p: Point, f: impl FnOnce(&mut NavCell)) -> bool {
        let Some(i) = self.index(p) else {
            return false;
        };
        f(&mut self.buffer.borrow_mut().cells[i]);
        true
    }

    /// Fill every cell with `cell`.
    pub fn fill(&self, cell: NavCell) {
        self.buffer.borrow_mut().cells.fill(cell);
    }

    /// In-bounds neighbours of `p`, in the enumeration order given by
    /// `connectivity` and `orientation`. Navigability is not checked.
    pub fn neighbors(
        &self,
        p: Point,
        connectivity: Connectivity,
        orientation: Orientation,
    ) -> Vec<Point> {
        Neighbors::new()
            .of(p, connectivity, orientation, |n| self.contains(n))
            .to_vec()
    }

    /// The navigable cell closest to `p` within `radius` rings (Chebyshev
    /// distance), scanning each ring in row-major order. Returns `p` itself
    /// when it is navigable.
    pub fn nearest_navigable(&self, p: Point, radius: i32) -> Option<Point> {
        if self.navigable(p) {
            return Some(p);
        }
        for r in 1..=radius.max(0) {
            let ring = Range::new(p.x - r, p.y - r, p.x + r + 1, p.y + r + 1);
            let found = ring
                .iter()
                .filter(|q| (q.x - p.x).abs() == r || (q.y - p.y).abs() == r)
                .find(|&q| self.navigable(q));
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// Row-major iterator over `(Point, NavCell)` pairs.
    pub fn iter(&self) -> GridIter<'_> {
        GridIter {
            grid: self,
            inner: self.bounds.iter(),
        }
    }
}

/// Iterator over `(Point, NavCell)` pairs in a [`Grid`].
pub struct GridIter<'a> {
    grid: &'a Grid,
    inner: railnav_core::RangeIter,
}

impl Iterator for GridIter<'_> {
    type Item = (Point, NavCell);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let p = self.inner.next()?;
        Some((p, self.grid.at(p).unwrap_or_default()))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct GridData {
    width: i32,
    height: i32,
    cells: Vec<NavCell>,
}

#[cfg(feature = "serde")]
impl serde::Serialize for Grid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GridData {
            width: self.width(),
            height: self.height(),
            cells: self.buffer.borrow().cells.clone(),
        }
        .serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Grid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = GridData::deserialize(deserializer)?;
        let bounds = Range::sized(data.width, data.height);
        if bounds.len() != data.cells.len() {
            return Err(serde::de::Error::custom(format!(
                "grid: {} cells for a {}x{} grid",
                data.cells.len(),
                data.width,
                data.height
            )));
        }
        Ok(Grid {
            buffer: Rc::new(RefCell::new(GridBuffer { cells: data.cells })),
            bounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(v: &[(i32, i32)]) -> Vec<Point> {
        v.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn new_grid_is_blocked() {
        let g = Grid::new(3, 2);
        assert_eq!(g.len(), 6);
        assert!(g.iter().all(|(_, c)| !c.navigable));
        assert!(Grid::open(3, 2).iter().all(|(_, c)| c.navigable));
    }

    #[test]
    fn from_navigable_rows() {
        let g = Grid::from_navigable(&[[true, false, true], [false, true, true]]).unwrap();
        assert_eq!(g.width(), 3);
        assert_eq!(g.height(), 2);
        assert!(g.navigable(Point::new(0, 0)));
        assert!(!g.navigable(Point::new(1, 0)));
        assert!(!g.navigable(Point::new(0, 1)));
        assert!(!g.navigable(Point::new(3, 0)));
    }

    #[test]
    fn from_costs_negative_is_wall() {
        let g = Grid::from_costs(&[vec![1, -1], vec![0, 7]]).unwrap();
        assert_eq!(g.at(Point::new(0, 0)), Some(NavCell::OPEN.with_cost(1)));
        assert!(!g.navigable(Point::new(1, 0)));
        assert_eq!(g.at(Point::new(1, 1)).map(|c| c.cost), Some(7));
    }

    #[test]
    fn inconsistent_rows_rejected() {
        let err = Grid::from_navigable(&[vec![true, true], vec![true]]).unwrap_err();
        assert_eq!(
            err,
            GridError::InconsistentSize {
                row: 1,
                expected: 2,
                found: 1
            }
        );
        let empty: [Vec<bool>; 0] = [];
        assert_eq!(Grid::from_navigable(&empty).unwrap_err(), GridError::Empty);
    }

    #[test]
    fn from_ascii_map() {
        let g = Grid::from_ascii(
            "
            #.3
            ..#
            ",
        )
        .unwrap();
        assert_eq!(g.bounds(), Range::sized(3, 2));
        assert!(!g.navigable(Point::new(0, 0)));
        assert_eq!(g.at(Point::new(2, 0)).map(|c| c.cost), Some(3));
        let err = Grid::from_ascii("..\n.x").unwrap_err();
        assert_eq!(
            err,
            GridError::InvalidRune {
                ch: 'x',
                pos: Point::new(1, 1)
            }
        );
    }

    #[test]
    fn from_cells_copies() {
        let mut rows = vec![vec![NavCell::OPEN.with_tag(4); 2]; 2];
        let g = Grid::from_cells(&rows).unwrap();
        rows[0][0] = NavCell::BLOCKED;
        assert_eq!(g.at(Point::new(0, 0)), Some(NavCell::OPEN.with_tag(4)));
    }

    #[test]
    fn clone_shares_duplicate_does_not() {
        let g = Grid::open(4, 4);
        let view = g.clone();
        let copy = g.duplicate();
        g.set_navigable(Point::new(1, 1), false);
        assert!(!view.navigable(Point::new(1, 1)));
        assert!(copy.navigable(Point::new(1, 1)));
        assert!(g.shares_storage(&view));
        assert!(!g.shares_storage(&copy));
    }

    #[test]
    fn setters_ignore_out_of_bounds() {
        let g = Grid::open(2, 2);
        assert!(!g.set_cost(Point::new(2, 0), 5));
        assert!(g.set_cost(Point::new(1, 0), 5));
        assert!(g.set_tag(Point::new(1, 0), 9));
        assert_eq!(g.at(Point::new(1, 0)), Some(NavCell::OPEN.with_cost(5).with_tag(9)));
        g.fill(NavCell::BLOCKED);
        assert!(g.iter().all(|(_, c)| c == NavCell::BLOCKED));
    }

    #[test]
    fn index_round_trip() {
        let g = Grid::open(5, 3);
        for p in g.bounds() {
            let i = g.index(p).unwrap();
            assert_eq!(g.point(i), p);
        }
        assert_eq!(g.index(Point::new(-1, 0)), None);
        assert_eq!(g.index(Point::new(4, 2)), Some(14));
    }

    #[test]
    fn four_way_orders() {
        let g = Grid::open(3, 3);
        let c = Point::new(1, 1);
        assert_eq!(
            g.neighbors(c, Connectivity::FourWay, Orientation::Clockwise),
            pts(&[(1, 0), (2, 1), (1, 2), (0, 1)])
        );
        assert_eq!(
            g.neighbors(c, Connectivity::FourWay, Orientation::Counterclockwise),
            pts(&[(1, 0), (0, 1), (1, 2), (2, 1)])
        );
    }

    #[test]
    fn eight_way_orders() {
        let g = Grid::open(3, 3);
        let c = Point::new(1, 1);
        assert_eq!(
            g.neighbors(c, Connectivity::EightWay, Orientation::Clockwise),
            pts(&[
                (1, 0),
                (2, 1),
                (1, 2),
                (0, 1),
                (2, 0),
                (2, 2),
                (0, 2),
                (0, 0)
            ])
        );
        assert_eq!(
            g.neighbors(c, Connectivity::EightWay, Orientation::Counterclockwise),
            pts(&[
                (1, 0),
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 2),
                (2, 2),
                (2, 1),
                (2, 0)
            ])
        );
    }

    #[test]
    fn corner_neighbors_stay_in_bounds() {
        let g = Grid::open(3, 3);
        assert_eq!(
            g.neighbors(Point::new(0, 0), Connectivity::FourWay, Orientation::Clockwise),
            pts(&[(1, 0), (0, 1)])
        );
        assert_eq!(
            g.neighbors(
                Point::new(2, 2),
                Connectivity::EightWay,
                Orientation::Counterclockwise
            ),
            pts(&[(2, 1), (1, 1), (1, 2)])
        );
    }

    #[test]
    fn neighbors_ignore_navigability() {
        let g = Grid::new(2, 2);
        let n = g.neighbors(Point::new(0, 0), Connectivity::EightWay, Orientation::Clockwise);
        assert_eq!(n.len(), 3);
    }

    #[test]
    fn nearest_navigable_scans_rings() {
        let g = Grid::new(7, 7);
        assert_eq!(g.nearest_navigable(Point::new(3, 3), 3), None);
        g.set_navigable(Point::new(5, 3), true);
        g.set_navigable(Point::new(1, 1), true);
        // (1, 1) is on ring 2 before (5, 3) in row-major order.
        assert_eq!(g.nearest_navigable(Point::new(3, 3), 3), Some(Point::new(1, 1)));
        assert_eq!(g.nearest_navigable(Point::new(3, 3), 1), None);
        g.set_navigable(Point::new(3, 4), true);
        assert_eq!(g.nearest_navigable(Point::new(3, 3), 3), Some(Point::new(3, 4)));
        assert_eq!(g.nearest_navigable(Point::new(5, 3), 3), Some(Point::new(5, 3)));
    }
}
