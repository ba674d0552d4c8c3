//! Waypoint paths with arc-length position queries.

use railnav_core::{Point, Vec2};

/// Maps grid positions to world coordinates: `p * cell_size + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projection {
    pub cell_size: f32,
    pub offset: Vec2,
}

impl Projection {
    /// World coordinates equal grid coordinates.
    pub const IDENTITY: Self = Self {
        cell_size: 1.0,
        offset: Vec2::ZERO,
    };

    /// Each grid position maps to the centre of a `size`-wide square cell.
    pub fn cell_centers(size: f32) -> Self {
        Self {
            cell_size: size,
            offset: Vec2::new(size / 2.0, size / 2.0),
        }
    }

    #[inline]
    pub fn project(self, p: Point) -> Vec2 {
        Vec2::from(p) * self.cell_size + self.offset
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// An ordered list of world-space waypoints and the distance travelled along
/// them.
///
/// `offsets[i]` is the arc length from the first waypoint to waypoint `i`.
/// Progress only changes through [`advance`](Path::advance).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    points: Vec<Vec2>,
    offsets: Vec<f32>,
    length: f32,
    progress: f32,
}

impl Path {
    /// Build a path through `points`. Returns `None` when `points` is empty.
    pub fn new(points: Vec<Vec2>) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut offsets = Vec::with_capacity(points.len());
        let mut length = 0.0;
        offsets.push(0.0);
        for w in points.windows(2) {
            length += w[0].distance(w[1]);
            offsets.push(length);
        }
        Some(Self {
            points,
            offsets,
            length,
            progress: 0.0,
        })
    }

    /// Project a grid route into world space.
    pub fn from_route(route: &[Point], projection: Projection) -> Option<Self> {
        Self::new(route.iter().map(|&p| projection.project(p)).collect())
    }

    /// Move `distance` further along the path. Returns whether any of the
    /// path remains.
    pub fn advance(&mut self, distance: f32) -> bool {
        self.progress += distance;
        self.progress < self.length
    }

    /// Go back to the first waypoint.
    pub fn rewind(&mut self) {
        self.progress = 0.0;
    }

    /// World position at the current progress.
    pub fn position(&self) -> Vec2 {
        for (i, w) in self.points.windows(2).enumerate() {
            let (from, to) = (self.offsets[i], self.offsets[i + 1]);
            if self.progress >= to {
                continue;
            }
            let span = to - from;
            if span <= 0.0 {
                return w[0];
            }
            let t = ((self.progress - from) / span).clamp(0.0, 1.0);
            return w[0].lerp(w[1], t);
        }
        self.points.last().copied().unwrap_or_default()
    }

    /// Whether progress has moved beyond waypoint `index`.
    pub fn passed(&self, index: usize) -> bool {
        self.offsets.get(index).is_some_and(|&o| o < self.progress)
    }

    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Arc length from the first waypoint to waypoint `index`.
    pub fn offset(&self, index: usize) -> Option<f32> {
        self.offsets.get(index).copied()
    }

    /// Number of waypoints.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; a path has at least one waypoint.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total arc length.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn remaining(&self) -> f32 {
        (self.length - self.progress).max(0.0)
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    fn ell() -> Path {
        // (0,0) -> (4,0) -> (4,3)
        Path::new(vec![v(0.0, 0.0), v(4.0, 0.0), v(4.0, 3.0)]).unwrap()
    }

    #[test]
    fn empty_is_none() {
        assert!(Path::new(Vec::new()).is_none());
        assert!(Path::from_route(&[], Projection::IDENTITY).is_none());
    }

    #[test]
    fn offsets_accumulate() {
        let path = ell();
        assert_eq!(path.len(), 3);
        assert_eq!(path.length(), 7.0);
        assert_eq!(path.offset(0), Some(0.0));
        assert_eq!(path.offset(1), Some(4.0));
        assert_eq!(path.offset(2), Some(7.0));
        assert_eq!(path.offset(3), None);
    }

    #[test]
    fn position_interpolates() {
        let mut path = ell();
        assert_eq!(path.position(), v(0.0, 0.0));
        assert!(path.advance(2.0));
        assert_eq!(path.position(), v(2.0, 0.0));
        assert!(path.advance(3.0));
        assert_eq!(path.position(), v(4.0, 1.0));
        assert!((path.remaining() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn advance_past_end() {
        let mut path = ell();
        assert!(!path.advance(7.0));
        assert!(path.is_finished());
        assert_eq!(path.position(), v(4.0, 3.0));
        assert!(!path.advance(10.0));
        assert_eq!(path.position(), v(4.0, 3.0));
        assert_eq!(path.remaining(), 0.0);
        path.rewind();
        assert_eq!(path.position(), v(0.0, 0.0));
    }

    #[test]
    fn passed_is_strict() {
        let mut path = ell();
        assert!(!path.passed(0));
        path.advance(4.0);
        assert!(path.passed(0));
        assert!(!path.passed(1));
        path.advance(0.5);
        assert!(path.passed(1));
        assert!(!path.passed(2));
        assert!(!path.passed(9));
    }

    #[test]
    fn single_waypoint() {
        let mut path = Path::new(vec![v(3.0, 3.0)]).unwrap();
        assert_eq!(path.length(), 0.0);
        assert!(path.is_finished());
        assert!(!path.advance(1.0));
        assert_eq!(path.position(), v(3.0, 3.0));
    }

    #[test]
    fn repeated_waypoints_are_skipped() {
        let mut path = Path::new(vec![v(0.0, 0.0), v(0.0, 0.0), v(2.0, 0.0)]).unwrap();
        assert_eq!(path.length(), 2.0);
        assert_eq!(path.position(), v(0.0, 0.0));
        path.advance(1.0);
        assert_eq!(path.position(), v(1.0, 0.0));
    }

    #[test]
    fn projection_maps_to_cell_centres() {
        let proj = Projection::cell_centers(8.0);
        assert_eq!(proj.project(Point::new(0, 0)), v(4.0, 4.0));
        assert_eq!(proj.project(Point::new(2, 1)), v(20.0, 12.0));
        assert_eq!(Projection::default().project(Point::new(2, 1)), v(2.0, 1.0));

        let path = Path::from_route(&[Point::new(0, 0), Point::new(0, 1)], proj).unwrap();
        assert_eq!(path.points(), &[v(4.0, 4.0), v(4.0, 12.0)]);
        assert_eq!(path.length(), 8.0);
    }
}
