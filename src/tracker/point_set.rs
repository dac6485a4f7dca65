//! Sparse feature points describing one tracked object.

use nalgebra::Point2;

use crate::tracker::region::Region;

/// Position reported by a point tracker, with its validity flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedPoint {
    pub position: Point2<f32>,
    pub valid: bool,
}

impl TrackedPoint {
    pub fn valid(x: f32, y: f32) -> Self {
        Self {
            position: Point2::new(x, y),
            valid: true,
        }
    }

    pub fn invalid(x: f32, y: f32) -> Self {
        Self {
            position: Point2::new(x, y),
            valid: false,
        }
    }
}

/// Ordered feature points belonging to exactly one object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    points: Vec<Point2<f32>>,
}

impl PointSet {
    pub fn new(points: Vec<Point2<f32>>) -> Self {
        Self { points }
    }

    /// Keep only the points the tracker flagged as valid.
    pub fn from_tracked<I>(tracked: I) -> Self
    where
        I: IntoIterator<Item = TrackedPoint>,
    {
        let points = tracked
            .into_iter()
            .filter(|p| p.valid)
            .map(|p| p.position)
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[Point2<f32>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding region of the points, `None` for an empty set.
    pub fn region(&self) -> Option<Region> {
        Region::bounding(&self.points)
    }
}
