use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::geometry::{min_enclosing_circle, BoundingBox, Circle, Moments};

/// A closed contour together with the measurements the scoring core needs.
///
/// Measurements are taken once in [`DetectedShape::from_points`]; the shape is
/// immutable afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectedShape {
    points: Vec<Point2<f64>>,
    moments: Moments,
    bounding_box: BoundingBox,
    enclosing_circle: Circle,
}

impl DetectedShape {
    pub fn from_points(points: Vec<Point2<f64>>) -> Self {
        let moments = Moments::from_polygon(&points);
        let bounding_box = BoundingBox::from_points(&points);
        let enclosing_circle = min_enclosing_circle(&points);
        Self {
            points,
            moments,
            bounding_box,
            enclosing_circle,
        }
    }

    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    /// Polygon area in pixels².
    pub fn area(&self) -> f64 {
        self.moments.m00
    }

    pub fn moments(&self) -> Moments {
        self.moments
    }

    /// Area centroid; `None` when the zeroth moment vanishes.
    pub fn centroid(&self) -> Option<Point2<f64>> {
        self.moments.centroid()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    pub fn enclosing_circle(&self) -> Circle {
        self.enclosing_circle
    }
}

#[cfg(test)]
pub(crate) mod test_shapes {
    use super::*;

    /// Regular polygon approximating a disk of the given area.
    pub(crate) fn disk(center: Point2<f64>, area: f64) -> DetectedShape {
        const SIDES: usize = 720;
        let step = std::f64::consts::TAU / SIDES as f64;
        // polygon area = n/2 * r^2 * sin(2pi/n)
        let radius = (2.0 * area / (SIDES as f64 * step.sin())).sqrt();
        let points = (0..SIDES)
            .map(|k| {
                let (s, c) = (k as f64 * step).sin_cos();
                Point2::new(center.x + radius * c, center.y + radius * s)
            })
            .collect();
        DetectedShape::from_points(points)
    }

    /// Axis-aligned square of the given area centered at `center`.
    pub(crate) fn square(center: Point2<f64>, area: f64) -> DetectedShape {
        let h = area.sqrt() / 2.0;
        DetectedShape::from_points(vec![
            Point2::new(center.x - h, center.y - h),
            Point2::new(center.x + h, center.y - h),
            Point2::new(center.x + h, center.y + h),
            Point2::new(center.x - h, center.y + h),
        ])
    }
}
