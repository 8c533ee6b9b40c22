//! Contour measurements: polygon moments, area, bounding box and the
//! minimum enclosing circle.
//!
//! Contours are closed polygons in pixel coordinates, the last vertex
//! implicitly connected to the first.

use nalgebra::Point2;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Seed of the shuffle applied before the incremental enclosing-circle search.
const ENCLOSING_CIRCLE_SEED: u64 = 0x5eed_c1c1e;

/// Relative slack used when testing whether a point lies inside a circle.
const CONTAINS_EPS: f64 = 1e-9;

/// Zeroth and first order area moments of a closed polygon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    /// Compute polygon moments with Green's theorem.
    ///
    /// The result does not depend on the traversal direction: a clockwise
    /// contour yields the same (positive) moments as its counter-clockwise twin.
    pub fn from_polygon(points: &[Point2<f64>]) -> Self {
        let n = points.len();
        if n < 3 {
            return Self::default();
        }

        let mut m00 = 0.0;
        let mut m10 = 0.0;
        let mut m01 = 0.0;
        let mut prev = points[n - 1];
        for &p in points {
            let cross = prev.x * p.y - p.x * prev.y;
            m00 += cross;
            m10 += cross * (prev.x + p.x);
            m01 += cross * (prev.y + p.y);
            prev = p;
        }

        let mut moments = Self {
            m00: m00 / 2.0,
            m10: m10 / 6.0,
            m01: m01 / 6.0,
        };
        if moments.m00 < 0.0 {
            moments.m00 = -moments.m00;
            moments.m10 = -moments.m10;
            moments.m01 = -moments.m01;
        }
        moments
    }

    /// Area-weighted center `(m10 / m00, m01 / m00)`, undefined when `m00 == 0`.
    pub fn centroid(&self) -> Option<Point2<f64>> {
        if self.m00 == 0.0 {
            return None;
        }
        Some(Point2::new(self.m10 / self.m00, self.m01 / self.m00))
    }
}

/// Unsigned polygon area in pixels².
pub fn contour_area(points: &[Point2<f64>]) -> f64 {
    Moments::from_polygon(points).m00
}

/// Axis-aligned rectangle on the pixel grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Tight box around pixel-grid points; both end pixels are counted.
    pub fn from_points(points: &[Point2<f64>]) -> Self {
        if points.is_empty() {
            return Self::default();
        }
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let x0 = min_x.floor().max(0.0);
        let y0 = min_y.floor().max(0.0);
        let x1 = max_x.floor().max(x0);
        let y1 = max_y.floor().max(y0);
        Self {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32 + 1,
            height: (y1 - y0) as u32 + 1,
        }
    }

    /// Grow by `margin` on every side, then clamp to a `image_w x image_h` image.
    pub fn clamped(&self, margin: u32, image_w: u32, image_h: u32) -> Self {
        let x = self.x.saturating_sub(margin).min(image_w);
        let y = self.y.saturating_sub(margin).min(image_h);
        let width = self
            .width
            .saturating_add(margin.saturating_mul(2))
            .min(image_w - x);
        let height = self
            .height
            .saturating_add(margin.saturating_mul(2))
            .min(image_h - y);
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Circle in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2<f64>,
    pub radius: f64,
}

impl Circle {
    fn from_point(p: Point2<f64>) -> Self {
        Self {
            center: p,
            radius: 0.0,
        }
    }

    fn from_diameter(a: Point2<f64>, b: Point2<f64>) -> Self {
        let center = nalgebra::center(&a, &b);
        Self {
            center,
            radius: nalgebra::distance(&center, &a),
        }
    }

    /// Circumcircle of three points; collinear triples fall back to the
    /// circle spanned by their farthest pair.
    fn from_three(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Self {
        let bx = b.x - a.x;
        let by = b.y - a.y;
        let cx = c.x - a.x;
        let cy = c.y - a.y;
        let d = 2.0 * (bx * cy - by * cx);
        if d.abs() < 1e-12 {
            let candidates = [
                Self::from_diameter(a, b),
                Self::from_diameter(a, c),
                Self::from_diameter(b, c),
            ];
            return candidates
                .into_iter()
                .fold(Self::from_point(a), |best, circle| {
                    if circle.radius > best.radius {
                        circle
                    } else {
                        best
                    }
                });
        }
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (cy * b2 - by * c2) / d;
        let uy = (bx * c2 - cx * b2) / d;
        let center = Point2::new(a.x + ux, a.y + uy);
        Self {
            center,
            radius: (ux * ux + uy * uy).sqrt(),
        }
    }

    pub fn contains(&self, p: Point2<f64>) -> bool {
        nalgebra::distance(&self.center, &p) <= self.radius + CONTAINS_EPS * self.radius.max(1.0)
    }
}

/// Smallest circle containing every point (Welzl's incremental algorithm).
///
/// Points are visited in a seeded shuffled order, so the expected running time
/// is linear and identical input always yields the identical circle.
pub fn min_enclosing_circle(points: &[Point2<f64>]) -> Circle {
    if points.is_empty() {
        return Circle::from_point(Point2::origin());
    }

    let mut pts = points.to_vec();
    let mut rng = StdRng::seed_from_u64(ENCLOSING_CIRCLE_SEED);
    pts.shuffle(&mut rng);

    let mut circle = Circle::from_point(pts[0]);
    for i in 1..pts.len() {
        if circle.contains(pts[i]) {
            continue;
        }
        circle = Circle::from_point(pts[i]);
        for j in 0..i {
            if circle.contains(pts[j]) {
                continue;
            }
            circle = Circle::from_diameter(pts[i], pts[j]);
            for k in 0..j {
                if !circle.contains(pts[k]) {
                    circle = Circle::from_three(pts[i], pts[j], pts[k]);
                }
            }
        }
    }
    circle
}
