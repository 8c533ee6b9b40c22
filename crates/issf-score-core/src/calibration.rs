//! Pixel-to-millimeter calibration from the black aiming disk.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::scoring::TargetFace;
use crate::shape::DetectedShape;

/// Whether the scale and center come from a measured disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationStatus {
    Calibrated,
    /// No shape fell inside the black-circle area window.
    NoCalibrationCircle,
    /// The selected disk had a zero zeroth moment.
    DegenerateCircle,
}

/// Scoring center and scale of one target region.
///
/// Uncalibrated results use the region center and `1.0` px/mm; distances and
/// scores derived from them are not metrically meaningful.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Scoring center in target-region pixels.
    pub center: Point2<f64>,
    pub pixels_per_mm: f64,
    /// Area-equivalent radius of the black disk (0 when uncalibrated).
    pub black_circle_radius_px: f64,
    pub status: CalibrationStatus,
}

impl Calibration {
    /// Fallback used when no usable disk was found.
    pub fn uncalibrated(region_w: u32, region_h: u32, status: CalibrationStatus) -> Self {
        Self {
            center: Point2::new(region_w as f64 / 2.0, region_h as f64 / 2.0),
            pixels_per_mm: 1.0,
            black_circle_radius_px: 0.0,
            status,
        }
    }

    /// Calibrate against the black disk of `face`.
    ///
    /// The center is the disk's area centroid and the radius is the
    /// area-equivalent `sqrt(area / pi)`; neither uses the enclosing circle.
    pub fn from_black_circle(
        shape: Option<&DetectedShape>,
        region_w: u32,
        region_h: u32,
        face: &TargetFace,
    ) -> Self {
        let Some(shape) = shape else {
            return Self::uncalibrated(region_w, region_h, CalibrationStatus::NoCalibrationCircle);
        };
        let Some(center) = shape.centroid() else {
            log::warn!("black circle has a zero area moment; using the region center");
            return Self::uncalibrated(region_w, region_h, CalibrationStatus::DegenerateCircle);
        };

        let radius_px = (shape.area() / std::f64::consts::PI).sqrt();
        let pixels_per_mm = radius_px / face.black_circle_radius_mm;
        log::debug!(
            "black circle at ({:.2}, {:.2}), radius {:.2}px, {:.4} px/mm",
            center.x,
            center.y,
            radius_px,
            pixels_per_mm
        );
        Self {
            center,
            pixels_per_mm,
            black_circle_radius_px: radius_px,
            status: CalibrationStatus::Calibrated,
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.status == CalibrationStatus::Calibrated
    }

    #[inline]
    pub fn px_to_mm(&self, distance_px: f64) -> f64 {
        distance_px / self.pixels_per_mm
    }

    #[inline]
    pub fn mm_to_px(&self, distance_mm: f64) -> f64 {
        distance_mm * self.pixels_per_mm
    }
}
