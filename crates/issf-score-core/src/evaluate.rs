//! Per-shot distance and decimal score.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::classify::sort_by_area;
use crate::scoring::{format_score, TargetFace};
use crate::shape::DetectedShape;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// One scored shot hole, in target-region pixel coordinates.
///
/// The scoring position is the enclosing-circle center; the area centroid is
/// kept for comparison overlays only.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub area_px: f64,
    pub centroid: Point2<f64>,
    pub enclosing_center: Point2<f64>,
    pub enclosing_radius: f64,
    pub distance_px: f64,
    pub distance_mm: f64,
    pub decimal_score: f64,
}

impl ShotRecord {
    /// Score rendered with one decimal place, e.g. `"10.4"`.
    pub fn score_label(&self) -> String {
        format_score(self.decimal_score)
    }

    /// Diagnostic line mirroring what gets drawn for this shot.
    pub fn describe(&self) -> String {
        format!(
            "Shot detected: Area={:.2}px², ContourCentroid=({:.2}, {:.2}), EnclosingCircleCenter=({:.2}, {:.2}), Distance from center={:.2}px",
            self.area_px,
            self.centroid.x,
            self.centroid.y,
            self.enclosing_center.x,
            self.enclosing_center.y,
            self.distance_px
        )
    }
}

/// Output of [`evaluate_shots`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShotEvaluation {
    /// Scored shots in ascending area order.
    pub shots: Vec<ShotRecord>,
    /// Candidates skipped because their centroid was undefined.
    pub degenerate_skipped: usize,
}

/// Score a single shot shape; `None` for a degenerate shape.
pub fn evaluate_shot(
    shape: &DetectedShape,
    calibration: &Calibration,
    face: &TargetFace,
) -> Option<ShotRecord> {
    let centroid = shape.centroid()?;
    let circle = shape.enclosing_circle();
    let distance_px = nalgebra::distance(&circle.center, &calibration.center);
    let distance_mm = calibration.px_to_mm(distance_px);
    Some(ShotRecord {
        area_px: shape.area(),
        centroid,
        enclosing_center: circle.center,
        enclosing_radius: circle.radius,
        distance_px,
        distance_mm,
        decimal_score: face.score(distance_mm),
    })
}

/// Score every shot candidate against `calibration`.
///
/// Output is ordered by ascending shape area whatever the input order.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip_all, fields(candidates = shapes.len())))]
pub fn evaluate_shots(
    shapes: &[&DetectedShape],
    calibration: &Calibration,
    face: &TargetFace,
) -> ShotEvaluation {
    let mut ordered = shapes.to_vec();
    sort_by_area(&mut ordered);

    let mut out = ShotEvaluation::default();
    for shape in ordered {
        match evaluate_shot(shape, calibration, face) {
            Some(record) => {
                log::debug!(
                    "shot at ({:.2}, {:.2}): {:.2}mm -> {}",
                    record.enclosing_center.x,
                    record.enclosing_center.y,
                    record.distance_mm,
                    record.score_label()
                );
                out.shots.push(record);
            }
            None => {
                log::warn!("skipping degenerate shot shape (area {:.2})", shape.area());
                out.degenerate_skipped += 1;
            }
        }
    }
    out
}
