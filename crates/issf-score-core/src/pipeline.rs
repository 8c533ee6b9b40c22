//! Shapes in, scored target out.
//!
//! Two stages, each fed by an external contour extractor:
//! 1. [`locate_target`] picks the outer target boundary among the shapes of
//!    the full image and returns the crop rectangle.
//! 2. [`score_region`] classifies the shapes found inside that crop, calibrates
//!    against the black disk and scores every shot.

use serde::{Deserialize, Serialize};

use crate::calibration::{Calibration, CalibrationStatus};
use crate::classify::{ShapeClassifier, ShapeFilterParams};
use crate::error::ScoreError;
use crate::evaluate::{evaluate_shots, ShotRecord};
use crate::geometry::BoundingBox;
use crate::scoring::{format_score, TargetFace};
use crate::shape::DetectedShape;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Classification windows plus the crop margin around the located target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    pub filters: ShapeFilterParams,
    /// Extra pixels kept on each side of the target boundary when cropping.
    pub target_margin_px: u32,
}

/// Whether any shot survived classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotStatus {
    Scored,
    NoShotsDetected,
}

/// Result of scoring one target region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetScore {
    pub calibration: Calibration,
    /// Shots in ascending area order.
    pub shots: Vec<ShotRecord>,
    pub degenerate_skipped: usize,
    pub shot_status: ShotStatus,
}

impl TargetScore {
    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_calibrated()
    }

    /// Sum of the decimal scores.
    pub fn total_score(&self) -> f64 {
        self.shots.iter().map(|s| s.decimal_score).sum()
    }

    /// Human-readable report lines for console or log output.
    pub fn summary_lines(&self) -> Vec<String> {
        let cal = &self.calibration;
        let mut lines = Vec::new();
        match cal.status {
            CalibrationStatus::Calibrated => {
                lines.push(format!(
                    "Black circle center detected at: ({:.2}, {:.2})",
                    cal.center.x, cal.center.y
                ));
                lines.push(format!(
                    "Black circle radius: {:.2}px",
                    cal.black_circle_radius_px
                ));
            }
            CalibrationStatus::NoCalibrationCircle | CalibrationStatus::DegenerateCircle => {
                lines.push(format!(
                    "UNCALIBRATED ({}): scoring from region center ({:.2}, {:.2}); distances are in pixels, not millimeters",
                    status_label(cal.status),
                    cal.center.x,
                    cal.center.y
                ));
            }
        }
        lines.push(format!("Conversion: {:.4} pixels per mm", cal.pixels_per_mm));

        if self.shots.is_empty() {
            lines.push("No shot holes detected. Adjust area range or threshold.".to_string());
        }
        for shot in &self.shots {
            lines.push(shot.describe());
            lines.push(format!(
                "Distance from center: {:.2}px ({:.2}mm)",
                shot.distance_px, shot.distance_mm
            ));
            lines.push(format!("SCORE: {}", shot.score_label()));
        }
        if self.degenerate_skipped > 0 {
            lines.push(format!(
                "Skipped {} degenerate shot shape(s)",
                self.degenerate_skipped
            ));
        }
        if self.shots.len() > 1 {
            lines.push(format!(
                "Total: {} over {} shots",
                format_score(self.total_score()),
                self.shots.len()
            ));
        }
        lines
    }
}

fn status_label(status: CalibrationStatus) -> &'static str {
    match status {
        CalibrationStatus::Calibrated => "calibrated",
        CalibrationStatus::NoCalibrationCircle => "no calibration circle",
        CalibrationStatus::DegenerateCircle => "degenerate calibration circle",
    }
}

/// One-line description of a located target.
pub fn describe_target_bounds(bounds: &BoundingBox) -> String {
    format!(
        "Target detected: {}x{}px at ({}, {})",
        bounds.width, bounds.height, bounds.x, bounds.y
    )
}

/// Crop rectangle of the largest shape, grown by `margin` and clamped to the image.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(shapes), fields(pool = shapes.len())))]
pub fn locate_target(
    shapes: &[DetectedShape],
    margin: u32,
    image_w: u32,
    image_h: u32,
) -> Result<BoundingBox, ScoreError> {
    let target = ShapeClassifier::default().select_target(shapes)?;
    let bounds = target.bounding_box().clamped(margin, image_w, image_h);
    if bounds.is_empty() {
        return Err(ScoreError::EmptyTargetRegion {
            width: image_w,
            height: image_h,
        });
    }
    log::info!("{}", describe_target_bounds(&bounds));
    Ok(bounds)
}

/// Classify, calibrate and score the shapes found in a `region_w x region_h` crop.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(shapes, filters, face), fields(pool = shapes.len()))
)]
pub fn score_region(
    shapes: &[DetectedShape],
    region_w: u32,
    region_h: u32,
    filters: &ShapeFilterParams,
    face: &TargetFace,
) -> TargetScore {
    let classifier = ShapeClassifier::new(*filters);
    let black_circle = classifier.select_black_circle(shapes);
    let calibration = Calibration::from_black_circle(black_circle, region_w, region_h, face);
    if !calibration.is_calibrated() {
        log::warn!(
            "scoring without calibration ({}); scores are not metric",
            status_label(calibration.status)
        );
    }

    let candidates = classifier.select_shot_candidates(shapes);
    let evaluation = evaluate_shots(&candidates, &calibration, face);
    let shot_status = if evaluation.shots.is_empty() {
        log::info!("no shot holes detected");
        ShotStatus::NoShotsDetected
    } else {
        ShotStatus::Scored
    };

    TargetScore {
        calibration,
        shots: evaluation.shots,
        degenerate_skipped: evaluation.degenerate_skipped,
        shot_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ISSF_10M_AIR_RIFLE;
    use crate::shape::test_shapes::{disk, square};
    use approx::assert_relative_eq;
    use nalgebra::Point2;
    use std::f64::consts::PI;

    /// Black disk of radius 170 px at (500, 500): 2 px/mm.
    fn black_circle() -> DetectedShape {
        disk(Point2::new(500.0, 500.0), PI * 170.0 * 170.0)
    }

    fn score(shapes: &[DetectedShape]) -> TargetScore {
        score_region(
            shapes,
            1000,
            1000,
            &ShapeFilterParams::default(),
            &ISSF_10M_AIR_RIFLE,
        )
    }

    #[test]
    fn centered_shot_scores_ten_point_nine() {
        let shapes = vec![black_circle(), disk(Point2::new(500.0, 500.0), 1_200.0)];
        let result = score(&shapes);
        assert!(result.is_calibrated());
        assert_relative_eq!(result.calibration.pixels_per_mm, 2.0, epsilon = 1e-9);
        assert_eq!(result.shots.len(), 1);
        assert_relative_eq!(result.shots[0].decimal_score, 10.9, epsilon = 1e-6);
        assert_eq!(result.shot_status, ShotStatus::Scored);
    }

    #[test]
    fn outer_ring_edge_and_miss() {
        let reference = score(&[black_circle()]);
        let cal = reference.calibration;

        let edge_y = cal.center.y + cal.mm_to_px(115.0 - 1e-9);
        let miss_y = cal.center.y + cal.mm_to_px(115.01);
        let shapes = vec![
            black_circle(),
            square(Point2::new(cal.center.x, edge_y), 1_000.0),
            square(Point2::new(cal.center.x, miss_y), 2_000.0),
        ];
        let result = score(&shapes);
        assert_eq!(result.shots.len(), 2);
        assert_relative_eq!(result.shots[0].decimal_score, 1.0, epsilon = 1e-6);
        assert_eq!(result.shots[1].decimal_score, 0.0);
    }

    #[test]
    fn missing_black_circle_is_flagged_uncalibrated() {
        let shapes = vec![square(Point2::new(510.0, 500.0), 1_600.0)];
        let result = score(&shapes);
        assert!(!result.is_calibrated());
        assert_eq!(
            result.calibration.status,
            CalibrationStatus::NoCalibrationCircle
        );
        assert_eq!(result.calibration.pixels_per_mm, 1.0);
        // region center, 1 px == 1 "mm"
        assert_relative_eq!(result.shots[0].distance_mm, 10.0, epsilon = 1e-9);
        assert!(result.summary_lines()[0].starts_with("UNCALIBRATED"));
    }

    #[test]
    fn empty_region_reports_no_shots() {
        let result = score(&[black_circle()]);
        assert!(result.shots.is_empty());
        assert_eq!(result.shot_status, ShotStatus::NoShotsDetected);
        assert_eq!(result.total_score(), 0.0);
        assert!(result
            .summary_lines()
            .iter()
            .any(|l| l.starts_with("No shot holes detected")));
    }

    #[test]
    fn out_of_window_shapes_are_ignored() {
        let shapes = vec![
            black_circle(),
            square(Point2::new(100.0, 100.0), 50.0),
            square(Point2::new(500.0, 500.0), 600_000.0),
        ];
        let result = score(&shapes);
        assert!(result.is_calibrated());
        assert_relative_eq!(result.calibration.center.x, 500.0, epsilon = 1e-6);
        assert!(result.shots.is_empty());
    }

    #[test]
    fn summary_lists_every_shot() {
        let shapes = vec![
            black_circle(),
            square(Point2::new(540.0, 500.0), 1_600.0),
            square(Point2::new(500.0, 500.0), 2_500.0),
        ];
        let result = score(&shapes);
        let lines = result.summary_lines();
        assert_eq!(lines.iter().filter(|l| l.starts_with("SCORE: ")).count(), 2);
        assert!(lines.contains(&"SCORE: 9.3".to_string()));
        assert!(lines.contains(&"SCORE: 10.9".to_string()));
        assert!(lines.last().expect("total line").starts_with("Total: 20.2"));
    }

    #[test]
    fn locate_target_picks_largest_shape() {
        let shapes = vec![
            square(Point2::new(50.0, 50.0), 400.0),
            DetectedShape::from_points(vec![
                Point2::new(100.0, 80.0),
                Point2::new(899.0, 80.0),
                Point2::new(899.0, 879.0),
                Point2::new(100.0, 879.0),
            ]),
        ];
        let bounds = locate_target(&shapes, 0, 1000, 1000).expect("target");
        assert_eq!(
            bounds,
            BoundingBox {
                x: 100,
                y: 80,
                width: 800,
                height: 800
            }
        );
        assert_eq!(
            describe_target_bounds(&bounds),
            "Target detected: 800x800px at (100, 80)"
        );
    }

    #[test]
    fn locate_target_without_shapes_fails() {
        assert_eq!(
            locate_target(&[], 0, 100, 100).unwrap_err(),
            ScoreError::NoTargetFound
        );
    }

    #[test]
    fn params_round_trip_through_json() {
        let params = ScoringParams {
            target_margin_px: 12,
            ..ScoringParams::default()
        };
        let json = serde_json::to_string(&params).expect("serialize");
        let back: ScoringParams = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, params);
        let defaults: ScoringParams = serde_json::from_str("{}").expect("empty");
        assert_eq!(defaults, ScoringParams::default());
    }
}
