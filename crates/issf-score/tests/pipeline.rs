#![cfg(feature = "image")]

mod common;

use approx::assert_abs_diff_eq;
use common::*;
use issf_score::core::{BoundingBox, CalibrationStatus, ScoreError, ShotStatus};
use issf_score::detect::{score_image_from_rgb_u8, DetectError, TargetScorer};
use issf_score::render::{
    render_region, CENTROID_COLOR, CROSSHAIR_COLOR, ENCLOSING_CIRCLE_COLOR,
};

const EXPECTED_BOUNDS: BoundingBox = BoundingBox {
    x: PAPER_ORIGIN,
    y: PAPER_ORIGIN,
    width: PAPER_SIZE,
    height: PAPER_SIZE,
};

#[test]
fn scores_a_shot_inside_the_black_circle() {
    let img = target_with_shot(40);
    let result = TargetScorer::default().score_image(&img).expect("target");

    assert_eq!(result.region.region.bounds, EXPECTED_BOUNDS);
    assert_eq!(result.full_threshold.dimensions(), img.dimensions());
    assert_eq!(
        result.region.threshold.dimensions(),
        (PAPER_SIZE, PAPER_SIZE)
    );

    let score = &result.region.score;
    assert!(score.is_calibrated());
    assert_abs_diff_eq!(score.calibration.pixels_per_mm, 2.0, epsilon = 0.05);
    // disk center in crop coordinates
    assert_abs_diff_eq!(score.calibration.center.x, 400.0, epsilon = 1.0);
    assert_abs_diff_eq!(score.calibration.center.y, 400.0, epsilon = 1.0);

    assert_eq!(score.shot_status, ShotStatus::Scored);
    assert_eq!(score.shots.len(), 1);
    assert_eq!(result.region.shot_outlines.len(), 1);

    let shot = &score.shots[0];
    assert_abs_diff_eq!(shot.distance_px, 40.0, epsilon = 1.5);
    assert_abs_diff_eq!(shot.distance_mm, 20.0, epsilon = 1.0);
    assert_abs_diff_eq!(shot.decimal_score, 9.26, epsilon = 0.1);
}

#[test]
fn centered_shot_is_a_ten() {
    let result = TargetScorer::default()
        .score_image(&target_with_shot(0))
        .expect("target");
    let score = &result.region.score;
    assert_eq!(score.shots.len(), 1);
    assert!(score.shots[0].decimal_score >= 10.8);
    assert_eq!(score.shots[0].score_label().len(), 4);
}

#[test]
fn dark_hole_on_the_paper_scores_in_the_outer_rings() {
    let mut img = blank_target(true);
    add_shot(&mut img, 210, 0);
    let result = TargetScorer::default().score_image(&img).expect("target");
    let score = &result.region.score;
    assert!(score.is_calibrated());
    assert_eq!(score.shots.len(), 1);
    let s = score.shots[0].decimal_score;
    assert!(s > 1.5 && s < 2.0, "score {s}");
}

#[test]
fn shots_are_reported_smallest_first() {
    let mut img = blank_target(true);
    add_shot(&mut img, -60, 0);
    imageproc::drawing::draw_filled_circle_mut(&mut img, (CENTER.0 + 60, CENTER.1), 30, PAPER);
    let result = TargetScorer::default().score_image(&img).expect("target");
    let shots = &result.region.score.shots;
    assert_eq!(shots.len(), 2);
    assert!(shots[0].area_px < shots[1].area_px);
    // the small hole is the left one
    assert!(shots[0].enclosing_center.x < shots[1].enclosing_center.x);
    assert!(result.region.score.summary_lines().iter().any(|l| l.starts_with("Total: ")));
}

#[test]
fn target_without_shots_is_not_an_error() {
    let result = TargetScorer::default()
        .score_image(&blank_target(true))
        .expect("target");
    let score = &result.region.score;
    assert!(score.is_calibrated());
    assert!(score.shots.is_empty());
    assert!(result.region.shot_outlines.is_empty());
    assert_eq!(score.shot_status, ShotStatus::NoShotsDetected);
}

#[test]
fn missing_black_circle_is_flagged() {
    let mut img = blank_target(false);
    imageproc::drawing::draw_filled_circle_mut(&mut img, (CENTER.0 + 40, CENTER.1), SHOT_RADIUS, INK);
    let result = TargetScorer::default().score_image(&img).expect("target");
    let score = &result.region.score;
    assert!(!score.is_calibrated());
    assert_eq!(score.calibration.status, CalibrationStatus::NoCalibrationCircle);
    assert_eq!(score.calibration.pixels_per_mm, 1.0);
    assert_eq!(score.shots.len(), 1);
    // region center, 1 px per "mm"
    assert_abs_diff_eq!(score.shots[0].distance_mm, 40.0, epsilon = 1.5);
    assert!(score.summary_lines()[0].starts_with("UNCALIBRATED"));
}

#[test]
fn dark_photo_has_no_target() {
    let err = TargetScorer::default()
        .score_image(&dark_photo())
        .unwrap_err();
    assert!(matches!(err, DetectError::Score(ScoreError::NoTargetFound)));
}

#[test]
fn raw_buffer_entry_point_matches_image_entry_point() {
    let img = target_with_shot(40);
    let from_raw = score_image_from_rgb_u8(img.width(), img.height(), img.as_raw()).expect("target");
    let from_img = TargetScorer::default().score_image(&img).expect("target");
    assert_eq!(from_raw.region.score, from_img.region.score);
}

#[test]
fn overlay_marks_the_scored_shot() {
    let result = TargetScorer::default()
        .score_image(&target_with_shot(40))
        .expect("target");
    let overlay = render_region(&result.region);
    assert_eq!(overlay.dimensions(), (PAPER_SIZE, PAPER_SIZE));

    let shot = &result.region.score.shots[0];
    // round hole: the centroid marker is drawn last and covers the enclosing center
    let (x, y) = (
        shot.enclosing_center.x.round() as u32,
        shot.enclosing_center.y.round() as u32,
    );
    assert_eq!(*overlay.get_pixel(x, y), CENTROID_COLOR);
    let r = shot.enclosing_radius.round() as u32;
    assert_eq!(*overlay.get_pixel(x + r, y), ENCLOSING_CIRCLE_COLOR);

    let c = result.region.score.calibration.center;
    let (cx, cy) = (c.x.round() as u32, c.y.round() as u32);
    assert!((cy - 1..=cy + 1).any(|row| *overlay.get_pixel(cx - 15, row) == CROSSHAIR_COLOR));
}
