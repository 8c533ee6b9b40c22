//! Diagnostic overlay of the scored shots on the cropped target.

use crate::core::TargetScore;
use crate::detect::RegionScore;
use ::image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};
use nalgebra::Point2;

pub const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const ENCLOSING_CIRCLE_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
pub const ENCLOSING_CENTER_COLOR: Rgb<u8> = Rgb([0, 255, 255]);
pub const CENTROID_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const CROSSHAIR_COLOR: Rgb<u8> = Rgb([255, 255, 0]);

const ENCLOSING_CENTER_RADIUS: i32 = 4;
const CENTROID_RADIUS: i32 = 5;
const CROSSHAIR_ARM: f32 = 20.0;
/// Outline, enclosing circle and crosshair are stroked 2 px wide.
const STROKE_OFFSETS: [(f32, f32); 3] = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];

/// Draw every shot of `score` plus the scoring-center crosshair on a copy of `image`.
///
/// `shot_outlines` must be index-aligned with `score.shots`; extra entries on
/// either side are ignored.
pub fn render_shot_overlay(
    image: &RgbImage,
    score: &TargetScore,
    shot_outlines: &[Vec<Point2<f64>>],
) -> RgbImage {
    let mut canvas = image.clone();

    for (shot, outline) in score.shots.iter().zip(shot_outlines) {
        draw_closed_polyline(&mut canvas, outline, OUTLINE_COLOR);
        let radius = shot.enclosing_radius.round() as i32;
        for r in [radius, radius + 1] {
            draw_hollow_circle_mut(
                &mut canvas,
                pixel(shot.enclosing_center),
                r,
                ENCLOSING_CIRCLE_COLOR,
            );
        }
        draw_filled_circle_mut(
            &mut canvas,
            pixel(shot.enclosing_center),
            ENCLOSING_CENTER_RADIUS,
            ENCLOSING_CENTER_COLOR,
        );
        draw_filled_circle_mut(&mut canvas, pixel(shot.centroid), CENTROID_RADIUS, CENTROID_COLOR);
    }

    let c = score.calibration.center;
    let (cx, cy) = (c.x as f32, c.y as f32);
    draw_stroke(
        &mut canvas,
        (cx - CROSSHAIR_ARM, cy),
        (cx + CROSSHAIR_ARM, cy),
        CROSSHAIR_COLOR,
    );
    draw_stroke(
        &mut canvas,
        (cx, cy - CROSSHAIR_ARM),
        (cx, cy + CROSSHAIR_ARM),
        CROSSHAIR_COLOR,
    );

    canvas
}

/// Overlay for a region scored by [`crate::detect::TargetScorer`].
pub fn render_region(region: &RegionScore) -> RgbImage {
    render_shot_overlay(&region.region.image, &region.score, &region.shot_outlines)
}

fn draw_closed_polyline(canvas: &mut RgbImage, points: &[Point2<f64>], color: Rgb<u8>) {
    if points.len() < 2 {
        return;
    }
    let next = points.iter().cycle().skip(1);
    for (a, b) in points.iter().zip(next) {
        draw_stroke(canvas, (a.x as f32, a.y as f32), (b.x as f32, b.y as f32), color);
    }
}

fn draw_stroke(canvas: &mut RgbImage, a: (f32, f32), b: (f32, f32), color: Rgb<u8>) {
    for (dx, dy) in STROKE_OFFSETS {
        draw_line_segment_mut(canvas, (a.0 + dx, a.1 + dy), (b.0 + dx, b.1 + dy), color);
    }
}

#[inline]
fn pixel(p: Point2<f64>) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}
