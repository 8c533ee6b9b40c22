//! Synthetic target photos shared by the integration tests.
#![allow(dead_code)]

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;

pub const BACKGROUND: Rgb<u8> = Rgb([50, 50, 50]);
pub const PAPER: Rgb<u8> = Rgb([255, 255, 255]);
pub const INK: Rgb<u8> = Rgb([0, 0, 0]);

/// Paper corner in the photo; the cropped target starts here.
pub const PAPER_ORIGIN: u32 = 100;
pub const PAPER_SIZE: u32 = 800;
/// 85 mm at 2 px/mm.
pub const BLACK_RADIUS: i32 = 170;
pub const SHOT_RADIUS: i32 = 20;

/// Center of the black disk in photo coordinates.
pub const CENTER: (i32, i32) = (500, 500);

/// 1000x1000 photo: gray background, white paper square, optional black disk.
pub fn blank_target(with_black_circle: bool) -> RgbImage {
    let lo = PAPER_ORIGIN;
    let hi = PAPER_ORIGIN + PAPER_SIZE;
    let mut img = RgbImage::from_fn(1000, 1000, |x, y| {
        if (lo..hi).contains(&x) && (lo..hi).contains(&y) {
            PAPER
        } else {
            BACKGROUND
        }
    });
    if with_black_circle {
        draw_filled_circle_mut(&mut img, CENTER, BLACK_RADIUS, INK);
    }
    img
}

/// Standard target with one shot hole `dx` px right of the disk center.
///
/// Holes inside the black disk show the white backing; holes on the paper are dark.
pub fn target_with_shot(dx: i32) -> RgbImage {
    let mut img = blank_target(true);
    add_shot(&mut img, dx, 0);
    img
}

pub fn add_shot(img: &mut RgbImage, dx: i32, dy: i32) {
    let inside = dx * dx + dy * dy < BLACK_RADIUS * BLACK_RADIUS;
    let color = if inside { PAPER } else { INK };
    draw_filled_circle_mut(img, (CENTER.0 + dx, CENTER.1 + dy), SHOT_RADIUS, color);
}

/// Uniformly dark photo with nothing bright enough to be paper.
pub fn dark_photo() -> RgbImage {
    RgbImage::from_pixel(400, 300, Rgb([20, 20, 20]))
}
