//! Score photographed ISSF 10m air rifle targets.
//!
//! This crate provides:
//! - re-exports of the geometric scoring core (`issf-score-core`)
//! - (feature-gated) the raster front end that filters, thresholds and traces
//!   contours with `image` + `imageproc`, overlay rendering, and JSON
//!   config/report helpers.
//!
//! ## Quickstart
//!
//! ```no_run
//! use issf_score::detect::TargetScorer;
//! use image::ImageReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = ImageReader::open("target.jpg")?.decode()?.to_rgb8();
//! let result = TargetScorer::default().score_image(&img)?;
//! for line in result.region.score.summary_lines() {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `issf_score::core`: calibration, classification, scoring tables.
//! - `issf_score::detect` (feature `image`): photo in, [`TargetScore`] out.
//! - `issf_score::render` (feature `image`): diagnostic overlay.
//! - `issf_score::io` (feature `image`): JSON config and report files.

pub use issf_score_core as core;

pub use issf_score_core::{
    decimal_score, format_score, Calibration, CalibrationStatus, ScoreError, ScoringParams,
    ShapeFilterParams, ShotRecord, ShotStatus, TargetFace, TargetScore, ISSF_10M_AIR_RIFLE,
};

#[cfg(feature = "image")]
pub mod detect;
#[cfg(feature = "image")]
pub mod io;
#[cfg(feature = "image")]
pub mod render;
