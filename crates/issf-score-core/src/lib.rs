//! Calibration and decimal scoring for ISSF 10m air rifle targets.
//!
//! This crate is purely geometric: it consumes contours (closed pixel
//! polygons) produced by any vision front end and knows nothing about image
//! formats or filtering.
//!
//! ## Pipeline
//! 1. [`locate_target`] picks the outer target boundary (largest shape) and
//!    returns the crop rectangle.
//! 2. [`score_region`] runs on the shapes found inside the crop:
//!    - [`ShapeClassifier`] selects the black aiming disk and the shot holes
//!      by area window ([`ShapeFilterParams`]);
//!    - [`Calibration`] turns the disk into a scoring center (area centroid)
//!      and a px/mm scale (area-equivalent radius over the 85 mm disk radius);
//!    - [`evaluate_shots`] measures each hole from its minimum enclosing
//!      circle center and maps the distance through the [`TargetFace`] table.
//!
//! A missing disk is not an error: the result is flagged uncalibrated
//! ([`CalibrationStatus`]) and scored from the region center at 1 px/mm.
//!
//! ## Quickstart
//!
//! ```
//! use issf_score_core::{decimal_score, format_score};
//!
//! assert_eq!(decimal_score(0.0), 10.9);
//! assert_eq!(format_score(decimal_score(17.25)), "9.5");
//! assert_eq!(decimal_score(115.5), 0.0);
//! ```

mod calibration;
mod classify;
mod error;
mod evaluate;
mod geometry;
mod logger;
mod pipeline;
mod scoring;
mod shape;

pub use calibration::{Calibration, CalibrationStatus};
pub use classify::{AreaRange, ShapeClassifier, ShapeFilterParams};
pub use error::ScoreError;
pub use evaluate::{evaluate_shot, evaluate_shots, ShotEvaluation, ShotRecord};
pub use geometry::{contour_area, min_enclosing_circle, BoundingBox, Circle, Moments};
pub use pipeline::{
    describe_target_bounds, locate_target, score_region, ScoringParams, ShotStatus, TargetScore,
};
pub use scoring::{
    decimal_score, format_score, ScoringZone, TargetFace, ZoneRule, ISSF_10M_AIR_RIFLE,
};
pub use shape::DetectedShape;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_for};
