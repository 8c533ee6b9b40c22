//! Area-based shape classification.
//!
//! The thresholds are resolution dependent (paper size, print resolution and
//! photo resolution all move them), so they live in [`ShapeFilterParams`].

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ScoreError;
use crate::shape::DetectedShape;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Closed area interval in pixels².
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AreaRange {
    pub min: f64,
    pub max: f64,
}

impl AreaRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, area: f64) -> bool {
        area >= self.min && area <= self.max
    }
}

/// One side of an [`AreaRange`] given in a config file; the other keeps its default.
#[derive(Deserialize)]
struct AreaRangeOverride {
    min: Option<f64>,
    max: Option<f64>,
}

impl AreaRangeOverride {
    fn apply(self, base: AreaRange) -> AreaRange {
        AreaRange {
            min: self.min.unwrap_or(base.min),
            max: self.max.unwrap_or(base.max),
        }
    }
}

fn black_circle_window<'de, D: Deserializer<'de>>(de: D) -> Result<AreaRange, D::Error> {
    AreaRangeOverride::deserialize(de).map(|o| o.apply(ShapeFilterParams::BLACK_CIRCLE_AREA))
}

fn shot_window<'de, D: Deserializer<'de>>(de: D) -> Result<AreaRange, D::Error> {
    AreaRangeOverride::deserialize(de).map(|o| o.apply(ShapeFilterParams::SHOT_AREA))
}

/// Area windows used to pick the calibration disk and the shot holes.
///
/// Deserialization is partial at every level: a missing window or a missing
/// bound falls back to the defaults below.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeFilterParams {
    #[serde(deserialize_with = "black_circle_window")]
    pub black_circle_area: AreaRange,
    #[serde(deserialize_with = "shot_window")]
    pub shot_area: AreaRange,
}

impl ShapeFilterParams {
    pub const BLACK_CIRCLE_AREA: AreaRange = AreaRange::new(20_000.0, 500_000.0);
    pub const SHOT_AREA: AreaRange = AreaRange::new(900.0, 10_000.0);
}

impl Default for ShapeFilterParams {
    fn default() -> Self {
        Self {
            black_circle_area: Self::BLACK_CIRCLE_AREA,
            shot_area: Self::SHOT_AREA,
        }
    }
}

/// Picks the target, the black disk and the shot candidates from a shape pool.
#[derive(Clone, Debug, Default)]
pub struct ShapeClassifier {
    params: ShapeFilterParams,
}

impl ShapeClassifier {
    pub fn new(params: ShapeFilterParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ShapeFilterParams {
        &self.params
    }

    /// Largest shape of the full image; the first one wins a tie.
    pub fn select_target<'a>(
        &self,
        shapes: &'a [DetectedShape],
    ) -> Result<&'a DetectedShape, ScoreError> {
        largest(shapes.iter()).ok_or(ScoreError::NoTargetFound)
    }

    /// Largest shape inside the black-circle area window.
    ///
    /// `None` means no calibration disk was found; callers fall back to an
    /// uncalibrated center.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(pool = shapes.len())))]
    pub fn select_black_circle<'a>(
        &self,
        shapes: &'a [DetectedShape],
    ) -> Option<&'a DetectedShape> {
        let range = self.params.black_circle_area;
        let circle = largest(shapes.iter().filter(|s| range.contains(s.area())));
        if circle.is_none() {
            log::warn!(
                "no calibration circle with area in [{}, {}] among {} shapes",
                range.min,
                range.max,
                shapes.len()
            );
        }
        circle
    }

    /// Shapes inside the shot area window, ordered by ascending area.
    ///
    /// An empty result is the normal "no shots on target" case.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(pool = shapes.len())))]
    pub fn select_shot_candidates<'a>(&self, shapes: &'a [DetectedShape]) -> Vec<&'a DetectedShape> {
        let range = self.params.shot_area;
        let mut shots: Vec<&DetectedShape> =
            shapes.iter().filter(|s| range.contains(s.area())).collect();
        sort_by_area(&mut shots);
        log::debug!("{} shot candidates out of {} shapes", shots.len(), shapes.len());
        shots
    }
}

/// Stable ascending sort by area; equal areas keep their detection order.
pub(crate) fn sort_by_area(shapes: &mut [&DetectedShape]) {
    shapes.sort_by(|a, b| a.area().total_cmp(&b.area()));
}

fn largest<'a>(shapes: impl Iterator<Item = &'a DetectedShape>) -> Option<&'a DetectedShape> {
    shapes.fold(None, |best: Option<&DetectedShape>, s| match best {
        Some(b) if b.area() >= s.area() => Some(b),
        _ => Some(s),
    })
}
