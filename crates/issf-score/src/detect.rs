//! Raster front end: filtering, thresholding and contour extraction with
//! `image` + `imageproc`, feeding the geometric core.

use crate::core::{
    self, BoundingBox, DetectedShape, ScoreError, ScoringParams, TargetFace, TargetScore,
    ISSF_10M_AIR_RIFLE,
};
use ::image::{imageops, GrayImage, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::filter::median_filter;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the raster pipeline.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("invalid RGB image buffer length (expected {expected} bytes, got {got})")]
    InvalidRgbBuffer { expected: usize, got: usize },

    #[error("invalid RGB image dimensions (width={width}, height={height})")]
    InvalidRgbDimensions { width: u32, height: u32 },

    #[error(transparent)]
    Score(#[from] ScoreError),
}

/// Median blur + binary threshold settings for one stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessParams {
    /// Median kernel side in pixels; even sizes round up to the next odd one,
    /// `0` and `1` disable the blur.
    pub median_kernel: u32,
    /// Pixels strictly brighter than this become foreground (255).
    pub threshold: u8,
}

impl PreprocessParams {
    /// Full photo: light denoise, keep only the bright paper.
    pub const FULL_IMAGE: Self = Self {
        median_kernel: 3,
        threshold: 200,
    };

    /// Cropped target: heavy denoise so the print pattern melts into the
    /// black disk, mid-gray cutoff.
    pub const TARGET: Self = Self {
        median_kernel: 15,
        threshold: 100,
    };

    fn median_radius(&self) -> u32 {
        self.median_kernel / 2
    }
}

/// Which contour borders [`extract_shapes`] keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContourMode {
    /// Outermost outer borders only.
    External,
    /// Every border, outer and hole.
    All,
}

/// The cropped target and where it sits in the source photo.
#[derive(Clone, Debug)]
pub struct TargetRegion {
    pub image: RgbImage,
    pub bounds: BoundingBox,
}

/// Everything produced while scoring one target region.
#[derive(Clone, Debug)]
pub struct RegionScore {
    pub region: TargetRegion,
    /// Binary image the region shapes were extracted from.
    pub threshold: GrayImage,
    /// Outlines of the scored shots, index-aligned with `score.shots`.
    pub shot_outlines: Vec<Vec<Point2<f64>>>,
    pub score: TargetScore,
}

/// Full run over one photo.
#[derive(Clone, Debug)]
pub struct ImageScore {
    /// Binary image used to locate the target.
    pub full_threshold: GrayImage,
    pub region: RegionScore,
}

/// Median blur (colour), grayscale, binary threshold.
pub fn threshold_full_image(img: &RgbImage, params: &PreprocessParams) -> GrayImage {
    let blurred = match params.median_radius() {
        0 => img.clone(),
        r => median_filter(img, r, r),
    };
    let gray = imageops::grayscale(&blurred);
    threshold(&gray, params.threshold, ThresholdType::Binary)
}

/// Grayscale, median blur, binary threshold.
pub fn threshold_target(img: &RgbImage, params: &PreprocessParams) -> GrayImage {
    let gray = imageops::grayscale(img);
    let blurred = match params.median_radius() {
        0 => gray,
        r => median_filter(&gray, r, r),
    };
    threshold(&blurred, params.threshold, ThresholdType::Binary)
}

/// Trace the borders of the non-zero regions of `binary`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(binary), fields(width = binary.width(), height = binary.height()))
)]
pub fn extract_shapes(binary: &GrayImage, mode: ContourMode) -> Vec<DetectedShape> {
    let shapes: Vec<DetectedShape> = find_contours::<i32>(binary)
        .into_iter()
        .filter(|c| match mode {
            ContourMode::External => matches!(c.border_type, BorderType::Outer) && c.parent.is_none(),
            ContourMode::All => true,
        })
        .map(|c| {
            DetectedShape::from_points(
                c.points
                    .iter()
                    .map(|p| Point2::new(p.x as f64, p.y as f64))
                    .collect(),
            )
        })
        .collect();
    log::debug!("{} contours ({:?})", shapes.len(), mode);
    shapes
}

/// End-to-end scorer: photo in, scored target out.
#[derive(Clone, Debug)]
pub struct TargetScorer {
    pub full_image: PreprocessParams,
    pub target: PreprocessParams,
    pub params: ScoringParams,
    face: &'static TargetFace,
}

impl Default for TargetScorer {
    fn default() -> Self {
        Self::new(
            PreprocessParams::FULL_IMAGE,
            PreprocessParams::TARGET,
            ScoringParams::default(),
        )
    }
}

impl TargetScorer {
    pub fn new(
        full_image: PreprocessParams,
        target: PreprocessParams,
        params: ScoringParams,
    ) -> Self {
        Self {
            full_image,
            target,
            params,
            face: &ISSF_10M_AIR_RIFLE,
        }
    }

    /// Score against another ring table.
    pub fn with_face(mut self, face: &'static TargetFace) -> Self {
        self.face = face;
        self
    }

    pub fn face(&self) -> &'static TargetFace {
        self.face
    }

    /// Locate and crop the target in a full photo.
    ///
    /// `full_threshold` is the output of [`threshold_full_image`].
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(width = img.width(), height = img.height()))
    )]
    pub fn locate_target(
        &self,
        img: &RgbImage,
        full_threshold: &GrayImage,
    ) -> Result<TargetRegion, DetectError> {
        let shapes = extract_shapes(full_threshold, ContourMode::External);
        let bounds = core::locate_target(
            &shapes,
            self.params.target_margin_px,
            img.width(),
            img.height(),
        )?;
        let image = imageops::crop_imm(img, bounds.x, bounds.y, bounds.width, bounds.height)
            .to_image();
        Ok(TargetRegion { image, bounds })
    }

    /// Calibrate and score the shots inside a cropped target.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(width = region.image.width(), height = region.image.height()))
    )]
    pub fn score_region(&self, region: TargetRegion) -> RegionScore {
        let binary = threshold_target(&region.image, &self.target);
        let shapes = extract_shapes(&binary, ContourMode::All);
        let score = core::score_region(
            &shapes,
            region.image.width(),
            region.image.height(),
            &self.params.filters,
            self.face,
        );

        // Same selection and order as `score.shots`: ascending area, degenerate shapes dropped.
        let shot_outlines: Vec<Vec<Point2<f64>>> = core::ShapeClassifier::new(self.params.filters)
            .select_shot_candidates(&shapes)
            .into_iter()
            .filter(|s| s.centroid().is_some())
            .map(|s| s.points().to_vec())
            .collect();
        debug_assert_eq!(shot_outlines.len(), score.shots.len());

        RegionScore {
            region,
            threshold: binary,
            shot_outlines,
            score,
        }
    }

    /// Run both stages on a photo. Fails only when no target is found.
    pub fn score_image(&self, img: &RgbImage) -> Result<ImageScore, DetectError> {
        let full_threshold = threshold_full_image(img, &self.full_image);
        let region = self.locate_target(img, &full_threshold)?;
        Ok(ImageScore {
            full_threshold,
            region: self.score_region(region),
        })
    }
}

/// Build an `image::RgbImage` from a raw interleaved RGB buffer.
pub fn rgb_image_from_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<RgbImage, DetectError> {
    let w = usize::try_from(width).ok();
    let h = usize::try_from(height).ok();
    let Some((w, h)) = w.zip(h) else {
        return Err(DetectError::InvalidRgbDimensions { width, height });
    };
    let Some(expected) = w.checked_mul(h).and_then(|n| n.checked_mul(3)) else {
        return Err(DetectError::InvalidRgbDimensions { width, height });
    };
    if pixels.len() != expected {
        return Err(DetectError::InvalidRgbBuffer {
            expected,
            got: pixels.len(),
        });
    }
    RgbImage::from_raw(width, height, pixels.to_vec())
        .ok_or(DetectError::InvalidRgbDimensions { width, height })
}

/// Score a photo given as a raw interleaved RGB buffer with default settings.
pub fn score_image_from_rgb_u8(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<ImageScore, DetectError> {
    let img = rgb_image_from_slice(width, height, pixels)?;
    TargetScorer::default().score_image(&img)
}
