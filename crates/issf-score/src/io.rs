//! JSON configuration and report helpers.

use crate::core::{
    BoundingBox, Calibration, CalibrationStatus, ScoringParams, ShapeFilterParams, ShotRecord,
    ShotStatus,
};
use crate::detect::{PreprocessParams, RegionScore, TargetScorer};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fs, path::Path};

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Image(#[from] ::image::ImageError),
}

fn default_full_image() -> PreprocessParams {
    PreprocessParams::FULL_IMAGE
}

fn default_target() -> PreprocessParams {
    PreprocessParams::TARGET
}

/// Preprocessing settings as written in a config file; absent keys keep the stage default.
#[derive(Deserialize)]
struct PreprocessOverride {
    median_kernel: Option<u32>,
    threshold: Option<u8>,
}

impl PreprocessOverride {
    fn apply(self, base: PreprocessParams) -> PreprocessParams {
        PreprocessParams {
            median_kernel: self.median_kernel.unwrap_or(base.median_kernel),
            threshold: self.threshold.unwrap_or(base.threshold),
        }
    }
}

fn full_image_overrides<'de, D: Deserializer<'de>>(de: D) -> Result<PreprocessParams, D::Error> {
    PreprocessOverride::deserialize(de).map(|o| o.apply(PreprocessParams::FULL_IMAGE))
}

fn target_overrides<'de, D: Deserializer<'de>>(de: D) -> Result<PreprocessParams, D::Error> {
    PreprocessOverride::deserialize(de).map(|o| o.apply(PreprocessParams::TARGET))
}

/// Tunable settings for one scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    #[serde(default = "default_full_image", deserialize_with = "full_image_overrides")]
    pub full_image: PreprocessParams,
    #[serde(default = "default_target", deserialize_with = "target_overrides")]
    pub target: PreprocessParams,
    #[serde(default)]
    pub filters: ShapeFilterParams,
    #[serde(default)]
    pub target_margin_px: u32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            full_image: default_full_image(),
            target: default_target(),
            filters: ShapeFilterParams::default(),
            target_margin_px: 0,
        }
    }
}

impl ScoreConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn scoring_params(&self) -> ScoringParams {
        ScoringParams {
            filters: self.filters,
            target_margin_px: self.target_margin_px,
        }
    }

    pub fn build_scorer(&self) -> TargetScorer {
        TargetScorer::new(self.full_image, self.target, self.scoring_params())
    }
}

/// Machine-readable outcome of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub input_path: String,
    pub face: String,
    #[serde(default)]
    pub target_bounds: Option<BoundingBox>,
    #[serde(default)]
    pub calibration: Option<Calibration>,
    #[serde(default)]
    pub shots: Vec<ShotRecord>,
    #[serde(default)]
    pub degenerate_skipped: usize,
    #[serde(default)]
    pub shot_status: Option<ShotStatus>,
    #[serde(default)]
    pub total_score: f64,
    #[serde(default)]
    pub error: Option<String>,
}

impl ScoreReport {
    /// Empty report for `input_path`, filled in by [`Self::set_region`] or [`Self::set_error`].
    pub fn new(input_path: impl AsRef<Path>, face: &str) -> Self {
        Self {
            input_path: input_path.as_ref().to_string_lossy().into_owned(),
            face: face.to_string(),
            target_bounds: None,
            calibration: None,
            shots: Vec::new(),
            degenerate_skipped: 0,
            shot_status: None,
            total_score: 0.0,
            error: None,
        }
    }

    pub fn set_region(&mut self, scored: &RegionScore) {
        let score = &scored.score;
        self.target_bounds = Some(scored.region.bounds);
        self.calibration = Some(score.calibration);
        self.shots = score.shots.clone();
        self.degenerate_skipped = score.degenerate_skipped;
        self.shot_status = Some(score.shot_status);
        self.total_score = score.total_score();
        self.error = None;
    }

    pub fn set_error(&mut self, err: impl std::fmt::Display) {
        self.error = Some(err.to_string());
    }

    /// `true` when a calibration exists and came from a measured disk.
    pub fn is_calibrated(&self) -> bool {
        self.calibration
            .is_some_and(|c| c.status == CalibrationStatus::Calibrated)
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
