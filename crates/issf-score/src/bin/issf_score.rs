//! issf-score CLI: score a photographed ISSF 10m air rifle target.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use image::{GrayImage, RgbImage};
use issf_score::core::{describe_target_bounds, level_for};
use issf_score::detect::{threshold_full_image, TargetScorer};
use issf_score::io::{IoError, ScoreConfig, ScoreReport};
use issf_score::render::render_region;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "issf-score")]
#[command(about = "Locate, calibrate and score a photographed ISSF 10m air rifle target")]
#[command(version)]
struct Cli {
    /// Photo of the target.
    #[arg(default_value = "input.jpg")]
    input: PathBuf,

    /// Directory receiving the diagnostic images.
    #[arg(default_value = "export")]
    output_dir: PathBuf,

    /// File name of the full-image threshold written into `output_dir`.
    #[arg(default_value = "output.png")]
    output_file_name: String,

    /// JSON file overriding filter, threshold and classification settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON report of the run to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Debug logging.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("input file not found: {}", .0.display())]
    InputMissing(PathBuf),
    #[error("failed to load config {}: {source}", .path.display())]
    Config { path: PathBuf, source: IoError },
    #[error("could not load image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: IoError },
    #[error("no target contours detected. Adjust threshold value.")]
    NoTarget,
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::InputMissing(_) | CliError::Config { .. } => 1,
            CliError::Decode { .. } => 2,
            CliError::Write { .. } => 3,
            CliError::NoTarget => 4,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(level_for(cli.verbose, cli.quiet));

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: LevelFilter) {
    let _ = issf_score::core::init_with_level(level);
}

#[cfg(feature = "tracing")]
fn init_logging(level: LevelFilter) {
    issf_score::core::init_tracing(false, level);
}

fn run(cli: &Cli) -> Result<(), CliError> {
    if !cli.input.exists() {
        return Err(CliError::InputMissing(cli.input.clone()));
    }

    let config = match &cli.config {
        Some(path) => ScoreConfig::load_json(path).map_err(|source| CliError::Config {
            path: path.clone(),
            source,
        })?,
        None => ScoreConfig::default(),
    };
    let scorer = config.build_scorer();

    let img = image::open(&cli.input)
        .map_err(|source| CliError::Decode {
            path: cli.input.clone(),
            source,
        })?
        .to_rgb8();
    log::info!(
        "loaded {} ({}x{})",
        cli.input.display(),
        img.width(),
        img.height()
    );

    std::fs::create_dir_all(&cli.output_dir).map_err(|e| CliError::Write {
        path: cli.output_dir.clone(),
        source: e.into(),
    })?;

    let mut report = ScoreReport::new(&cli.input, scorer.face().name);
    let outcome = score_photo(cli, &scorer, &img, &mut report);
    if let Err(err) = &outcome {
        report.set_error(err);
    }
    if let Some(path) = &cli.report {
        report.write_json(path).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;
        log::info!("report written to {}", path.display());
    }
    outcome
}

fn score_photo(
    cli: &Cli,
    scorer: &TargetScorer,
    img: &RgbImage,
    report: &mut ScoreReport,
) -> Result<(), CliError> {
    let full_threshold = threshold_full_image(img, &scorer.full_image);
    let output_path = cli.output_dir.join(&cli.output_file_name);

    let region = match scorer.locate_target(img, &full_threshold) {
        Ok(region) => region,
        Err(err) => {
            log::warn!("{err}");
            save_gray(&full_threshold, &output_path)?;
            return Err(CliError::NoTarget);
        }
    };
    println!("{}", describe_target_bounds(&region.bounds));
    let cropped_path = cli.output_dir.join("cropped_target.png");
    save_rgb(&region.image, &cropped_path)?;
    println!("Cropped target saved to: {}", cropped_path.display());

    let scored = scorer.score_region(region);
    save_gray(&scored.threshold, &cli.output_dir.join("threshold_cropped.png"))?;

    for line in scored.score.summary_lines() {
        println!("{line}");
    }
    if !scored.score.is_calibrated() {
        eprintln!("Warning: no calibration circle was measured; scores are not metric.");
    }
    if !scored.score.shots.is_empty() {
        let visual_path = cli.output_dir.join("shot_detection.png");
        save_rgb(&render_region(&scored), &visual_path)?;
        println!("Visualization saved to: {}", visual_path.display());
    }

    save_gray(&full_threshold, &output_path)?;
    println!("Loaded:  {}", cli.input.display());
    println!("Saved to {}", output_path.display());

    report.set_region(&scored);
    Ok(())
}

fn save_gray(img: &GrayImage, path: &Path) -> Result<(), CliError> {
    img.save(path).map_err(|e| CliError::Write {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

fn save_rgb(img: &RgbImage, path: &Path) -> Result<(), CliError> {
    img.save(path).map_err(|e| CliError::Write {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    log::debug!("wrote {}", path.display());
    Ok(())
}
