/// Run-fatal conditions of the scoring core.
///
/// Everything recoverable (missing calibration disk, degenerate shot shapes,
/// an empty target) is reported as a status on the result instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("no target found: the image contains no shapes")]
    NoTargetFound,
    #[error("target bounds are empty after clamping to the {width}x{height} image")]
    EmptyTargetRegion { width: u32, height: u32 },
}
