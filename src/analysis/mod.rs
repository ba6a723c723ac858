// Brick resampling and turning-point relevance
pub mod brick_resampler;
pub mod chart_analysis;
pub mod marker_detection;
pub mod step_scanner;
pub mod turning_points;

pub use brick_resampler::{ResampleConfig, resample, resample_with_report};
pub use chart_analysis::chart_analysis_pure;
pub use marker_detection::{apply_markers, detect_raw_markers};
pub use step_scanner::{StepScan, scan_step_sizes, suggest_step};
pub use turning_points::{PivotCandidate, classify_candidate, filter_relevant};
