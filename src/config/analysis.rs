//! Analysis and computation configuration

use serde::{Deserialize, Serialize};

/// Guards against configuration errors that would otherwise produce runaway output.
#[derive(Clone, Debug, Copy, Serialize, Deserialize)]
pub struct BrickSettings {
    /// Upper bound on bricks a single bar may emit before the run is rejected.
    pub max_bricks_per_bar: usize,
    /// Upper bound on the total brick count of one run.
    pub max_total_bricks: usize,
}

/// Settings for scanning candidate step sizes.
#[derive(Clone, Debug, Serialize)]
pub struct StepScanSettings {
    /// Candidate steps expressed as a fraction of the last close (0.01 = 1%).
    pub candidate_pcts: &'static [f64],
    /// A suggested step must produce at least this many bricks.
    pub min_bricks: usize,
}

/// Settings for the raw marker detector.
#[derive(Clone, Debug, Copy, Serialize, Deserialize)]
pub struct PivotSettings {
    /// Minimum peak prominence, as a fraction of the mean close.
    pub min_prominence_pct: f64,
}

/// The Master Analysis Configuration
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisConfig {
    pub bricks: BrickSettings,
    pub step_scan: StepScanSettings,
    pub pivots: PivotSettings,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    bricks: BrickSettings {
        max_bricks_per_bar: 10_000,
        max_total_bricks: 1_000_000,
    },
    step_scan: StepScanSettings {
        candidate_pcts: &[
            0.0005, 0.001, 0.0025, 0.005, 0.0075, 0.01, 0.015, 0.02, 0.03, 0.05, 0.08, 0.10,
        ],
        min_bricks: 20,
    },
    pivots: PivotSettings {
        min_prominence_pct: 0.01,
    },
};
