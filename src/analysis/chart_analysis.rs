use crate::analysis::brick_resampler::{ResampleConfig, resample_with_report};
use crate::analysis::turning_points::filter_relevant;
use crate::config::StepSize;
use crate::domain::Bar;
use crate::models::ChartArtifacts;

/// Derives both chart artifacts for one step size.
/// Pure: the same bars and step always give the same result.
pub fn chart_analysis_pure(bars: &[Bar], step: StepSize) -> ChartArtifacts {
    let report = resample_with_report(bars, &ResampleConfig::new(step));

    // Both passes share the filter; bricks read their wicks as high/low.
    let brick_pivots = filter_relevant(&report.bricks);
    let bar_pivots = filter_relevant(bars);

    ChartArtifacts {
        step,
        status: report.status,
        bricks: report.bricks,
        brick_pivots,
        bar_pivots,
    }
}
