use rayon::prelude::*;
use serde::Serialize;

use crate::analysis::brick_resampler::{ResampleConfig, resample_with_report};
use crate::config::{ANALYSIS, PriceLike, StepSize};
use crate::domain::Bar;
use crate::models::ResampleStatus;
use crate::utils::{get_max, get_min};

/// Outcome of resampling with one candidate step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepScan {
    /// Step as a fraction of the last close.
    pub pct: f64,
    pub step: StepSize,
    pub brick_count: usize,
    pub status: ResampleStatus,
}

/// Resamples `bars` once per candidate percentage (of the last close), in parallel.
/// Steps wider than the whole close range are reported as `NoBricks` without running.
pub fn scan_step_sizes(bars: &[Bar], candidate_pcts: &[f64]) -> Vec<StepScan> {
    let closes: Vec<f64> = bars
        .iter()
        .filter(|b| b.is_finite())
        .map(|b| b.close_price.value())
        .collect();
    let Some(&last_close) = closes.last() else {
        return Vec::new();
    };
    let close_span = get_max(&closes) - get_min(&closes);

    candidate_pcts
        .par_iter()
        .map(|&pct| {
            let step = StepSize::new(last_close.abs() * pct);
            if step.is_valid() && step.value() > close_span {
                return StepScan {
                    pct,
                    step,
                    brick_count: 0,
                    status: ResampleStatus::NoBricks,
                };
            }
            let report = resample_with_report(bars, &ResampleConfig::new(step));
            StepScan {
                pct,
                step,
                brick_count: report.bricks.len(),
                status: report.status,
            }
        })
        .collect()
}

/// Largest configured step that still produces enough bricks to chart.
pub fn suggest_step(bars: &[Bar]) -> Option<StepSize> {
    let settings = &ANALYSIS.step_scan;
    scan_step_sizes(bars, settings.candidate_pcts)
        .into_iter()
        .filter(|scan| scan.status.is_ok() && scan.brick_count >= settings.min_bricks)
        .max_by(|a, b| a.step.value().total_cmp(&b.step.value()))
        .map(|scan| scan.step)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sawtooth(len: usize, amplitude: f64) -> Vec<Bar> {
        (0..len)
            .map(|i| {
                let phase = (i % 20) as f64;
                let offset = if phase < 10.0 { phase } else { 20.0 - phase };
                let close = 1000.0 + offset * amplitude / 10.0;
                Bar::new(i as i64, close, close + 1.0, close - 1.0, close, 1.0)
            })
            .collect()
    }

    #[test]
    fn test_scan_counts_fall_with_step() {
        let bars = sawtooth(200, 50.0);
        let scans = scan_step_sizes(&bars, &[0.001, 0.01, 0.5]);
        assert_eq!(scans.len(), 3);
        assert!(scans[0].brick_count > scans[1].brick_count);
        assert_eq!(scans[2].brick_count, 0);
        assert_eq!(scans[2].status, ResampleStatus::NoBricks);
    }

    #[test]
    fn test_suggest_step() {
        let bars = sawtooth(400, 50.0);
        let step = suggest_step(&bars).expect("a step should be found");
        let count = crate::analysis::resample(&bars, step).len();
        assert!(count >= ANALYSIS.step_scan.min_bricks);

        assert!(suggest_step(&[]).is_none());
    }
}
