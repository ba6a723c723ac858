//! Converts time-based bars into fixed-step price bricks.
//!
//! Bricks always open and close on an absolute grid `origin + k * step`, where
//! `origin` is the first close floored to a multiple of the step. Each brick
//! batch (all bricks produced by one bar) receives the high/low extremes seen
//! since the previous batch as wicks on its outermost bricks.

use crate::config::{ANALYSIS, DF, HighPrice, LowPrice, Price, PriceLike, StepSize};
use crate::domain::Bar;
use crate::models::{Brick, ResampleReport, ResampleStatus};

/// Runtime parameters for one resampling run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResampleConfig {
    pub step: StepSize,
    pub max_bricks_per_bar: usize,
    pub max_total_bricks: usize,
}

impl ResampleConfig {
    pub fn new(step: StepSize) -> Self {
        Self {
            step,
            max_bricks_per_bar: ANALYSIS.bricks.max_bricks_per_bar,
            max_total_bricks: ANALYSIS.bricks.max_total_bricks,
        }
    }
}

/// Resamples `bars` into bricks of height `step`.
/// Empty input, a non-positive step or a tripped guard all yield an empty vec.
pub fn resample(bars: &[Bar], step: StepSize) -> Vec<Brick> {
    resample_with_report(bars, &ResampleConfig::new(step)).bricks
}

/// Same as [`resample`] but also reports why the output is empty, if it is.
pub fn resample_with_report(bars: &[Bar], config: &ResampleConfig) -> ResampleReport {
    if !config.step.is_valid() {
        log::warn!("Resample rejected: invalid step {:?}", config.step);
        return ResampleReport::rejected(ResampleStatus::InvalidStep);
    }

    let Some(first_close) = bars
        .iter()
        .find(|b| b.is_finite())
        .map(|b| b.close_price.value())
    else {
        return ResampleReport::rejected(ResampleStatus::EmptyInput);
    };

    crate::trace_time!("Brick Resample", 5000, {
        run_resample(bars, first_close, config)
    })
}

const MAX_LEVEL_CORRECTION: usize = 4;

/// Absolute price grid. Prices are always derived from the integer level,
/// never accumulated, so equal levels give bit-identical prices.
#[derive(Debug, Clone, Copy)]
struct PriceGrid {
    origin: f64,
    step: f64,
    level: i64,
}

impl PriceGrid {
    fn new(first_close: f64, step: f64) -> Self {
        Self {
            origin: (first_close / step).floor() * step,
            step,
            level: 0,
        }
    }

    #[inline]
    fn price_at(&self, level: i64) -> f64 {
        self.origin + level as f64 * self.step
    }

    /// Signed number of whole steps between the current reference and `close`,
    /// as a float so it can be checked against the guards before any casting.
    fn raw_distance(&self, close: f64) -> f64 {
        (close - self.price_at(self.level)) / self.step
    }

    /// True when the neighbouring levels are distinct prices on either side of `level`.
    fn resolves(&self, level: i64) -> bool {
        let here = self.price_at(level);
        self.price_at(level - 1) < here && here < self.price_at(level + 1)
    }

    /// Level the reference ends on after processing `close`: the highest level
    /// at or below `close` when rising, the lowest level at or above when falling.
    /// The closed-form estimate is only off by rounding, so corrections are capped.
    fn target_level(&self, close: f64) -> i64 {
        let mut target = self.level;

        if close >= self.price_at(self.level + 1) {
            target = ((close - self.origin) / self.step).floor() as i64;
            for _ in 0..MAX_LEVEL_CORRECTION {
                if self.price_at(target + 1) > close {
                    break;
                }
                target += 1;
            }
            for _ in 0..MAX_LEVEL_CORRECTION {
                if target <= self.level || self.price_at(target) <= close {
                    break;
                }
                target -= 1;
            }
        } else if close <= self.price_at(self.level - 1) {
            target = ((close - self.origin) / self.step).ceil() as i64;
            for _ in 0..MAX_LEVEL_CORRECTION {
                if self.price_at(target - 1) < close {
                    break;
                }
                target -= 1;
            }
            for _ in 0..MAX_LEVEL_CORRECTION {
                if target >= self.level || self.price_at(target) >= close {
                    break;
                }
                target += 1;
            }
        }

        target
    }
}

/// Running high/low since the last emitted batch.
#[derive(Debug, Clone, Copy, Default)]
struct PeriodExtremes {
    window: Option<(f64, f64)>,
}

impl PeriodExtremes {
    fn absorb(&mut self, bar: &Bar) {
        let (high, low) = (bar.high_price.value(), bar.low_price.value());
        self.window = Some(match self.window {
            Some((h, l)) => (h.max(high), l.min(low)),
            None => (high, low),
        });
    }

    fn reset(&mut self) {
        self.window = None;
    }
}

fn run_resample(bars: &[Bar], first_close: f64, config: &ResampleConfig) -> ResampleReport {
    let mut grid = PriceGrid::new(first_close, config.step.value());
    if !grid.resolves(grid.level) {
        log::warn!(
            "Resample rejected: step {} is below the price resolution near {}",
            config.step,
            first_close
        );
        return ResampleReport::rejected(ResampleStatus::StepBelowPrecision { price: first_close });
    }
    let mut extremes = PeriodExtremes::default();
    let mut bricks: Vec<Brick> = Vec::new();

    let mut last_indicator1: Option<f64> = None;
    let mut last_indicator2: Option<f64> = None;

    for (bar_index, bar) in bars.iter().enumerate() {
        if !bar.is_finite() {
            log::debug!("Skipping non-finite bar {} at {}", bar_index, bar.timestamp_ms);
            continue;
        }

        extremes.absorb(bar);
        last_indicator1 = bar.indicator1.or(last_indicator1);
        last_indicator2 = bar.indicator2.or(last_indicator2);

        let close = bar.close_price.value();
        let required = grid.raw_distance(close).abs();
        if required > config.max_bricks_per_bar as f64 + 1.0 {
            log::warn!(
                "Resample rejected: bar {} needs ~{:.0} bricks (limit {})",
                bar_index,
                required,
                config.max_bricks_per_bar
            );
            return ResampleReport::rejected(ResampleStatus::TooManyBricksPerBar {
                bar_index,
                required,
                limit: config.max_bricks_per_bar,
            });
        }

        let target = grid.target_level(close);
        let count = target.abs_diff(grid.level) as usize;
        if count == 0 {
            continue;
        }
        if count > config.max_bricks_per_bar {
            log::warn!(
                "Resample rejected: bar {} needs {} bricks (limit {})",
                bar_index,
                count,
                config.max_bricks_per_bar
            );
            return ResampleReport::rejected(ResampleStatus::TooManyBricksPerBar {
                bar_index,
                required: count as f64,
                limit: config.max_bricks_per_bar,
            });
        }
        if bricks.len() + count > config.max_total_bricks {
            log::warn!(
                "Resample rejected: more than {} bricks",
                config.max_total_bricks
            );
            return ResampleReport::rejected(ResampleStatus::TooManyBricks {
                limit: config.max_total_bricks,
            });
        }

        let batch_start = bricks.len();
        let delta: i64 = if target > grid.level { 1 } else { -1 };
        while grid.level != target {
            let open = Price::new(grid.price_at(grid.level));
            let brick_close = Price::new(grid.price_at(grid.level + delta));
            let moved = if delta > 0 {
                brick_close > open
            } else {
                brick_close < open
            };
            if !moved {
                log::warn!(
                    "Resample rejected: step {} is below the price resolution near {}",
                    config.step,
                    open
                );
                return ResampleReport::rejected(ResampleStatus::StepBelowPrecision {
                    price: open.value(),
                });
            }
            let mut brick =
                Brick::new(bricks.len(), bar.timestamp_ms, bar_index, open, brick_close);
            brick.indicator1 = last_indicator1;
            brick.indicator2 = last_indicator2;
            brick.source_marker = bar.extrema_marker;
            bricks.push(brick);
            grid.level += delta;
        }

        let batch = &mut bricks[batch_start..];
        if let Some((period_high, period_low)) = extremes.window {
            assign_wicks(batch, period_high, period_low);
        }
        if let Some(marker) = bar.extrema_marker.filter(|m| m.is_finite()) {
            assign_marker(batch, marker);
        }

        if DF.log_resampler {
            log::debug!(
                "Bar {} emitted {} brick(s), reference now {}",
                bar_index,
                count,
                grid.price_at(grid.level)
            );
        }

        extremes.reset();
    }

    let status = if bricks.is_empty() {
        log::warn!(
            "No bricks produced from {} bars with step {}, try a smaller step",
            bars.len(),
            config.step
        );
        ResampleStatus::NoBricks
    } else {
        ResampleStatus::Ok
    };

    ResampleReport { bricks, status }
}

/// Index of the brick with the highest body top and of the one with the lowest body bottom.
fn batch_extreme_indices(batch: &[Brick]) -> (usize, usize) {
    let mut top_idx = 0;
    let mut bottom_idx = 0;
    for (i, brick) in batch.iter().enumerate().skip(1) {
        if brick.body_top() > batch[top_idx].body_top() {
            top_idx = i;
        }
        if brick.body_bottom() < batch[bottom_idx].body_bottom() {
            bottom_idx = i;
        }
    }
    (top_idx, bottom_idx)
}

fn assign_wicks(batch: &mut [Brick], period_high: f64, period_low: f64) {
    if batch.is_empty() {
        return;
    }
    let (top_idx, bottom_idx) = batch_extreme_indices(batch);

    batch[top_idx].wick.1 = HighPrice::new(period_high);
    batch[bottom_idx].wick.0 = LowPrice::new(period_low);

    for brick in batch.iter_mut() {
        brick.clamp_wick_to_body();
    }
}

/// Anchors the marker on whichever outer brick has its wick extreme nearer to it.
/// Ties go to the high side.
fn assign_marker(batch: &mut [Brick], marker: f64) {
    if batch.is_empty() {
        return;
    }
    let (top_idx, bottom_idx) = batch_extreme_indices(batch);

    let dist_top = (marker - batch[top_idx].wick_top()).abs();
    let dist_bottom = (marker - batch[bottom_idx].wick_bottom()).abs();
    let chosen = if dist_top <= dist_bottom {
        top_idx
    } else {
        bottom_idx
    };
    batch[chosen].extrema_marker = Some(marker);
}
