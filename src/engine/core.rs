use std::collections::HashMap;
use std::sync::Arc;

use crate::analysis::chart_analysis_pure;
use crate::config::{DF, StepSize};
use crate::domain::Bar;
use crate::models::{BarSeries, ChartArtifacts};
use crate::utils::AppInstant;

use super::state::EngineStats;

/// Owns a bar series and hands out derived chart artifacts.
/// Results are memoized per (series revision, step) and dropped whenever the
/// series changes.
pub struct ChartEngine {
    series: BarSeries,
    cache: HashMap<(u64, u64), Arc<ChartArtifacts>>,
    pub stats: EngineStats,
}

impl ChartEngine {
    pub fn new(series: BarSeries) -> Self {
        Self {
            series,
            cache: HashMap::new(),
            stats: EngineStats::new(),
        }
    }

    pub fn series(&self) -> &BarSeries {
        &self.series
    }

    /// Artifacts for `step`, computed on first request and shared afterwards.
    pub fn artifacts(&mut self, step: StepSize) -> Arc<ChartArtifacts> {
        let key = (self.series.revision, step.cache_key());

        if let Some(hit) = self.cache.get(&key) {
            self.stats.cache_hits += 1;
            if DF.log_engine {
                log::debug!("{}: cache hit for step {}", self.series.name, step);
            }
            return Arc::clone(hit);
        }

        let started = AppInstant::now();
        let artifacts = Arc::new(chart_analysis_pure(&self.series.bars, step));
        self.stats.record_compute(started);

        log::info!(
            "{}: {} bricks, {} brick pivots, {} bar pivots at step {} ({})",
            self.series.name,
            artifacts.bricks.len(),
            artifacts.brick_pivots.len(),
            artifacts.bar_pivots.len(),
            step,
            artifacts.status
        );

        self.cache.insert(key, Arc::clone(&artifacts));
        artifacts
    }

    pub fn replace_bars(&mut self, bars: Vec<Bar>) {
        self.series.replace_bars(bars);
        self.invalidate();
    }

    /// Live update; see [`BarSeries::push_or_update`]. Returns true when the series changed.
    pub fn push_or_update(&mut self, bar: Bar) -> bool {
        let changed = self.series.push_or_update(bar);
        if changed {
            self.invalidate();
        }
        changed
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    fn invalidate(&mut self) {
        if self.cache.is_empty() {
            return;
        }
        if DF.log_engine {
            log::debug!(
                "{}: dropping {} cached artifact set(s) at revision {}",
                self.series.name,
                self.cache.len(),
                self.series.revision
            );
        }
        self.cache.clear();
        self.stats.invalidations += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_series() -> BarSeries {
        let bars = [100.0, 112.0, 125.0, 104.0, 131.0]
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64, c, c, c, c, 1.0))
            .collect();
        BarSeries::from_bars("TEST", bars)
    }

    #[test]
    fn test_memoizes_per_step() {
        let mut engine = ChartEngine::new(make_series());

        let a = engine.artifacts(StepSize::new(10.0));
        let b = engine.artifacts(StepSize::new(10.0));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(engine.stats.cache_hits, 1);
        assert_eq!(engine.stats.cache_misses, 1);

        let c = engine.artifacts(StepSize::new(5.0));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(engine.cached_entries(), 2);
    }

    #[test]
    fn test_live_update_invalidates() {
        let mut engine = ChartEngine::new(make_series());
        let before = engine.artifacts(StepSize::new(10.0));

        assert!(engine.push_or_update(Bar::new(5, 131.0, 160.0, 130.0, 155.0, 1.0)));
        assert_eq!(engine.cached_entries(), 0);
        assert_eq!(engine.stats.invalidations, 1);

        let after = engine.artifacts(StepSize::new(10.0));
        assert!(after.bricks.len() > before.bricks.len());

        // Stale bar leaves the cache alone
        assert!(!engine.push_or_update(Bar::new(1, 1.0, 1.0, 1.0, 1.0, 1.0)));
        assert_eq!(engine.cached_entries(), 1);
    }
}
