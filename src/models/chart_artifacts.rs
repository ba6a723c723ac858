use serde::{Deserialize, Serialize};

use crate::config::StepSize;
use crate::models::{Brick, BrickDirection, PivotMap, ResampleStatus};

/// Everything the chart renderer needs for one (series revision, step) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartArtifacts {
    pub step: StepSize,
    pub status: ResampleStatus,
    pub bricks: Vec<Brick>,
    /// Relevant pivots over the brick series, keyed by brick sequence index.
    pub brick_pivots: PivotMap,
    /// Relevant pivots over the raw bars, keyed by bar index.
    pub bar_pivots: PivotMap,
}

impl ChartArtifacts {
    pub fn up_count(&self) -> usize {
        self.bricks
            .iter()
            .filter(|b| b.direction == BrickDirection::Up)
            .count()
    }

    pub fn down_count(&self) -> usize {
        self.bricks.len() - self.up_count()
    }

    /// (tops, bottoms)
    pub fn pivot_counts(pivots: &PivotMap) -> (usize, usize) {
        let tops = pivots.values().filter(|p| p.is_top).count();
        (tops, pivots.len() - tops)
    }
}
