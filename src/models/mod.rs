mod bar_series;
mod brick;
mod chart_artifacts;
mod pivot;

pub use {
    bar_series::BarSeries,
    brick::{Brick, BrickDirection, ResampleReport, ResampleStatus},
    chart_artifacts::ChartArtifacts,
    pivot::{PivotKind, PivotMap, RelevantPivot},
};
