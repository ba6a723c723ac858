use tabled::{Table, Tabled, settings::Style};

use crate::config::PriceLike;
use crate::domain::Bar;
use crate::models::{ChartArtifacts, PivotMap, RelevantPivot};
use crate::utils::epoch_ms_to_utc;

#[derive(Tabled)]
struct BrickRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Dir")]
    direction: String,
    #[tabled(rename = "Open")]
    open: String,
    #[tabled(rename = "Close")]
    close: String,
    #[tabled(rename = "Wick Low")]
    wick_low: String,
    #[tabled(rename = "Wick High")]
    wick_high: String,
    #[tabled(rename = "Pivot")]
    pivot: String,
}

#[derive(Tabled)]
struct PivotRow {
    #[tabled(rename = "Bar")]
    index: usize,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Anchor")]
    anchor: String,
}

fn pivot_label(pivot: Option<&RelevantPivot>) -> String {
    match pivot {
        Some(p) => format!("{} @ {}", p.kind(), p.anchor_price),
        None => String::new(),
    }
}

/// Terminal rendering of one artifact set.
pub struct BrickReport<'a> {
    series_name: &'a str,
    artifacts: &'a ChartArtifacts,
}

impl<'a> BrickReport<'a> {
    pub fn new(series_name: &'a str, artifacts: &'a ChartArtifacts) -> Self {
        Self {
            series_name,
            artifacts,
        }
    }

    pub fn summary(&self) -> String {
        let a = self.artifacts;
        let (brick_tops, brick_bottoms) = ChartArtifacts::pivot_counts(&a.brick_pivots);
        let (bar_tops, bar_bottoms) = ChartArtifacts::pivot_counts(&a.bar_pivots);
        format!(
            "{} | step {} | {} bricks ({} up / {} down) | brick pivots {}T/{}B | bar pivots {}T/{}B | {}",
            self.series_name,
            a.step,
            a.bricks.len(),
            a.up_count(),
            a.down_count(),
            brick_tops,
            brick_bottoms,
            bar_tops,
            bar_bottoms,
            a.status
        )
    }

    /// Table of the newest `max_rows` bricks.
    pub fn brick_table(&self, max_rows: usize) -> String {
        let bricks = &self.artifacts.bricks;
        let start = bricks.len().saturating_sub(max_rows);

        let rows: Vec<BrickRow> = bricks[start..]
            .iter()
            .map(|b| BrickRow {
                index: b.sequence_index,
                source: epoch_ms_to_utc(b.source_timestamp_ms),
                direction: b.direction.to_string(),
                open: b.open.format_price(),
                close: b.close.format_price(),
                wick_low: b.wick.0.format_price(),
                wick_high: b.wick.1.format_price(),
                pivot: pivot_label(self.artifacts.brick_pivots.get(&b.sequence_index)),
            })
            .collect();

        Table::new(rows).with(Style::rounded()).to_string()
    }

    /// Table of the newest `max_rows` relevant pivots on the raw bars.
    pub fn bar_pivot_table(&self, bars: &[Bar], max_rows: usize) -> String {
        pivot_table(bars, &self.artifacts.bar_pivots, max_rows)
    }
}

fn pivot_table(bars: &[Bar], pivots: &PivotMap, max_rows: usize) -> String {
    let skip = pivots.len().saturating_sub(max_rows);
    let rows: Vec<PivotRow> = pivots
        .iter()
        .skip(skip)
        .map(|(&index, pivot)| PivotRow {
            index,
            time: bars
                .get(index)
                .map(|b| epoch_ms_to_utc(b.timestamp_ms))
                .unwrap_or_default(),
            kind: pivot.kind().to_string(),
            anchor: pivot.anchor_price.format_price(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::chart_analysis_pure;
    use crate::config::StepSize;

    #[test]
    fn test_report_renders_rows_and_summary() {
        let bars = vec![
            Bar::new(0, 100.0, 100.0, 100.0, 100.0, 1.0),
            Bar::new(60_000, 100.0, 131.0, 100.0, 130.0, 1.0).with_marker(131.0),
            Bar::new(120_000, 130.0, 130.0, 88.0, 90.0, 1.0).with_marker(88.0),
        ];
        let artifacts = chart_analysis_pure(&bars, StepSize::new(10.0));
        let report = BrickReport::new("TEST", &artifacts);

        let summary = report.summary();
        assert!(summary.starts_with("TEST"));
        assert!(summary.contains("7 bricks (3 up / 4 down)"));

        let table = report.brick_table(3);
        assert!(table.contains("Wick High"));
        assert!(table.contains("Bottom @ $88.0000"));
        assert!(!table.contains("Top @"));

        let pivots = report.bar_pivot_table(&bars, 10);
        assert!(pivots.contains("Top"));
        assert!(pivots.contains("1970-01-01 00:02"));
    }
}
