// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod models;
pub mod report;
pub mod utils;

// Re-export commonly used types outside of crate
pub use analysis::{filter_relevant, resample};
pub use config::StepSize;
pub use domain::Bar;
pub use engine::ChartEngine;
pub use models::{BarSeries, Brick, ChartArtifacts, RelevantPivot};

use std::path::PathBuf;

use anyhow::{Result, bail};

use crate::analysis::{apply_markers, detect_raw_markers, scan_step_sizes, suggest_step};
use crate::config::{ANALYSIS, PriceLike};
use crate::report::BrickReport;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON file holding the bar series (array of bars, or {"name", "bars"})
    pub input: PathBuf,

    /// Brick height in absolute price units
    #[arg(long)]
    pub step: Option<f64>,

    /// Pick the step automatically. Required when --step is absent
    #[arg(long, default_value_t = false)]
    pub auto_step: bool,

    /// Generate raw extrema markers for bars that have none
    #[arg(long, default_value_t = false)]
    pub detect_markers: bool,

    /// Write the derived artifacts as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Number of newest bricks/pivots to print
    #[arg(long, default_value_t = 30)]
    pub rows: usize,

    /// More logging (-v info for dependencies, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Explicit --step wins; otherwise a step is only suggested when --auto-step asks for it.
fn resolve_step(args: &Cli, name: &str, bars: &[Bar]) -> Result<StepSize> {
    if let Some(step) = args.step {
        return Ok(StepSize::new(step));
    }
    if !args.auto_step {
        bail!("No brick step given. Pass --step <price> or --auto-step.");
    }
    match suggest_step(bars) {
        Some(step) => {
            log::info!("{}: using suggested step {}", name, step);
            Ok(step)
        }
        None => bail!(
            "Could not find a usable step for {} ({} bars). Pass --step explicitly.",
            name,
            bars.len()
        ),
    }
}

/// Load -> (optionally detect markers) -> resample + filter -> report/export.
pub fn run_cli(args: Cli) -> Result<()> {
    let (name, mut bars) = data::load_bars_json(&args.input)?;

    if args.detect_markers {
        let markers = detect_raw_markers(&bars, ANALYSIS.pivots.min_prominence_pct);
        let written = apply_markers(&mut bars, &markers);
        log::info!("{}: detected {} raw markers", name, written);
    } else if !bars.is_empty() && bars.iter().all(|b| b.extrema_marker.is_none()) {
        log::info!("{}: input has no extrema markers (see --detect-markers)", name);
    }

    let step = resolve_step(&args, &name, &bars)?;

    let mut engine = ChartEngine::new(BarSeries::from_bars(name.clone(), bars));
    let artifacts = engine.artifacts(step);
    let report = BrickReport::new(&name, &artifacts);

    println!("{}", report.summary());

    if artifacts.status.suggests_other_step() {
        println!("{}", artifacts.status);
        let scans = scan_step_sizes(&engine.series().bars, ANALYSIS.step_scan.candidate_pcts);
        for scan in scans.iter().filter(|s| s.status.is_ok()) {
            println!(
                "  step {} ({:.2}% of last close) -> {} bricks",
                scan.step,
                scan.pct * 100.0,
                scan.brick_count
            );
        }
    } else if artifacts.status.is_ok() {
        println!("{}", report.brick_table(args.rows));
    }

    if !artifacts.bar_pivots.is_empty() {
        println!("{}", report.bar_pivot_table(&engine.series().bars, args.rows));
    }

    if let Some(last) = engine.series().last_close() {
        log::debug!("{}: last close {}", name, last.format_price());
    }

    if let Some(path) = &args.json {
        data::export_artifacts_json(path, &name, &artifacts)?;
    }

    Ok(())
}
