//! Configuration module for the renko-lens crate.

// Can all be private now because we have a public re-export.
mod analysis;
mod debug;
mod types;

// Re-export commonly used items
pub use analysis::{ANALYSIS, AnalysisConfig, BrickSettings, PivotSettings, StepScanSettings};
pub use debug::{DF, LogFlags};
pub use types::{
    BaseVol, ClosePrice, HighPrice, LowPrice, OpenPrice, Price, PriceLike, StepSize,
};
