mod core;
mod state;

pub use self::core::ChartEngine;
pub use state::EngineStats;
