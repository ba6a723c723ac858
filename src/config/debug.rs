//! Debugging feature flags.

pub struct LogFlags {
    /// Per-bar emission details from the brick resampler.
    pub log_resampler: bool,

    /// Every pending/commit transition in the turning-point filter.
    pub log_pivots: bool,

    /// Cache hits, misses and invalidations in the chart engine.
    pub log_engine: bool,

    /// Activate trace_time macro (for cool scope-level timing)
    pub log_performance: bool,
}

pub const DF: LogFlags = LogFlags {
    log_resampler: false,
    log_pivots: false,
    log_engine: false,
    log_performance: false,
};
