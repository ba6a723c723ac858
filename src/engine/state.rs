use crate::utils::AppInstant;

/// Bookkeeping for the artifact cache.
#[derive(Debug, Clone)]
pub struct EngineStats {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub invalidations: u64,

    /// Wall time of the most recent recomputation
    pub last_compute_micros: u128,
    pub last_update_time: AppInstant,
}

impl EngineStats {
    pub fn new() -> Self {
        Self {
            cache_hits: 0,
            cache_misses: 0,
            invalidations: 0,
            last_compute_micros: 0,
            last_update_time: AppInstant::now(),
        }
    }

    pub(crate) fn record_compute(&mut self, started: AppInstant) {
        self.cache_misses += 1;
        self.last_compute_micros = started.elapsed().as_micros();
        self.last_update_time = AppInstant::now();
    }
}

impl Default for EngineStats {
    fn default() -> Self {
        Self::new()
    }
}
