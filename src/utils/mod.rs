mod maths_utils;
mod perf;
pub mod time_utils;

pub use time_utils::{AppInstant, epoch_ms_to_utc};

pub(crate) use maths_utils::{get_max, get_min, mean_and_stddev};
