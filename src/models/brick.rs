use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::config::{HighPrice, LowPrice, Price, PriceLike};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum BrickDirection {
    #[strum(to_string = "Up")]
    Up,
    #[strum(to_string = "Down")]
    Down,
}

/// A fixed-step price brick derived from one source bar.
/// Several bricks may share a source bar when price moved several steps within it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    /// Dense position in the brick series, independent of source timestamps.
    pub sequence_index: usize,
    pub source_timestamp_ms: i64,
    pub source_bar_index: usize,

    pub open: Price,
    pub close: Price,
    pub direction: BrickDirection,

    /// Always exactly (min(open, close), max(open, close)).
    pub body: (LowPrice, HighPrice),
    /// Always contains `body`.
    pub wick: (LowPrice, HighPrice),

    pub indicator1: Option<f64>,
    pub indicator2: Option<f64>,

    /// Marker of the source bar, copied onto every brick of the batch.
    pub source_marker: Option<f64>,
    /// Marker anchored to this brick. At most one brick per batch carries it.
    pub extrema_marker: Option<f64>,
}

impl Brick {
    /// Builds a brick whose wick starts out equal to its body.
    pub fn new(
        sequence_index: usize,
        source_timestamp_ms: i64,
        source_bar_index: usize,
        open: Price,
        close: Price,
    ) -> Self {
        let direction = if close >= open {
            BrickDirection::Up
        } else {
            BrickDirection::Down
        };
        let body = (LowPrice::from(open.min(close)), HighPrice::from(open.max(close)));

        Self {
            sequence_index,
            source_timestamp_ms,
            source_bar_index,
            open,
            close,
            direction,
            body,
            wick: body,
            indicator1: None,
            indicator2: None,
            source_marker: None,
            extrema_marker: None,
        }
    }

    #[inline]
    pub fn body_top(&self) -> f64 {
        self.body.1.value()
    }

    #[inline]
    pub fn body_bottom(&self) -> f64 {
        self.body.0.value()
    }

    #[inline]
    pub fn wick_top(&self) -> f64 {
        self.wick.1.value()
    }

    #[inline]
    pub fn wick_bottom(&self) -> f64 {
        self.wick.0.value()
    }

    /// Restores `wick ⊇ body` after extremes have been written.
    pub(crate) fn clamp_wick_to_body(&mut self) {
        if self.wick.0 > self.body.0 || self.wick.0.value().is_nan() {
            self.wick.0 = self.body.0;
        }
        if self.wick.1 < self.body.1 || self.wick.1.value().is_nan() {
            self.wick.1 = self.body.1;
        }
    }
}

/// Outcome of one resampling run. Only `Ok` carries bricks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ResampleStatus {
    Ok,
    EmptyInput,
    InvalidStep,
    /// Price never left the first grid cell. Try a smaller step.
    NoBricks,
    TooManyBricksPerBar {
        bar_index: usize,
        required: f64,
        limit: usize,
    },
    TooManyBricks {
        limit: usize,
    },
    /// The step is smaller than the float spacing near `price`, so adjacent
    /// grid levels collapse onto the same value.
    StepBelowPrecision {
        price: f64,
    },
}

impl ResampleStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ResampleStatus::Ok)
    }

    /// Degenerate outcomes the caller can fix by choosing another step.
    pub fn suggests_other_step(&self) -> bool {
        matches!(
            self,
            ResampleStatus::NoBricks
                | ResampleStatus::TooManyBricksPerBar { .. }
                | ResampleStatus::TooManyBricks { .. }
                | ResampleStatus::StepBelowPrecision { .. }
        )
    }
}

impl std::fmt::Display for ResampleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::EmptyInput => write!(f, "no input bars"),
            Self::InvalidStep => write!(f, "step size must be a positive number"),
            Self::NoBricks => write!(f, "no bricks produced, try a smaller step"),
            Self::TooManyBricksPerBar {
                bar_index,
                required,
                limit,
            } => write!(
                f,
                "bar {} needs {:.0} bricks (limit {}), try a larger step",
                bar_index, required, limit
            ),
            Self::TooManyBricks { limit } => {
                write!(f, "more than {} bricks, try a larger step", limit)
            }
            Self::StepBelowPrecision { price } => write!(
                f,
                "step is below the price resolution near {}, try a larger step",
                price
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResampleReport {
    pub bricks: Vec<Brick>,
    pub status: ResampleStatus,
}

impl ResampleReport {
    pub(crate) fn rejected(status: ResampleStatus) -> Self {
        Self {
            bricks: Vec::new(),
            status,
        }
    }
}
