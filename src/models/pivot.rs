use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::Display;

use crate::config::Price;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum PivotKind {
    #[strum(to_string = "Top")]
    Top,
    #[strum(to_string = "Bottom")]
    Bottom,
}

/// A marker that survived relevance filtering, snapped to the candidate's high or low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelevantPivot {
    pub anchor_price: Price,
    pub is_top: bool,
}

impl RelevantPivot {
    pub fn top(anchor: f64) -> Self {
        Self {
            anchor_price: Price::new(anchor),
            is_top: true,
        }
    }

    pub fn bottom(anchor: f64) -> Self {
        Self {
            anchor_price: Price::new(anchor),
            is_top: false,
        }
    }

    pub fn kind(&self) -> PivotKind {
        if self.is_top {
            PivotKind::Top
        } else {
            PivotKind::Bottom
        }
    }
}

/// Candidate index -> resolved pivot. Ordered so iteration follows the sequence.
pub type PivotMap = BTreeMap<usize, RelevantPivot>;
