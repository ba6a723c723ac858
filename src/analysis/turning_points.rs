//! Zigzag relevance filter for raw extrema markers.
//!
//! Works over any sequence whose items expose a high/low pair and an optional
//! marker, so raw bars and bricks share one implementation.

use crate::config::{DF, PriceLike};
use crate::domain::Bar;
use crate::models::{Brick, PivotMap, RelevantPivot};

/// Anything the filter can read a turning point from.
pub trait PivotCandidate {
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn extrema_marker(&self) -> Option<f64>;
}

impl PivotCandidate for Bar {
    fn high(&self) -> f64 {
        self.high_price.value()
    }

    fn low(&self) -> f64 {
        self.low_price.value()
    }

    fn extrema_marker(&self) -> Option<f64> {
        self.extrema_marker
    }
}

impl PivotCandidate for Brick {
    fn high(&self) -> f64 {
        self.wick_top()
    }

    fn low(&self) -> f64 {
        self.wick_bottom()
    }

    fn extrema_marker(&self) -> Option<f64> {
        self.extrema_marker
    }
}

impl<T: PivotCandidate + ?Sized> PivotCandidate for &T {
    fn high(&self) -> f64 {
        (**self).high()
    }

    fn low(&self) -> f64 {
        (**self).low()
    }

    fn extrema_marker(&self) -> Option<f64> {
        (**self).extrema_marker()
    }
}

/// Decides which side a marker belongs to and snaps it to that side's price.
/// Returns `None` for candidates without a marker or with non-finite values.
pub fn classify_candidate<C: PivotCandidate>(candidate: &C) -> Option<RelevantPivot> {
    let marker = candidate.extrema_marker()?;
    let (high, low) = (candidate.high(), candidate.low());
    if !marker.is_finite() || !high.is_finite() || !low.is_finite() {
        return None;
    }

    if (marker - high).abs() <= (marker - low).abs() {
        Some(RelevantPivot::top(high))
    } else {
        Some(RelevantPivot::bottom(low))
    }
}

/// The single lookback slot of the alternation state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PendingPivot {
    None,
    Top { index: usize, anchor: f64 },
    Bottom { index: usize, anchor: f64 },
}

impl PendingPivot {
    fn adopt(index: usize, pivot: RelevantPivot) -> Self {
        let anchor = pivot.anchor_price.value();
        if pivot.is_top {
            PendingPivot::Top { index, anchor }
        } else {
            PendingPivot::Bottom { index, anchor }
        }
    }

    /// Feeds one classified candidate. Alternations commit the old pending
    /// pivot into `keep`; same-side conflicts keep the more extreme one,
    /// with ties going to the newer candidate.
    fn advance(self, index: usize, pivot: RelevantPivot, keep: &mut PivotMap) -> Self {
        let new_anchor = pivot.anchor_price.value();
        match (self, pivot.is_top) {
            (PendingPivot::None, _) => Self::adopt(index, pivot),

            (PendingPivot::Top { anchor, .. }, true) => {
                if new_anchor >= anchor {
                    Self::adopt(index, pivot)
                } else {
                    self
                }
            }
            (PendingPivot::Bottom { anchor, .. }, false) => {
                if new_anchor <= anchor {
                    Self::adopt(index, pivot)
                } else {
                    self
                }
            }

            (PendingPivot::Top { .. }, false) | (PendingPivot::Bottom { .. }, true) => {
                self.commit(keep);
                Self::adopt(index, pivot)
            }
        }
    }

    fn commit(self, keep: &mut PivotMap) {
        let (index, pivot) = match self {
            PendingPivot::None => return,
            PendingPivot::Top { index, anchor } => (index, RelevantPivot::top(anchor)),
            PendingPivot::Bottom { index, anchor } => (index, RelevantPivot::bottom(anchor)),
        };
        if DF.log_pivots {
            log::debug!("Committed {} at index {}", pivot.kind(), index);
        }
        keep.insert(index, pivot);
    }
}

/// Keeps only markers that form a strictly alternating top/bottom sequence.
/// The last unresolved extreme is always kept.
pub fn filter_relevant<C: PivotCandidate>(candidates: &[C]) -> PivotMap {
    let mut keep = PivotMap::new();
    let mut pending = PendingPivot::None;

    for (index, candidate) in candidates.iter().enumerate() {
        let Some(pivot) = classify_candidate(candidate) else {
            continue;
        };
        pending = pending.advance(index, pivot, &mut keep);
    }

    pending.commit(&mut keep);
    keep
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    /// Minimal candidate so tests can set the classification directly.
    struct Mark {
        high: f64,
        low: f64,
        marker: Option<f64>,
    }

    fn top(high: f64) -> Mark {
        Mark {
            high,
            low: high - 100.0,
            marker: Some(high),
        }
    }

    fn bottom(low: f64) -> Mark {
        Mark {
            high: low + 100.0,
            low,
            marker: Some(low),
        }
    }

    fn plain() -> Mark {
        Mark {
            high: 10.0,
            low: 5.0,
            marker: None,
        }
    }

    impl PivotCandidate for Mark {
        fn high(&self) -> f64 {
            self.high
        }
        fn low(&self) -> f64 {
            self.low
        }
        fn extrema_marker(&self) -> Option<f64> {
            self.marker
        }
    }

    fn assert_alternates(keep: &PivotMap) {
        for (a, b) in keep.values().tuple_windows() {
            assert_ne!(a.is_top, b.is_top, "consecutive commits of the same side");
        }
    }

    #[test]
    fn test_replace_then_alternate() {
        let candidates = vec![top(10.0), top(12.0), bottom(5.0), top(9.0)];
        let keep = filter_relevant(&candidates);

        assert_eq!(keep.len(), 3);
        assert!(!keep.contains_key(&0));
        assert_eq!(keep[&1], RelevantPivot::top(12.0));
        assert_eq!(keep[&2], RelevantPivot::bottom(5.0));
        assert_eq!(keep[&3], RelevantPivot::top(9.0));
        assert_alternates(&keep);
    }

    #[test]
    fn test_no_markers() {
        let candidates = vec![plain(), plain(), plain()];
        assert!(filter_relevant(&candidates).is_empty());
        assert!(filter_relevant::<Mark>(&[]).is_empty());
    }

    #[test]
    fn test_single_marker_is_trailing_commit() {
        let candidates = vec![plain(), bottom(42.0), plain()];
        let keep = filter_relevant(&candidates);
        assert_eq!(keep.len(), 1);
        assert_eq!(keep[&1], RelevantPivot::bottom(42.0));
    }

    #[test]
    fn test_conflicts_keep_more_extreme() {
        // Lower top does not replace, tie replaces
        let keep = filter_relevant(&[top(10.0), top(8.0), top(10.0), bottom(1.0)]);
        assert_eq!(keep.keys().copied().collect::<Vec<_>>(), vec![2, 3]);

        // Higher bottom does not replace, lower does
        let keep = filter_relevant(&[bottom(5.0), bottom(6.0), bottom(4.0), top(20.0)]);
        assert_eq!(keep.keys().copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(keep[&2], RelevantPivot::bottom(4.0));

        // Tie on bottoms favors the newer candidate
        let keep = filter_relevant(&[bottom(5.0), bottom(5.0)]);
        assert_eq!(keep.keys().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_classification_snaps_to_exact_side() {
        // Marker nearer the high -> top anchored on the high, not on the marker
        let c = Mark {
            high: 110.0,
            low: 90.0,
            marker: Some(108.0),
        };
        assert_eq!(classify_candidate(&c), Some(RelevantPivot::top(110.0)));

        let c = Mark {
            high: 110.0,
            low: 90.0,
            marker: Some(91.0),
        };
        assert_eq!(classify_candidate(&c), Some(RelevantPivot::bottom(90.0)));

        // Equidistant goes to top
        let c = Mark {
            high: 110.0,
            low: 90.0,
            marker: Some(100.0),
        };
        assert_eq!(classify_candidate(&c), Some(RelevantPivot::top(110.0)));
    }

    #[test]
    fn test_malformed_candidate_skipped() {
        let bad = Mark {
            high: f64::NAN,
            low: 1.0,
            marker: Some(1.0),
        };
        let keep = filter_relevant(&[top(10.0), bad, bottom(2.0)]);
        assert_eq!(keep.len(), 2);
        assert!(!keep.contains_key(&1));
        assert_alternates(&keep);

        let bad_marker = Mark {
            high: 10.0,
            low: 1.0,
            marker: Some(f64::INFINITY),
        };
        assert!(classify_candidate(&bad_marker).is_none());
    }

    #[test]
    fn test_runs_over_bars_and_bricks() {
        let bars = vec![
            Bar::new(0, 100.0, 105.0, 95.0, 100.0, 1.0).with_marker(105.0),
            Bar::new(1, 100.0, 102.0, 90.0, 92.0, 1.0).with_marker(90.0),
            Bar::new(2, 92.0, 99.0, 91.0, 98.0, 1.0),
        ];
        let keep = filter_relevant(&bars);
        assert_eq!(keep[&0], RelevantPivot::top(105.0));
        assert_eq!(keep[&1], RelevantPivot::bottom(90.0));

        let refs: Vec<&Bar> = bars.iter().collect();
        assert_eq!(filter_relevant(&refs), keep);
    }

    #[test]
    fn test_long_sequence_alternates() {
        let candidates: Vec<Mark> = (0..200)
            .map(|i| {
                let wave = ((i * 37) % 23) as f64;
                if (i * 7) % 5 < 2 {
                    top(100.0 + wave)
                } else if i % 3 == 0 {
                    plain()
                } else {
                    bottom(50.0 - wave)
                }
            })
            .collect();
        let keep = filter_relevant(&candidates);
        assert!(!keep.is_empty());
        assert_alternates(&keep);

        let last_marked = candidates.iter().rposition(|c| c.marker.is_some()).unwrap();
        // The final pending slot holds either the last marker or a more extreme same-side one
        let (&last_idx, _) = keep.iter().next_back().unwrap();
        assert!(last_idx <= last_marked);
    }
}
