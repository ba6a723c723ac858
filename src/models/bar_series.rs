use {
    crate::{
        config::{ClosePrice, HighPrice, LowPrice, PriceLike},
        domain::Bar,
        utils::{get_max, get_min},
    },
    serde::{Deserialize, Serialize},
};

/// An ordered (oldest -> newest) bar sequence plus a revision counter.
/// The revision changes on every mutation so consumers can key caches on it.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct BarSeries {
    pub name: String,
    pub revision: u64,
    pub bars: Vec<Bar>,
}

impl BarSeries {
    pub fn from_bars(name: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            name: name.into(),
            revision: 0,
            bars,
        }
    }

    pub fn replace_bars(&mut self, bars: Vec<Bar>) {
        self.bars = bars;
        self.revision += 1;
    }

    /// Applies a live bar: same timestamp as the last bar updates it in place,
    /// a newer timestamp appends. Older bars are dropped to keep the ordering.
    /// Returns true when the series changed.
    pub fn push_or_update(&mut self, bar: Bar) -> bool {
        let Some(last) = self.bars.last_mut() else {
            self.bars.push(bar);
            self.revision += 1;
            return true;
        };

        if bar.timestamp_ms == last.timestamp_ms {
            if *last == bar {
                return false;
            }
            *last = bar;
        } else if bar.timestamp_ms > last.timestamp_ms {
            self.bars.push(bar);
        } else {
            log::warn!(
                "{}: ignoring out-of-order bar at {} (last is {})",
                self.name,
                bar.timestamp_ms,
                last.timestamp_ms
            );
            return false;
        }

        self.revision += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last_close(&self) -> Option<ClosePrice> {
        self.bars.last().map(|b| b.close_price)
    }

    /// Lowest low and highest high across the series.
    pub fn price_bounds(&self) -> Option<(LowPrice, HighPrice)> {
        if self.bars.is_empty() {
            return None;
        }
        let lows: Vec<f64> = self.bars.iter().map(|b| b.low_price.value()).collect();
        let highs: Vec<f64> = self.bars.iter().map(|b| b.high_price.value()).collect();
        Some((LowPrice::new(get_min(&lows)), HighPrice::new(get_max(&highs))))
    }

    pub fn marker_count(&self) -> usize {
        self.bars.iter().filter(|b| b.extrema_marker.is_some()).count()
    }
}
