use serde::{Deserialize, Serialize};

use crate::config::{BaseVol, ClosePrice, HighPrice, LowPrice, OpenPrice, PriceLike};

/// One time-based input bar. Series of bars are always ordered oldest to newest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    #[serde(alias = "timestamp", alias = "time")]
    pub timestamp_ms: i64,

    #[serde(alias = "open")]
    pub open_price: OpenPrice,
    #[serde(alias = "high")]
    pub high_price: HighPrice,
    #[serde(alias = "low")]
    pub low_price: LowPrice,
    #[serde(alias = "close")]
    pub close_price: ClosePrice,

    #[serde(default)]
    pub volume: BaseVol,

    #[serde(default)]
    pub indicator1: Option<f64>,
    #[serde(default)]
    pub indicator2: Option<f64>,

    /// Raw, unfiltered candidate turning-point price.
    #[serde(default)]
    pub extrema_marker: Option<f64>,
}

impl Bar {
    pub fn new(
        timestamp_ms: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Bar {
            timestamp_ms,
            open_price: OpenPrice::new(open),
            high_price: HighPrice::new(high),
            low_price: LowPrice::new(low),
            close_price: ClosePrice::new(close),
            volume: BaseVol::new(volume),
            indicator1: None,
            indicator2: None,
            extrema_marker: None,
        }
    }

    pub fn with_indicators(mut self, indicator1: Option<f64>, indicator2: Option<f64>) -> Self {
        self.indicator1 = indicator1;
        self.indicator2 = indicator2;
        self
    }

    pub fn with_marker(mut self, marker: f64) -> Self {
        self.extrema_marker = Some(marker);
        self
    }

    /// True when every price field is a finite number.
    pub fn is_finite(&self) -> bool {
        self.open_price.is_finite()
            && self.high_price.is_finite()
            && self.low_price.is_finite()
            && self.close_price.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_field_names_and_defaults() {
        let bar: Bar = serde_json::from_str(
            r#"{"time": 5, "open": 1.5, "high": 2, "low": 1, "close": 1.75}"#,
        )
        .unwrap();
        assert_eq!(bar, Bar::new(5, 1.5, 2.0, 1.0, 1.75, 0.0));
        assert!(bar.extrema_marker.is_none());
        assert!(bar.indicator1.is_none());
    }

    #[test]
    fn test_builders_and_finiteness() {
        let bar = Bar::new(1, 10.0, 12.0, 9.0, 11.0, 3.0)
            .with_indicators(Some(10.5), None)
            .with_marker(12.0);
        assert_eq!(bar.indicator1, Some(10.5));
        assert_eq!(bar.extrema_marker, Some(12.0));
        assert!(bar.is_finite());

        assert!(!Bar::new(1, 10.0, f64::INFINITY, 9.0, 11.0, 3.0).is_finite());
    }
}
