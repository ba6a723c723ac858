//! Raw extrema markers for inputs that arrive without any.
//!
//! Output is noisy. Run it through the relevance filter before rendering.

use find_peaks::PeakFinder;

use crate::config::PriceLike;
use crate::domain::Bar;
use crate::utils::mean_and_stddev;

/// One optional raw marker per bar: the high at local peaks of the highs,
/// the low at local troughs of the lows. Peaks win when a bar is both.
pub fn detect_raw_markers(bars: &[Bar], min_prominence_pct: f64) -> Vec<Option<f64>> {
    let mut markers = vec![None; bars.len()];
    if bars.len() < 3 || bars.iter().any(|b| !b.is_finite()) {
        return markers;
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close_price.value()).collect();
    let (mean_close, _) = mean_and_stddev(&closes);
    let min_prominence = (mean_close.abs() * min_prominence_pct).max(f64::EPSILON);

    let highs: Vec<f64> = bars.iter().map(|b| b.high_price.value()).collect();
    let inverted_lows: Vec<f64> = bars.iter().map(|b| -b.low_price.value()).collect();

    let mut low_finder = PeakFinder::new(&inverted_lows);
    low_finder.with_min_prominence(min_prominence);
    for peak in low_finder.find_peaks() {
        let idx = peak.middle_position();
        markers[idx] = Some(bars[idx].low_price.value());
    }

    let mut high_finder = PeakFinder::new(&highs);
    high_finder.with_min_prominence(min_prominence);
    for peak in high_finder.find_peaks() {
        let idx = peak.middle_position();
        markers[idx] = Some(highs[idx]);
    }

    markers
}

/// Writes detected markers into bars that have none. Returns how many were written.
pub fn apply_markers(bars: &mut [Bar], markers: &[Option<f64>]) -> usize {
    let mut written = 0;
    for (bar, marker) in bars.iter_mut().zip(markers) {
        if bar.extrema_marker.is_none() && marker.is_some() {
            bar.extrema_marker = *marker;
            written += 1;
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bar(ts: i64, high: f64, low: f64) -> Bar {
        let mid = (high + low) / 2.0;
        Bar::new(ts, mid, high, low, mid, 1.0)
    }

    fn zigzag() -> Vec<Bar> {
        vec![
            make_bar(0, 102.0, 98.0),
            make_bar(1, 110.0, 104.0),
            make_bar(2, 120.0, 112.0), // peak
            make_bar(3, 111.0, 103.0),
            make_bar(4, 101.0, 90.0), // trough
            make_bar(5, 108.0, 99.0),
            make_bar(6, 115.0, 106.0),
        ]
    }

    #[test]
    fn test_detects_peak_and_trough() {
        let markers = detect_raw_markers(&zigzag(), 0.01);
        assert_eq!(markers.len(), 7);
        assert_eq!(markers[2], Some(120.0));
        assert_eq!(markers[4], Some(90.0));
        assert!(markers[3].is_none());
    }

    #[test]
    fn test_short_input_has_no_markers() {
        let bars = vec![make_bar(0, 10.0, 9.0), make_bar(1, 11.0, 10.0)];
        assert_eq!(detect_raw_markers(&bars, 0.01), vec![None, None]);
    }

    #[test]
    fn test_apply_keeps_existing() {
        let mut bars = zigzag();
        bars[2].extrema_marker = Some(119.0);
        let markers = detect_raw_markers(&bars, 0.01);
        let written = apply_markers(&mut bars, &markers);
        assert_eq!(written, 1);
        assert_eq!(bars[2].extrema_marker, Some(119.0));
        assert_eq!(bars[4].extrema_marker, Some(90.0));
    }
}
