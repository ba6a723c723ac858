use {
    crate::{config::PriceLike, domain::Bar, models::ChartArtifacts},
    anyhow::{Context, Result},
    serde::{Deserialize, Serialize},
    std::{
        error::Error,
        fmt,
        fs::{self, File},
        io::{BufReader, BufWriter},
        path::Path,
    },
};

/// Accepted input layouts: a bare array of bars, or a named series.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BarFile {
    Named { name: String, bars: Vec<Bar> },
    Plain(Vec<Bar>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BarValidationError {
    NonFinite { index: usize },
    OutOfOrder { index: usize, timestamp_ms: i64, previous_ms: i64 },
    HighBelowLow { index: usize },
}

impl fmt::Display for BarValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::fmt::Result {
        match self {
            BarValidationError::NonFinite { index } => {
                write!(f, "bar {} has a non-finite price", index)
            }
            BarValidationError::OutOfOrder {
                index,
                timestamp_ms,
                previous_ms,
            } => write!(
                f,
                "bar {} at {} is not after the previous bar at {}",
                index, timestamp_ms, previous_ms
            ),
            BarValidationError::HighBelowLow { index } => {
                write!(f, "bar {} has high below low", index)
            }
        }
    }
}

impl Error for BarValidationError {}

/// Checks the ingestion guarantees the algorithms rely on:
/// strictly ascending timestamps, finite prices, high >= low.
pub fn validate_bars(bars: &[Bar]) -> Result<(), BarValidationError> {
    let mut previous_ms: Option<i64> = None;
    for (index, bar) in bars.iter().enumerate() {
        if !bar.is_finite() {
            return Err(BarValidationError::NonFinite { index });
        }
        if bar.high_price < bar.low_price {
            return Err(BarValidationError::HighBelowLow { index });
        }
        if let Some(prev) = previous_ms
            && bar.timestamp_ms <= prev
        {
            return Err(BarValidationError::OutOfOrder {
                index,
                timestamp_ms: bar.timestamp_ms,
                previous_ms: prev,
            });
        }
        previous_ms = Some(bar.timestamp_ms);
    }
    Ok(())
}

/// Loads and validates a bar series from JSON. Returns (series name, bars).
/// Unnamed files take the file stem as their name.
pub fn load_bars_json(path: &Path) -> Result<(String, Vec<Bar>)> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let reader = BufReader::new(file);

    let parsed: BarFile = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse bars from: {:?}", path))?;

    let (name, bars) = match parsed {
        BarFile::Named { name, bars } => (name, bars),
        BarFile::Plain(bars) => {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "bars".to_string());
            (stem, bars)
        }
    };

    validate_bars(&bars).with_context(|| format!("Invalid bar data in {:?}", path))?;

    let markers = bars.iter().filter(|b| b.extrema_marker.is_some()).count();
    log::info!(
        "Loaded {} bars ({} with markers) for {} from {:?}",
        bars.len(),
        markers,
        name,
        path
    );
    if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
        log::debug!(
            "{}: first close {}, last close {}",
            name,
            first.close_price.format_price(),
            last.close_price.format_price()
        );
    }

    Ok((name, bars))
}

// Helper function to create a new file and any missing parent directories.
fn create_file_with_parents(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))
}

#[derive(Serialize)]
struct ArtifactExport<'a> {
    series: &'a str,
    #[serde(flatten)]
    artifacts: &'a ChartArtifacts,
}

/// Writes artifacts as pretty JSON for an external renderer.
pub fn export_artifacts_json(path: &Path, series: &str, artifacts: &ChartArtifacts) -> Result<()> {
    let file = create_file_with_parents(path)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, &ArtifactExport { series, artifacts })
        .with_context(|| format!("Failed to write artifacts to: {}", path.display()))?;

    log::info!("Exported {} bricks to {}", artifacts.bricks.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_bars() {
        let good = vec![
            Bar::new(1, 10.0, 11.0, 9.0, 10.5, 1.0),
            Bar::new(2, 10.5, 12.0, 10.0, 11.0, 1.0),
        ];
        assert!(validate_bars(&good).is_ok());
        assert!(validate_bars(&[]).is_ok());

        let unordered = vec![good[1].clone(), good[0].clone()];
        assert_eq!(
            validate_bars(&unordered),
            Err(BarValidationError::OutOfOrder {
                index: 1,
                timestamp_ms: 1,
                previous_ms: 2
            })
        );

        let inverted = vec![Bar::new(1, 10.0, 9.0, 11.0, 10.0, 1.0)];
        assert_eq!(
            validate_bars(&inverted),
            Err(BarValidationError::HighBelowLow { index: 0 })
        );

        let nan = vec![Bar::new(1, 10.0, 11.0, 9.0, f64::NAN, 1.0)];
        assert_eq!(
            validate_bars(&nan),
            Err(BarValidationError::NonFinite { index: 0 })
        );
    }
}
