use chrono::DateTime;

pub type AppInstant = web_time::Instant;

pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

// Time Helper functions

/// Used for display purposes. Out-of-range timestamps fall back to the raw number.
pub fn epoch_ms_to_utc(epoch_ms: i64) -> String {
    match DateTime::from_timestamp_millis(epoch_ms) {
        Some(dt) => format!("{}", dt.format(STANDARD_TIME_FORMAT)),
        None => epoch_ms.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_ms_to_utc() {
        assert_eq!(epoch_ms_to_utc(0), "1970-01-01 00:00");
        assert_eq!(epoch_ms_to_utc(86_400_000 + 90_000), "1970-01-02 00:01");
        assert_eq!(epoch_ms_to_utc(i64::MAX), i64::MAX.to_string());
    }
}
