//! CSV feed adapter.
//!
//! Expects a header row `timestamp,open,high,low,close,volume`. Timestamps
//! are RFC 3339 or naive wall time in the configured feed zone; both come out
//! in the venue zone.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono_tz::Tz;

use crate::domain::config::FeedConfig;
use crate::domain::error::BarTraderError;
use crate::domain::ohlcv::Update;
use crate::domain::timezone::parse_feed_timestamp;
use crate::ports::feed_port::FeedPort;

pub struct CsvFeedAdapter {
    feed: FeedConfig,
    venue_tz: Tz,
}

impl CsvFeedAdapter {
    pub fn new(feed: FeedConfig, venue_tz: Tz) -> Self {
        Self { feed, venue_tz }
    }

    pub fn parse(&self, content: &str) -> Result<Vec<Update>, BarTraderError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut updates = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            // header is line 1
            let line = idx + 2;
            let record = result.map_err(|e| BarTraderError::Feed {
                reason: format!("CSV parse error on line {line}: {e}"),
            })?;

            let raw_ts = column(&record, 0, "timestamp", line)?;
            let timestamp = parse_feed_timestamp(
                raw_ts,
                self.feed.feed_tz,
                self.feed.dst_policy,
                self.venue_tz,
            )?;

            updates.push(Update {
                timestamp,
                open: number(&record, 1, "open", line)?,
                high: number(&record, 2, "high", line)?,
                low: number(&record, 3, "low", line)?,
                close: number(&record, 4, "close", line)?,
                volume: number(&record, 5, "volume", line)?,
            });
        }

        Ok(updates)
    }
}

impl FeedPort for CsvFeedAdapter {
    fn read_updates(&self, source: &Path) -> Result<Vec<Update>, BarTraderError> {
        let content = fs::read_to_string(source).map_err(|e| BarTraderError::Feed {
            reason: format!("failed to read {}: {}", source.display(), e),
        })?;
        self.parse(&content)
    }
}

fn column<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    name: &str,
    line: usize,
) -> Result<&'r str, BarTraderError> {
    record.get(idx).ok_or_else(|| BarTraderError::Feed {
        reason: format!("missing {name} column on line {line}"),
    })
}

fn number<T>(
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
    line: usize,
) -> Result<T, BarTraderError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    column(record, idx, name, line)?
        .parse()
        .map_err(|e| BarTraderError::Feed {
            reason: format!("invalid {name} value on line {line}: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::timezone::DstPolicy;
    use chrono::TimeZone;
    use chrono_tz::America::{Los_Angeles, New_York};
    use tempfile::TempDir;

    fn adapter(feed_tz: Tz) -> CsvFeedAdapter {
        CsvFeedAdapter::new(
            FeedConfig {
                feed_tz,
                dst_policy: DstPolicy::Strict,
            },
            New_York,
        )
    }

    #[test]
    fn reads_rows_in_file_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("live.csv");
        fs::write(
            &path,
            "timestamp,open,high,low,close,volume\n\
             2024-03-04T09:31:00-05:00,100.0,101.0,99.5,100.5,1200\n\
             2024-03-04T09:30:00-05:00,99.0,100.0,98.5,99.5,800\n",
        )
        .unwrap();

        let updates = adapter(New_York).read_updates(&path).unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(
            updates[0].timestamp,
            New_York.with_ymd_and_hms(2024, 3, 4, 9, 31, 0).unwrap()
        );
        assert_eq!(updates[0].open, 100.0);
        assert_eq!(updates[0].high, 101.0);
        assert_eq!(updates[0].low, 99.5);
        assert_eq!(updates[0].close, 100.5);
        assert_eq!(updates[0].volume, 1200);
        // not sorted
        assert_eq!(updates[1].close, 99.5);
    }

    #[test]
    fn naive_timestamps_use_feed_zone() {
        let updates = adapter(Los_Angeles)
            .parse("timestamp,open,high,low,close,volume\n2024-03-04 06:30:00,1,1,1,1,0\n")
            .unwrap();
        assert_eq!(
            updates[0].timestamp,
            New_York.with_ymd_and_hms(2024, 3, 4, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn bad_number_is_feed_error() {
        let err = adapter(New_York)
            .parse("timestamp,open,high,low,close,volume\n2024-03-04T09:30:00Z,x,1,1,1,0\n")
            .unwrap_err();
        match err {
            BarTraderError::Feed { reason } => assert!(reason.contains("open")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn bad_timestamp_is_timezone_error() {
        let err = adapter(New_York)
            .parse("timestamp,open,high,low,close,volume\nsoon,1,1,1,1,0\n")
            .unwrap_err();
        assert!(matches!(err, BarTraderError::Timezone { .. }));
    }

    #[test]
    fn missing_file_errors() {
        let result = adapter(New_York).read_updates(Path::new("/nonexistent/feed.csv"));
        assert!(matches!(result, Err(BarTraderError::Feed { .. })));
    }
}
