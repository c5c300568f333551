//! Time zone conversion at the feed boundary.
//!
//! Feeds deliver either RFC-3339 timestamps with an explicit offset or naive
//! local timestamps in a known zone. Both are turned into venue-zone
//! `DateTime<Tz>` here; nothing past this module handles naive times.
//!
//! Naive local times can be ambiguous ("fall back", the wall time occurs
//! twice) or nonexistent ("spring forward", the wall time is skipped). A
//! [`DstPolicy`] decides how those resolve.

use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use super::error::BarTraderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DstPolicy {
    /// Error on ambiguous or nonexistent local times.
    Strict,
    /// Ambiguous: take the earlier instant.
    PreferEarliest,
    /// Ambiguous: take the later instant.
    PreferLatest,
    /// Nonexistent: step forward a minute at a time (at most two hours).
    ShiftForward,
}

impl FromStr for DstPolicy {
    type Err = BarTraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(DstPolicy::Strict),
            "earliest" | "prefer_earliest" => Ok(DstPolicy::PreferEarliest),
            "latest" | "prefer_latest" => Ok(DstPolicy::PreferLatest),
            "shift_forward" => Ok(DstPolicy::ShiftForward),
            other => Err(BarTraderError::Timezone {
                reason: format!("unknown dst policy: {other}"),
            }),
        }
    }
}

pub fn parse_tz(name: &str) -> Result<Tz, BarTraderError> {
    name.trim().parse::<Tz>().map_err(|e| BarTraderError::Timezone {
        reason: format!("bad tz {name}: {e}"),
    })
}

/// RFC-3339 with offset, re-expressed in `venue`.
pub fn parse_rfc3339_in(s: &str, venue: Tz) -> Result<DateTime<Tz>, BarTraderError> {
    let dt = DateTime::parse_from_rfc3339(s.trim()).map_err(|e| BarTraderError::Timezone {
        reason: format!("bad rfc3339 {s}: {e}"),
    })?;
    Ok(dt.with_timezone(&venue))
}

/// Interpret `naive` as wall time in `feed_tz`, resolving DST edges with
/// `policy`.
pub fn from_local_naive(
    naive: NaiveDateTime,
    feed_tz: Tz,
    policy: DstPolicy,
) -> Result<DateTime<Tz>, BarTraderError> {
    use chrono::offset::LocalResult::*;
    match feed_tz.from_local_datetime(&naive) {
        Single(dt) => Ok(dt),
        Ambiguous(a, b) => match policy {
            DstPolicy::PreferEarliest => Ok(a),
            DstPolicy::PreferLatest => Ok(b),
            _ => Err(BarTraderError::Timezone {
                reason: format!("ambiguous local time {naive} in {feed_tz}"),
            }),
        },
        None => match policy {
            DstPolicy::ShiftForward => {
                let mut t = naive;
                for _ in 0..120 {
                    t += Duration::minutes(1);
                    if let Single(dt) = feed_tz.from_local_datetime(&t) {
                        return Ok(dt);
                    }
                }
                Err(BarTraderError::Timezone {
                    reason: format!("nonexistent local time {naive} in {feed_tz}"),
                })
            }
            _ => Err(BarTraderError::Timezone {
                reason: format!("nonexistent local time {naive} in {feed_tz}"),
            }),
        },
    }
}

/// Parse a feed timestamp: RFC-3339 when it carries an offset, otherwise a
/// naive `YYYY-MM-DD HH:MM:SS` or `YYYYMMDD HH:MM:SS` wall time in `feed_tz`.
pub fn parse_feed_timestamp(
    s: &str,
    feed_tz: Tz,
    policy: DstPolicy,
    venue: Tz,
) -> Result<DateTime<Tz>, BarTraderError> {
    if let Ok(dt) = parse_rfc3339_in(s, venue) {
        return Ok(dt);
    }
    let s = s.trim();
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y%m%d %H:%M:%S"))
        .map_err(|e| BarTraderError::Timezone {
            reason: format!("unrecognised timestamp {s}: {e}"),
        })?;
    Ok(from_local_naive(naive, feed_tz, policy)?.with_timezone(&venue))
}
