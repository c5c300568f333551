//! Static per-instrument trading configuration.

use chrono_tz::Tz;

use super::bar_builder::VolumeMode;
use super::session_clock::SessionClock;
use super::strategy::Strategy;

#[derive(Debug, Clone, PartialEq)]
pub struct TradingConfig {
    pub symbol: String,
    pub bar_minutes: u32,
    pub volume_mode: VolumeMode,
    /// Extra bars retained beyond the longest lookback.
    pub history_margin: usize,
    pub session: SessionClock,
    pub strategy: Strategy,
}

impl TradingConfig {
    pub fn venue_tz(&self) -> Tz {
        self.session.venue_tz
    }

    pub fn history_capacity(&self) -> usize {
        self.strategy.max_lookback() + self.history_margin
    }
}

/// Feed-boundary settings used by adapters that deliver naive timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub feed_tz: Tz,
    pub dst_policy: crate::domain::timezone::DstPolicy,
}
