//! Price/volume updates from the feed and the bars aggregated from them.

use chrono::DateTime;
use chrono_tz::Tz;

use super::error::BarTraderError;

/// A single observation from the market feed. Never mutated after receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub timestamp: DateTime<Tz>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl Update {
    /// Reject prices and volumes that cannot come from a real bar.
    pub fn validate(&self) -> Result<(), BarTraderError> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err(self.malformed("prices must be finite and positive"));
        }
        if self.volume < 0 {
            return Err(self.malformed("volume must be non-negative"));
        }
        if self.high < self.open.max(self.close) {
            return Err(self.malformed("high is below open/close"));
        }
        if self.low > self.open.min(self.close) {
            return Err(self.malformed("low is above open/close"));
        }
        Ok(())
    }

    pub(crate) fn malformed(&self, reason: &str) -> BarTraderError {
        BarTraderError::MalformedUpdate {
            timestamp: self.timestamp.to_rfc3339(),
            reason: reason.to_string(),
        }
    }
}

/// OHLCV aggregate over one fixed wall-clock period.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub start_time: DateTime<Tz>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl Bar {
    /// A bar opened by `update` and starting at `start_time`.
    pub fn seeded(start_time: DateTime<Tz>, update: &Update) -> Self {
        Bar {
            start_time,
            open: update.open,
            high: update.high,
            low: update.low,
            close: update.close,
            volume: update.volume,
        }
    }

    /// A historical bar is taken as-is from the feed.
    pub fn from_update(update: &Update) -> Self {
        Bar::seeded(update.timestamp, update)
    }

    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}
