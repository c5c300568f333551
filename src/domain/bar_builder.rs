//! Live bar aggregation.
//!
//! Live updates are folded into one in-progress bar until a whole bar duration
//! has elapsed since the period anchor; the bar is then finalized into the
//! history and a new one is seeded by the update that crossed the boundary.
//! Historical updates bypass aggregation and go straight into the history.

use chrono::{DateTime, Duration, Timelike};
use chrono_tz::Tz;
use tracing::debug;

use super::error::BarTraderError;
use super::history::BarHistory;
use super::ohlcv::{Bar, Update};
use super::session_clock::{elapsed_minutes, is_bar_boundary};

/// How an update's volume relates to the bar it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeMode {
    /// Each update reports the bar's volume so far; keep the latest.
    Last,
    /// Each update reports only its own volume; sum them.
    Accumulate,
}

#[derive(Debug, Clone)]
pub struct BarBuilder {
    duration_minutes: u32,
    volume_mode: VolumeMode,
    period_start: Option<DateTime<Tz>>,
    current: Option<Bar>,
    last_update: Option<DateTime<Tz>>,
}

/// Floor `ts` to the start of its bar, counting whole bar durations from
/// local midnight.
pub fn period_anchor(ts: &DateTime<Tz>, duration_minutes: u32) -> DateTime<Tz> {
    let minute_of_day = ts.hour() * 60 + ts.minute();
    let into_period = minute_of_day % duration_minutes.max(1);
    *ts - Duration::minutes(i64::from(into_period))
        - Duration::seconds(i64::from(ts.second()))
        - Duration::nanoseconds(i64::from(ts.nanosecond()))
}

impl BarBuilder {
    pub fn new(duration_minutes: u32, volume_mode: VolumeMode) -> Self {
        BarBuilder {
            duration_minutes: duration_minutes.max(1),
            volume_mode,
            period_start: None,
            current: None,
            last_update: None,
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn period_start(&self) -> Option<&DateTime<Tz>> {
        self.period_start.as_ref()
    }

    /// The bar still being built, if any live update has arrived.
    pub fn current(&self) -> Option<&Bar> {
        self.current.as_ref()
    }

    /// Backfill path: the update already describes a completed bar.
    pub fn ingest_historical(
        &mut self,
        update: &Update,
        history: &mut BarHistory,
    ) -> Result<(), BarTraderError> {
        update.validate()?;
        history.push(Bar::from_update(update));
        Ok(())
    }

    /// Live path. Returns the finalized bar when `update` crosses a boundary.
    pub fn ingest_live(
        &mut self,
        update: &Update,
        history: &mut BarHistory,
    ) -> Result<Option<Bar>, BarTraderError> {
        update.validate()?;
        if let Some(last) = self.last_update {
            if update.timestamp < last {
                return Err(update.malformed("timestamp precedes the previous live update"));
            }
        }
        self.last_update = Some(update.timestamp);

        let (anchor, current) = match (self.period_start, self.current.as_mut()) {
            (Some(anchor), Some(current)) => (anchor, current),
            _ => {
                let anchor = period_anchor(&update.timestamp, self.duration_minutes);
                debug!(start = %anchor, "first live update seeds bar period");
                self.period_start = Some(anchor);
                self.current = Some(Bar::seeded(anchor, update));
                return Ok(None);
            }
        };

        if !is_bar_boundary(&update.timestamp, &anchor, self.duration_minutes) {
            current.high = current.high.max(update.high);
            current.low = current.low.min(update.low);
            current.close = update.close;
            match self.volume_mode {
                VolumeMode::Last => current.volume = update.volume,
                VolumeMode::Accumulate => current.volume += update.volume,
            }
            return Ok(None);
        }

        let elapsed = elapsed_minutes(&update.timestamp, &anchor);
        let duration = i64::from(self.duration_minutes);
        let next_anchor = anchor + Duration::minutes(elapsed / duration * duration);
        let completed = current.clone();
        self.period_start = Some(next_anchor);
        self.current = Some(Bar::seeded(next_anchor, update));
        history.push(completed.clone());
        Ok(Some(completed))
    }
}
