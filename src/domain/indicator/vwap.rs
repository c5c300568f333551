//! Intraday cumulative VWAP.
//!
//! VWAP = Σ(typical_price × volume) / Σ(volume), typical = (H + L + C) / 3.
//! Accumulates for the whole session; only an explicit reset clears it.

use crate::domain::ohlcv::Bar;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VwapAccumulator {
    pub cumulative_price_volume: f64,
    pub cumulative_volume: i64,
}

impl VwapAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a completed bar in and return the updated VWAP.
    pub fn update(&mut self, bar: &Bar) -> f64 {
        self.cumulative_price_volume += bar.typical_price() * bar.volume as f64;
        self.cumulative_volume += bar.volume;
        self.value()
    }

    /// Current VWAP, 0 before any volume has traded.
    pub fn value(&self) -> f64 {
        if self.cumulative_volume > 0 {
            self.cumulative_price_volume / self.cumulative_volume as f64
        } else {
            0.0
        }
    }

    pub fn reset(&mut self) {
        self.cumulative_price_volume = 0.0;
        self.cumulative_volume = 0;
    }
}
