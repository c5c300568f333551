//! Indicator engine: owns the completed-bar history and the session VWAP.
//!
//! - `sma`: moving averages and average volume over the history
//! - `vwap`: the cumulative intraday VWAP accumulator
//!
//! Indicators that need more history than is available return `None`; callers
//! treat that as "no signal", never as an error.

pub mod sma;
pub mod vwap;

use crate::domain::history::BarHistory;
use crate::domain::ohlcv::Bar;

use vwap::VwapAccumulator;

#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    history: BarHistory,
    vwap: VwapAccumulator,
}

impl IndicatorEngine {
    pub fn new(history_capacity: usize) -> Self {
        IndicatorEngine {
            history: BarHistory::with_capacity(history_capacity),
            vwap: VwapAccumulator::new(),
        }
    }

    pub fn history(&self) -> &BarHistory {
        &self.history
    }

    /// Mutable access for the bar builder, the only other writer.
    pub fn history_mut(&mut self) -> &mut BarHistory {
        &mut self.history
    }

    /// SMA of the last `period` closes.
    pub fn moving_average(&self, period: usize) -> Option<f64> {
        sma::sma_at(&self.history, period, 0)
    }

    /// SMA of `period` closes as of the bar before the newest one.
    pub fn moving_average_prior(&self, period: usize) -> Option<f64> {
        sma::sma_at(&self.history, period, 1)
    }

    pub fn average_volume(&self, window: usize) -> Option<f64> {
        sma::average_volume(&self.history, window)
    }

    pub fn update_vwap(&mut self, bar: &Bar) -> f64 {
        self.vwap.update(bar)
    }

    pub fn vwap(&self) -> f64 {
        self.vwap.value()
    }

    pub fn vwap_state(&self) -> &VwapAccumulator {
        &self.vwap
    }

    /// Called only from the daily session reset.
    pub fn reset_vwap(&mut self) {
        self.vwap.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use chrono_tz::America::New_York;
    use proptest::prelude::*;

    fn bar(i: usize, close: f64, volume: i64) -> Bar {
        let start = New_York.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();
        Bar {
            start_time: start + Duration::minutes(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume,
        }
    }

    #[test]
    fn moving_average_tracks_history() {
        let mut engine = IndicatorEngine::new(10);
        for (i, c) in [1.0, 2.0, 3.0, 4.0].iter().enumerate() {
            engine.history_mut().push(bar(i, *c, 10));
        }
        assert_eq!(engine.moving_average(2), Some(3.5));
        assert_eq!(engine.moving_average_prior(2), Some(2.5));
        assert_eq!(engine.moving_average(5), None);
    }

    #[test]
    fn vwap_survives_history_pushes() {
        let mut engine = IndicatorEngine::new(10);
        let b = bar(0, 10.0, 100);
        engine.history_mut().push(b.clone());
        engine.update_vwap(&b);
        engine.history_mut().push(bar(1, 50.0, 100));
        assert!((engine.vwap() - 10.0).abs() < 1e-12);
        engine.reset_vwap();
        assert_eq!(engine.vwap_state().cumulative_volume, 0);
    }

    proptest! {
        #[test]
        fn sma_is_mean_of_last_n(
            closes in prop::collection::vec(1.0f64..1000.0, 0..40),
            period in 1usize..20,
        ) {
            let mut engine = IndicatorEngine::new(64);
            for (i, c) in closes.iter().enumerate() {
                engine.history_mut().push(bar(i, *c, 1));
            }
            let sma = engine.moving_average(period);
            if closes.len() < period {
                prop_assert!(sma.is_none());
            } else {
                let tail = &closes[closes.len() - period..];
                let expected = tail.iter().sum::<f64>() / period as f64;
                prop_assert!((sma.unwrap() - expected).abs() < 1e-9);
            }
        }

        #[test]
        fn vwap_accumulates_monotonically(
            bars in prop::collection::vec((1.0f64..500.0, 0i64..100_000), 1..40),
        ) {
            let mut engine = IndicatorEngine::new(8);
            let mut prev = VwapAccumulator::default();
            for (i, (close, volume)) in bars.iter().enumerate() {
                engine.update_vwap(&bar(i, *close, *volume));
                let state = engine.vwap_state().clone();
                prop_assert!(state.cumulative_price_volume >= prev.cumulative_price_volume);
                prop_assert!(state.cumulative_volume >= prev.cumulative_volume);
                prev = state;
            }
            engine.reset_vwap();
            prop_assert_eq!(engine.vwap_state().cumulative_price_volume, 0.0);
            prop_assert_eq!(engine.vwap_state().cumulative_volume, 0);
        }
    }
}
