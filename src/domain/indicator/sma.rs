//! Simple moving average and average volume over the bar history.
//!
//! SMA(n) = (C[i-n+1] + ... + C[i]) / n
//! Unavailable until n bars have completed.

use crate::domain::history::BarHistory;

/// Mean close of the `period` bars ending `offset` bars before the newest.
pub fn sma_at(history: &BarHistory, period: usize, offset: usize) -> Option<f64> {
    if period == 0 {
        return None;
    }
    let sum: f64 = history.window(period, offset)?.map(|b| b.close).sum();
    Some(sum / period as f64)
}

/// Mean volume of the newest `window` bars.
pub fn average_volume(history: &BarHistory, window: usize) -> Option<f64> {
    if window == 0 {
        return None;
    }
    let total: i64 = history.window(window, 0)?.map(|b| b.volume).sum();
    Some(total as f64 / window as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::Bar;
    use chrono::{Duration, TimeZone};
    use chrono_tz::America::New_York;

    fn make_history(prices: &[f64]) -> BarHistory {
        let start = New_York.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();
        let mut history = BarHistory::with_capacity(64);
        for (i, &close) in prices.iter().enumerate() {
            history.push(Bar {
                start_time: start + Duration::minutes(5 * i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000 * (i as i64 + 1),
            });
        }
        history
    }

    #[test]
    fn sma_warmup() {
        let history = make_history(&[10.0, 20.0]);
        assert!(sma_at(&history, 3, 0).is_none());
    }

    #[test]
    fn sma_period_1() {
        let history = make_history(&[10.0, 20.0, 30.0]);
        let v = sma_at(&history, 1, 0).unwrap();
        assert!((v - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sma_uses_newest_bars() {
        let history = make_history(&[10.0, 20.0, 30.0, 40.0]);
        let v = sma_at(&history, 3, 0).unwrap();
        assert!((v - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sma_prior_bar() {
        let history = make_history(&[10.0, 20.0, 30.0, 40.0]);
        let v = sma_at(&history, 3, 1).unwrap();
        assert!((v - 20.0).abs() < f64::EPSILON);
        assert!(sma_at(&history, 4, 1).is_none());
    }

    #[test]
    fn sma_period_0() {
        let history = make_history(&[10.0, 20.0]);
        assert!(sma_at(&history, 0, 0).is_none());
    }

    #[test]
    fn average_volume_window() {
        // volumes 1000, 2000, 3000, 4000
        let history = make_history(&[1.0, 2.0, 3.0, 4.0]);
        let v = average_volume(&history, 2).unwrap();
        assert!((v - 3500.0).abs() < f64::EPSILON);
        assert!(average_volume(&history, 5).is_none());
        assert!(average_volume(&history, 0).is_none());
    }
}
