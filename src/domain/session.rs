//! Per-instrument trading-day state.

use chrono::NaiveDate;

/// Daily counters and the open-position flag. VWAP accumulators live in the
/// indicator engine and are reset in the same step as this state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub last_reset_date: Option<NaiveDate>,
    pub trades_today: u32,
    pub position_active: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new trading day.
    pub fn reset(&mut self, today: NaiveDate) {
        self.last_reset_date = Some(today);
        self.trades_today = 0;
        self.position_active = false;
    }

    /// `None` means no daily cap.
    pub fn cap_reached(&self, max_trades_per_day: Option<u32>) -> bool {
        max_trades_per_day.is_some_and(|cap| self.trades_today >= cap)
    }

    /// Flat and under the daily cap.
    pub fn can_enter(&self, max_trades_per_day: Option<u32>) -> bool {
        !self.position_active && !self.cap_reached(max_trades_per_day)
    }

    pub(crate) fn record_submission(&mut self) {
        self.position_active = true;
        self.trades_today += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_flat() {
        let state = SessionState::new();
        assert!(state.last_reset_date.is_none());
        assert_eq!(state.trades_today, 0);
        assert!(!state.position_active);
        assert!(state.can_enter(Some(3)));
    }

    #[test]
    fn reset_clears_counters() {
        let mut state = SessionState {
            last_reset_date: NaiveDate::from_ymd_opt(2024, 3, 3),
            trades_today: 3,
            position_active: true,
        };
        let today = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        state.reset(today);
        assert_eq!(state.last_reset_date, Some(today));
        assert_eq!(state.trades_today, 0);
        assert!(!state.position_active);
    }

    #[test]
    fn cap_checks() {
        let mut state = SessionState::new();
        state.trades_today = 3;
        assert!(state.cap_reached(Some(3)));
        assert!(!state.cap_reached(Some(4)));
        assert!(!state.cap_reached(None));
        assert!(!state.can_enter(Some(3)));
        assert!(state.can_enter(None));
    }

    #[test]
    fn submission_marks_position() {
        let mut state = SessionState::new();
        state.record_submission();
        assert!(state.position_active);
        assert_eq!(state.trades_today, 1);
        assert!(!state.can_enter(None));
    }
}
