#![allow(dead_code)]

use bartrader::domain::bar_builder::VolumeMode;
use bartrader::domain::config::TradingConfig;
use bartrader::domain::error::BarTraderError;
pub use bartrader::domain::ohlcv::Update;
use bartrader::domain::order::OrderGroup;
use bartrader::domain::session_clock::SessionClock;
use bartrader::domain::strategy::{
    SignalPolicy, SizingTiers, StopRule, Strategy, TargetReference, TargetRule,
};
use bartrader::ports::execution_port::ExecutionPort;
use chrono::{DateTime, NaiveTime, TimeZone};
use chrono_tz::America::New_York;
use chrono_tz::Tz;

pub struct MockExecutionPort {
    pub next_id: i64,
    pub submitted: Vec<OrderGroup>,
    pub fail_with: Option<String>,
}

impl MockExecutionPort {
    pub fn new(next_id: i64) -> Self {
        Self {
            next_id,
            submitted: Vec::new(),
            fail_with: None,
        }
    }

    pub fn failing(mut self, reason: &str) -> Self {
        self.fail_with = Some(reason.to_string());
        self
    }
}

impl ExecutionPort for MockExecutionPort {
    fn next_order_id(&mut self) -> Result<i64, BarTraderError> {
        Ok(self.next_id)
    }

    fn submit_order_group(&mut self, group: &OrderGroup) -> Result<(), BarTraderError> {
        self.submitted.push(group.clone());
        match &self.fail_with {
            Some(reason) => Err(BarTraderError::Feed {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// New York wall time on 2024-03-04 (a Monday).
pub fn ny(h: u32, m: u32) -> DateTime<Tz> {
    New_York.with_ymd_and_hms(2024, 3, 4, h, m, 0).unwrap()
}

pub fn ny_on(day: u32, h: u32, m: u32) -> DateTime<Tz> {
    New_York.with_ymd_and_hms(2024, 3, day, h, m, 0).unwrap()
}

pub fn make_update(ts: DateTime<Tz>, close: f64, volume: i64) -> Update {
    Update {
        timestamp: ts,
        open: close,
        high: close,
        low: close,
        close,
        volume,
    }
}

pub fn make_ohlc(
    ts: DateTime<Tz>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
) -> Update {
    Update {
        timestamp: ts,
        open,
        high,
        low,
        close,
        volume,
    }
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn breakout_config(sma_period: usize) -> TradingConfig {
    TradingConfig {
        symbol: "SPY".into(),
        bar_minutes: 5,
        volume_mode: VolumeMode::Last,
        history_margin: 5,
        session: SessionClock::new(New_York, hm(9, 30), hm(9, 30), 15),
        strategy: Strategy {
            policy: SignalPolicy::BreakoutAboveSma,
            sma_period,
            max_trades_per_day: None,
            account_equity: 1000.0,
            sizing: SizingTiers::default(),
            target: TargetRule {
                reference: TargetReference::Entry,
                pct: 2.0,
            },
            stop: StopRule::FixedPct(1.0),
        },
    }
}

pub fn mean_reversion_config(sma_period: usize, cap: u32) -> TradingConfig {
    TradingConfig {
        symbol: "SPY".into(),
        bar_minutes: 1,
        volume_mode: VolumeMode::Last,
        history_margin: 5,
        session: SessionClock::new(New_York, hm(9, 30), hm(9, 30), 15),
        strategy: Strategy {
            policy: SignalPolicy::MeanReversionToVwap {
                discount_pct: 1.0,
                volume_window: 3,
                min_avg_volume: 10_000.0,
            },
            sma_period,
            max_trades_per_day: Some(cap),
            account_equity: 6000.0,
            sizing: SizingTiers::default(),
            target: TargetRule {
                reference: TargetReference::Vwap,
                pct: 1.0,
            },
            stop: StopRule::TrailingPct(2.0),
        },
    }
}
