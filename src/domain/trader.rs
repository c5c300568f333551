//! Per-instrument trading engine.
//!
//! Wires the bar builder, indicator engine, session clock, signal evaluator
//! and order lifecycle manager together. One `Trader` owns all mutable state
//! for one instrument and must be driven by a single writer.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use tracing::{debug, error, info, warn};

use super::bar_builder::BarBuilder;
use super::config::TradingConfig;
use super::error::BarTraderError;
use super::indicator::IndicatorEngine;
use super::ohlcv::{Bar, Update};
use super::order::OrderGroup;
use super::order_manager::OrderLifecycleManager;
use super::session::SessionState;
use super::signal::{evaluate, SignalDecision, SignalInputs, SmaCross};
use super::strategy::SignalPolicy;
use crate::ports::clock_port::ClockPort;
use crate::ports::execution_port::ExecutionPort;

pub struct Trader<E: ExecutionPort, C: ClockPort> {
    config: TradingConfig,
    builder: BarBuilder,
    indicators: IndicatorEngine,
    state: SessionState,
    orders: OrderLifecycleManager,
    execution: E,
    clock: C,
    /// Reset time of the current trading day. Bars starting earlier belong
    /// to the previous session.
    session_start: Option<DateTime<Tz>>,
}

impl<E: ExecutionPort, C: ClockPort> Trader<E, C> {
    /// Seeds the order-id counter from `execution`.
    pub fn new(config: TradingConfig, mut execution: E, clock: C) -> Result<Self, BarTraderError> {
        let orders = OrderLifecycleManager::connect(&config.symbol, &mut execution)?;
        info!(
            symbol = %config.symbol,
            policy = %config.strategy.policy,
            bar_minutes = config.bar_minutes,
            history_capacity = config.history_capacity(),
            "trader ready"
        );
        Ok(Trader {
            builder: BarBuilder::new(config.bar_minutes, config.volume_mode),
            indicators: IndicatorEngine::new(config.history_capacity()),
            state: SessionState::new(),
            orders,
            execution,
            clock,
            config,
            session_start: None,
        })
    }

    pub fn config(&self) -> &TradingConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn indicators(&self) -> &IndicatorEngine {
        &self.indicators
    }

    pub fn builder(&self) -> &BarBuilder {
        &self.builder
    }

    pub fn execution(&self) -> &E {
        &self.execution
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn next_order_id(&self) -> i64 {
        self.orders.next_order_id()
    }

    /// Reset the trading day if the clock says it is due. Returns whether a
    /// reset happened.
    pub fn check_daily_reset(&mut self) -> bool {
        let now = self.clock.now();
        let session = &self.config.session;
        if !session.is_daily_reset_due(&now, self.state.last_reset_date) {
            return false;
        }
        let today = session.local_date(&now);
        self.state.reset(today);
        self.indicators.reset_vwap();
        self.session_start = Some(session.reset_instant(today).unwrap_or(now));
        info!(symbol = %self.config.symbol, date = %today, "daily session reset");
        true
    }

    /// Backfill. Malformed updates are logged and dropped.
    pub fn on_historical(&mut self, update: &Update) {
        if let Err(e) = self
            .builder
            .ingest_historical(update, self.indicators.history_mut())
        {
            warn!(error = %e, "discarding historical update");
        }
    }

    /// Live tick. Returns the submitted order group when the update closed a
    /// bar that produced an entry.
    ///
    /// Malformed updates are logged and dropped. An execution-boundary
    /// failure is returned after the session state has been committed.
    pub fn on_live(&mut self, update: &Update) -> Result<Option<OrderGroup>, BarTraderError> {
        self.check_daily_reset();
        let completed = match self
            .builder
            .ingest_live(update, self.indicators.history_mut())
        {
            Ok(Some(bar)) => bar,
            Ok(None) => {
                debug!(ts = %update.timestamp, close = update.close, "update folded into current bar");
                return Ok(None);
            }
            Err(e) => {
                warn!(error = %e, "discarding live update");
                return Ok(None);
            }
        };
        self.on_bar_close(&completed)
    }

    /// External exit notification: the bracket's target or stop has filled.
    pub fn on_position_closed(&mut self) {
        if !self.state.position_active {
            warn!(symbol = %self.config.symbol, "exit notification with no open position, ignored");
            return;
        }
        self.state.position_active = false;
        info!(symbol = %self.config.symbol, "position closed");
    }

    fn on_bar_close(&mut self, bar: &Bar) -> Result<Option<OrderGroup>, BarTraderError> {
        if self.session_start.is_some_and(|start| bar.start_time < start) {
            // kept in history for the moving averages only
            info!(
                symbol = %self.config.symbol,
                start = %bar.start_time,
                "bar predates the daily reset, not evaluated"
            );
            return Ok(None);
        }
        let strategy = &self.config.strategy;
        let vwap = self.indicators.update_vwap(bar);
        let sma = self.indicators.moving_average(strategy.sma_period);
        let avg_volume = match &strategy.policy {
            SignalPolicy::MeanReversionToVwap { volume_window, .. } => {
                self.indicators.average_volume(*volume_window)
            }
            _ => None,
        };
        let cross = match &strategy.policy {
            SignalPolicy::SmaCrossover {
                short_period,
                long_period,
            } => self.sma_cross(*short_period, *long_period),
            _ => None,
        };
        let close_time = bar.start_time + Duration::minutes(i64::from(self.config.bar_minutes));
        let in_blackout = self.config.session.is_blackout(&close_time);

        info!(
            symbol = %self.config.symbol,
            start = %bar.start_time,
            open = bar.open,
            high = bar.high,
            low = bar.low,
            close = bar.close,
            volume = bar.volume,
            vwap,
            sma = ?sma,
            "bar closed"
        );

        let inputs = SignalInputs {
            bar,
            prev_bar: self.indicators.history().previous(),
            sma,
            vwap,
            avg_volume,
            in_blackout,
            cross,
        };
        let SignalDecision::EnterLong(entry) = evaluate(&inputs, &self.state, strategy) else {
            return Ok(None);
        };

        match self.orders.submit(
            &entry,
            &mut self.state,
            strategy.max_trades_per_day,
            &mut self.execution,
        ) {
            Ok(group) => Ok(Some(group)),
            Err(e @ BarTraderError::InvariantViolation { .. }) => {
                error!(error = %e, "refusing order submission");
                debug_assert!(false, "{e}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn sma_cross(&self, short_period: usize, long_period: usize) -> Option<SmaCross> {
        Some(SmaCross {
            short: self.indicators.moving_average(short_period)?,
            long: self.indicators.moving_average(long_period)?,
            prev_short: self.indicators.moving_average_prior(short_period)?,
            prev_long: self.indicators.moving_average_prior(long_period)?,
        })
    }
}
