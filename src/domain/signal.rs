//! Entry-signal evaluation on a completed bar.
//!
//! Pure function of the latest bars, indicator values, session state and
//! strategy. Missing indicators mean "no signal".

use tracing::{debug, info};

use super::ohlcv::Bar;
use super::session::SessionState;
use super::strategy::{SignalPolicy, StopSpec, Strategy};

/// Short and long SMA on the completed bar and the bar before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmaCross {
    pub short: f64,
    pub long: f64,
    pub prev_short: f64,
    pub prev_long: f64,
}

impl SmaCross {
    pub fn crossed_above(&self) -> bool {
        self.prev_short <= self.prev_long && self.short > self.long
    }
}

/// Everything the evaluator looks at for one completed bar.
#[derive(Debug, Clone)]
pub struct SignalInputs<'a> {
    pub bar: &'a Bar,
    pub prev_bar: Option<&'a Bar>,
    pub sma: Option<f64>,
    pub vwap: f64,
    pub avg_volume: Option<f64>,
    pub in_blackout: bool,
    pub cross: Option<SmaCross>,
}

/// A long entry with its exit legs resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryOrder {
    pub quantity: u32,
    pub entry_reference: f64,
    pub target_price: f64,
    pub stop: StopSpec,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignalDecision {
    NoSignal,
    EnterLong(EntryOrder),
}

#[cfg(test)]
impl SignalDecision {
    pub fn is_entry(&self) -> bool {
        matches!(self, SignalDecision::EnterLong(_))
    }
}

pub fn evaluate(
    inputs: &SignalInputs,
    state: &SessionState,
    strategy: &Strategy,
) -> SignalDecision {
    if !state.can_enter(strategy.max_trades_per_day) {
        debug!(
            position_active = state.position_active,
            trades_today = state.trades_today,
            "position open or daily cap reached, skipping evaluation"
        );
        return SignalDecision::NoSignal;
    }

    let triggered = match &strategy.policy {
        SignalPolicy::BreakoutAboveSma => breakout_above_sma(inputs),
        SignalPolicy::MeanReversionToVwap {
            discount_pct,
            min_avg_volume,
            ..
        } => mean_reversion_to_vwap(inputs, *discount_pct, *min_avg_volume),
        SignalPolicy::SmaCrossover { .. } => inputs.cross.is_some_and(|c| c.crossed_above()),
    };
    if !triggered {
        return SignalDecision::NoSignal;
    }

    let entry = inputs.bar.close;
    let order = EntryOrder {
        quantity: strategy.quantity(),
        entry_reference: entry,
        target_price: strategy.target.price(entry, inputs.vwap),
        stop: strategy.stop.resolve(entry),
    };
    info!(
        policy = %strategy.policy,
        close = entry,
        vwap = inputs.vwap,
        sma = ?inputs.sma,
        quantity = order.quantity,
        target = order.target_price,
        "buy signal"
    );
    SignalDecision::EnterLong(order)
}

fn breakout_above_sma(inputs: &SignalInputs) -> bool {
    let (Some(prev), Some(sma)) = (inputs.prev_bar, inputs.sma) else {
        return false;
    };
    let bar = inputs.bar;
    bar.close > prev.high && bar.low > prev.low && bar.close > sma && prev.close < sma
}

fn mean_reversion_to_vwap(
    inputs: &SignalInputs,
    discount_pct: f64,
    min_avg_volume: f64,
) -> bool {
    let Some(sma) = inputs.sma else {
        return false;
    };
    if inputs.in_blackout {
        info!("skipping trade: inside post-open blackout");
        return false;
    }
    // an unavailable average counts as illiquid
    let avg_volume = inputs.avg_volume.unwrap_or(0.0);
    if avg_volume < min_avg_volume {
        info!(avg_volume, min_avg_volume, "skipping trade: average volume too low");
        return false;
    }
    let close = inputs.bar.close;
    inputs.vwap > 0.0 && close < inputs.vwap * (1.0 - discount_pct / 100.0) && close > sma
}
