//! Configuration validation.
//!
//! Turns raw INI values behind a [`ConfigPort`] into a typed [`TradingConfig`],
//! rejecting anything the engine could not run with. Keys that are absent fall
//! back to defaults; keys that are present but unparsable are errors, never
//! silently defaulted.

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveTime;
use chrono_tz::Tz;

use crate::domain::bar_builder::VolumeMode;
use crate::domain::config::{FeedConfig, TradingConfig};
use crate::domain::error::BarTraderError;
use crate::domain::session_clock::SessionClock;
use crate::domain::strategy::{
    SignalPolicy, SizingTier, SizingTiers, StopRule, Strategy, TargetReference, TargetRule,
};
use crate::domain::timezone::{parse_tz, DstPolicy};
use crate::ports::config_port::ConfigPort;

const DEFAULT_TIMEZONE: &str = "America/New_York";
const DEFAULT_SESSION_OPEN: &str = "09:30";
const DEFAULT_MEAN_REVERSION_CAP: u32 = 3;

/// Check every section. Used by `bartrader validate`.
pub fn validate_config(config: &dyn ConfigPort) -> Result<(), BarTraderError> {
    let trading = build_trading_config(config)?;
    build_feed_config(config, trading.venue_tz())?;
    first_order_id(config)?;
    Ok(())
}

pub fn build_trading_config(config: &dyn ConfigPort) -> Result<TradingConfig, BarTraderError> {
    let symbol = required_string(config, "instrument", "symbol")?;
    let venue_tz = timezone(config, "instrument", DEFAULT_TIMEZONE)?;
    let bar_minutes: u32 = parse_or(config, "instrument", "bar_minutes", 5)?;
    if bar_minutes == 0 || bar_minutes > 24 * 60 {
        return Err(BarTraderError::config_invalid(
            "instrument",
            "bar_minutes",
            "bar_minutes must be between 1 and 1440",
        ));
    }
    let volume_mode = volume_mode(config)?;

    let session = session_clock(config, venue_tz)?;
    let strategy = strategy(config)?;
    let history_margin: usize = parse_or(config, "indicators", "history_margin", 10)?;

    Ok(TradingConfig {
        symbol,
        bar_minutes,
        volume_mode,
        history_margin,
        session,
        strategy,
    })
}

/// Feed zone defaults to the venue zone.
pub fn build_feed_config(
    config: &dyn ConfigPort,
    venue_tz: Tz,
) -> Result<FeedConfig, BarTraderError> {
    let feed_tz = match config.get_string("feed", "timezone") {
        Some(name) => parse_tz(&name)
            .map_err(|e| BarTraderError::config_invalid("feed", "timezone", e.to_string()))?,
        None => venue_tz,
    };
    let dst_policy = match config.get_string("feed", "dst_policy") {
        Some(raw) => raw
            .parse::<DstPolicy>()
            .map_err(|e| BarTraderError::config_invalid("feed", "dst_policy", e.to_string()))?,
        None => DstPolicy::Strict,
    };
    Ok(FeedConfig {
        feed_tz,
        dst_policy,
    })
}

/// Seed for the paper execution adapter's order-id counter.
pub fn first_order_id(config: &dyn ConfigPort) -> Result<i64, BarTraderError> {
    let id: i64 = parse_or(config, "execution", "first_order_id", 1)?;
    if id < 1 {
        return Err(BarTraderError::config_invalid(
            "execution",
            "first_order_id",
            "first_order_id must be at least 1",
        ));
    }
    Ok(id)
}

/// Parse `"5000:2,20000:5"` into sizing tiers.
pub fn parse_tiers(raw: &str) -> Result<Vec<SizingTier>, BarTraderError> {
    let invalid = |reason: String| BarTraderError::config_invalid("sizing", "tiers", reason);
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let (equity, quantity) = pair
                .split_once(':')
                .ok_or_else(|| invalid(format!("expected equity:quantity, got {pair}")))?;
            let min_equity: f64 = equity
                .trim()
                .parse()
                .map_err(|_| invalid(format!("bad equity threshold {equity}")))?;
            let quantity: u32 = quantity
                .trim()
                .parse()
                .map_err(|_| invalid(format!("bad quantity {quantity}")))?;
            if !min_equity.is_finite() || min_equity < 0.0 || quantity == 0 {
                return Err(invalid(format!("tier {pair} must be non-negative with quantity >= 1")));
            }
            Ok(SizingTier {
                min_equity,
                quantity,
            })
        })
        .collect()
}

fn session_clock(config: &dyn ConfigPort, venue_tz: Tz) -> Result<SessionClock, BarTraderError> {
    let session_open = time_of_day(config, "session", "session_open", DEFAULT_SESSION_OPEN)?;
    let reset_default = session_open.format("%H:%M").to_string();
    let reset_time = time_of_day(config, "session", "reset_time", &reset_default)?;
    let blackout_minutes: u32 = parse_or(config, "session", "blackout_minutes", 15)?;
    if blackout_minutes >= 24 * 60 {
        return Err(BarTraderError::config_invalid(
            "session",
            "blackout_minutes",
            "blackout_minutes must be shorter than a day",
        ));
    }
    Ok(SessionClock::new(
        venue_tz,
        reset_time,
        session_open,
        blackout_minutes,
    ))
}

fn strategy(config: &dyn ConfigPort) -> Result<Strategy, BarTraderError> {
    let sma_period: usize = parse_or(config, "indicators", "sma_period", 50)?;
    if sma_period == 0 {
        return Err(BarTraderError::config_invalid(
            "indicators",
            "sma_period",
            "sma_period must be at least 1",
        ));
    }

    let policy = policy(config)?;
    let (default_cap, default_target, default_stop) = match policy {
        SignalPolicy::MeanReversionToVwap { .. } => (
            Some(DEFAULT_MEAN_REVERSION_CAP),
            TargetRule {
                reference: TargetReference::Vwap,
                pct: 1.0,
            },
            StopRule::TrailingPct(2.0),
        ),
        _ => (
            None,
            TargetRule {
                reference: TargetReference::Entry,
                pct: 2.0,
            },
            StopRule::FixedPct(1.0),
        ),
    };

    let max_trades_per_day = match config.get_string("strategy", "max_trades_per_day") {
        None => default_cap,
        Some(raw) if raw.trim().eq_ignore_ascii_case("none") => None,
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(cap) if cap >= 1 => Some(cap),
            _ => {
                return Err(BarTraderError::config_invalid(
                    "strategy",
                    "max_trades_per_day",
                    "max_trades_per_day must be a positive integer or none",
                ))
            }
        },
    };
    // mean reversion is always capped
    if max_trades_per_day.is_none() && matches!(policy, SignalPolicy::MeanReversionToVwap { .. }) {
        return Err(BarTraderError::config_invalid(
            "strategy",
            "max_trades_per_day",
            "mean_reversion requires a daily trade cap",
        ));
    }

    let target = target_rule(config, default_target)?;
    let stop = stop_rule(config, default_stop)?;

    let account_equity: f64 = parse_or(config, "sizing", "account_equity", 1000.0)?;
    if !account_equity.is_finite() || account_equity < 0.0 {
        return Err(BarTraderError::config_invalid(
            "sizing",
            "account_equity",
            "account_equity must be non-negative",
        ));
    }
    let sizing = sizing(config)?;

    Ok(Strategy {
        policy,
        sma_period,
        max_trades_per_day,
        account_equity,
        sizing,
        target,
        stop,
    })
}

fn policy(config: &dyn ConfigPort) -> Result<SignalPolicy, BarTraderError> {
    let name = config
        .get_string("strategy", "policy")
        .unwrap_or_else(|| "breakout".to_string());
    match name.trim().to_lowercase().as_str() {
        "breakout" => Ok(SignalPolicy::BreakoutAboveSma),
        "mean_reversion" => {
            let discount_pct: f64 = parse_or(config, "strategy", "vwap_discount_pct", 1.0)?;
            if !(0.0..100.0).contains(&discount_pct) {
                return Err(BarTraderError::config_invalid(
                    "strategy",
                    "vwap_discount_pct",
                    "vwap_discount_pct must be in [0, 100)",
                ));
            }
            let volume_window: usize = parse_or(config, "indicators", "volume_window", 10)?;
            if volume_window == 0 {
                return Err(BarTraderError::config_invalid(
                    "indicators",
                    "volume_window",
                    "volume_window must be at least 1",
                ));
            }
            let min_avg_volume: f64 = parse_or(config, "strategy", "min_avg_volume", 10_000.0)?;
            if !min_avg_volume.is_finite() || min_avg_volume < 0.0 {
                return Err(BarTraderError::config_invalid(
                    "strategy",
                    "min_avg_volume",
                    "min_avg_volume must be non-negative",
                ));
            }
            Ok(SignalPolicy::MeanReversionToVwap {
                discount_pct,
                volume_window,
                min_avg_volume,
            })
        }
        "sma_crossover" => {
            let short_period: usize = parse_or(config, "strategy", "short_sma", 10)?;
            let long_period: usize = parse_or(config, "strategy", "long_sma", 50)?;
            if short_period == 0 || short_period >= long_period {
                return Err(BarTraderError::config_invalid(
                    "strategy",
                    "short_sma",
                    "short_sma must be at least 1 and below long_sma",
                ));
            }
            Ok(SignalPolicy::SmaCrossover {
                short_period,
                long_period,
            })
        }
        other => Err(BarTraderError::config_invalid(
            "strategy",
            "policy",
            format!("unknown policy {other}, expected breakout, mean_reversion or sma_crossover"),
        )),
    }
}

fn target_rule(config: &dyn ConfigPort, default: TargetRule) -> Result<TargetRule, BarTraderError> {
    let reference = match config.get_string("strategy", "target") {
        None => default.reference,
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "entry" => TargetReference::Entry,
            "vwap" => TargetReference::Vwap,
            other => {
                return Err(BarTraderError::config_invalid(
                    "strategy",
                    "target",
                    format!("unknown target reference {other}"),
                ))
            }
        },
    };
    let pct: f64 = parse_or(config, "strategy", "target_pct", default.pct)?;
    if !pct.is_finite() || pct <= 0.0 {
        return Err(BarTraderError::config_invalid(
            "strategy",
            "target_pct",
            "target_pct must be positive",
        ));
    }
    Ok(TargetRule { reference, pct })
}

fn stop_rule(config: &dyn ConfigPort, default: StopRule) -> Result<StopRule, BarTraderError> {
    let (default_trailing, default_pct) = match default {
        StopRule::FixedPct(pct) => (false, pct),
        StopRule::TrailingPct(pct) => (true, pct),
    };
    let trailing = match config.get_string("strategy", "stop") {
        None => default_trailing,
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "fixed" => false,
            "trailing" => true,
            other => {
                return Err(BarTraderError::config_invalid(
                    "strategy",
                    "stop",
                    format!("unknown stop kind {other}"),
                ))
            }
        },
    };
    let pct: f64 = parse_or(config, "strategy", "stop_pct", default_pct)?;
    if !pct.is_finite() || pct <= 0.0 || pct >= 100.0 {
        return Err(BarTraderError::config_invalid(
            "strategy",
            "stop_pct",
            "stop_pct must be in (0, 100)",
        ));
    }
    Ok(if trailing {
        StopRule::TrailingPct(pct)
    } else {
        StopRule::FixedPct(pct)
    })
}

fn sizing(config: &dyn ConfigPort) -> Result<SizingTiers, BarTraderError> {
    let defaults = SizingTiers::default();
    let base_quantity: u32 = parse_or(config, "sizing", "base_quantity", defaults.base_quantity)?;
    if base_quantity == 0 {
        return Err(BarTraderError::config_invalid(
            "sizing",
            "base_quantity",
            "base_quantity must be at least 1",
        ));
    }
    let tiers = match config.get_string("sizing", "tiers") {
        Some(raw) => parse_tiers(&raw)?,
        None => defaults.tiers,
    };
    Ok(SizingTiers {
        base_quantity,
        tiers,
    })
}

fn volume_mode(config: &dyn ConfigPort) -> Result<VolumeMode, BarTraderError> {
    match config.get_string("instrument", "volume_mode") {
        None => Ok(VolumeMode::Last),
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "last" => Ok(VolumeMode::Last),
            "accumulate" => Ok(VolumeMode::Accumulate),
            other => Err(BarTraderError::config_invalid(
                "instrument",
                "volume_mode",
                format!("unknown volume mode {other}, expected last or accumulate"),
            )),
        },
    }
}

fn timezone(config: &dyn ConfigPort, section: &str, default: &str) -> Result<Tz, BarTraderError> {
    let name = config
        .get_string(section, "timezone")
        .unwrap_or_else(|| default.to_string());
    parse_tz(&name).map_err(|e| BarTraderError::config_invalid(section, "timezone", e.to_string()))
}

fn time_of_day(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: &str,
) -> Result<NaiveTime, BarTraderError> {
    let raw = config
        .get_string(section, key)
        .unwrap_or_else(|| default.to_string());
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| BarTraderError::config_invalid(section, key, "expected HH:MM"))
}

fn required_string(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, BarTraderError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(BarTraderError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn parse_or<T>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: T,
) -> Result<T, BarTraderError>
where
    T: FromStr,
    T::Err: Display,
{
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| BarTraderError::config_invalid(section, key, e.to_string())),
    }
}
