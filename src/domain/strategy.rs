//! Strategy configuration: entry policy, sizing, exit-leg rules.

use std::fmt;

/// Entry condition family, chosen by configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalPolicy {
    /// Breakout candle confirming a fresh cross above the SMA.
    BreakoutAboveSma,
    /// Dip below VWAP while holding above the SMA, with liquidity and
    /// blackout filters.
    MeanReversionToVwap {
        discount_pct: f64,
        volume_window: usize,
        min_avg_volume: f64,
    },
    /// Short SMA crossing above the long SMA.
    SmaCrossover {
        short_period: usize,
        long_period: usize,
    },
}

impl fmt::Display for SignalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalPolicy::BreakoutAboveSma => write!(f, "breakout"),
            SignalPolicy::MeanReversionToVwap { discount_pct, .. } => {
                write!(f, "mean_reversion({}%)", discount_pct)
            }
            SignalPolicy::SmaCrossover {
                short_period,
                long_period,
            } => write!(f, "sma_crossover({},{})", short_period, long_period),
        }
    }
}

/// What the profit target is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetReference {
    Entry,
    Vwap,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetRule {
    pub reference: TargetReference,
    pub pct: f64,
}

impl TargetRule {
    /// reference * (1 + pct / 100)
    pub fn price(&self, entry: f64, vwap: f64) -> f64 {
        let base = match self.reference {
            TargetReference::Entry => entry,
            TargetReference::Vwap => vwap,
        };
        base * (1.0 + self.pct / 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopRule {
    /// Stop at entry * (1 - pct / 100).
    FixedPct(f64),
    /// Trailing stop at `pct` percent below the high-water mark.
    TrailingPct(f64),
}

/// Resolved stop leg for one entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopSpec {
    Fixed { price: f64 },
    Trailing { percent: f64 },
}

impl StopRule {
    pub fn resolve(&self, entry: f64) -> StopSpec {
        match *self {
            StopRule::FixedPct(pct) => StopSpec::Fixed {
                price: entry * (1.0 - pct / 100.0),
            },
            StopRule::TrailingPct(pct) => StopSpec::Trailing { percent: pct },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingTier {
    pub min_equity: f64,
    pub quantity: u32,
}

/// Position size scaled by account equity.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingTiers {
    pub base_quantity: u32,
    pub tiers: Vec<SizingTier>,
}

impl SizingTiers {
    /// Quantity of the highest tier whose threshold `equity` exceeds.
    pub fn quantity_for(&self, equity: f64) -> u32 {
        self.tiers
            .iter()
            .filter(|t| equity > t.min_equity)
            .max_by(|a, b| a.min_equity.total_cmp(&b.min_equity))
            .map_or(self.base_quantity, |t| t.quantity)
    }
}

impl Default for SizingTiers {
    fn default() -> Self {
        SizingTiers {
            base_quantity: 1,
            tiers: vec![SizingTier {
                min_equity: 5000.0,
                quantity: 2,
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    pub policy: SignalPolicy,
    pub sma_period: usize,
    pub max_trades_per_day: Option<u32>,
    pub account_equity: f64,
    pub sizing: SizingTiers,
    pub target: TargetRule,
    pub stop: StopRule,
}

impl Strategy {
    /// The longest bar lookback any indicator of this strategy needs.
    pub fn max_lookback(&self) -> usize {
        let policy_lookback = match &self.policy {
            SignalPolicy::BreakoutAboveSma => 2,
            SignalPolicy::MeanReversionToVwap { volume_window, .. } => *volume_window,
            // the crossover also needs the long SMA one bar back
            SignalPolicy::SmaCrossover {
                short_period,
                long_period,
            } => (*short_period).max(*long_period) + 1,
        };
        self.sma_period.max(policy_lookback)
    }

    pub fn quantity(&self) -> u32 {
        self.sizing.quantity_for(self.account_equity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_strategy() -> Strategy {
        Strategy {
            policy: SignalPolicy::MeanReversionToVwap {
                discount_pct: 1.0,
                volume_window: 10,
                min_avg_volume: 10_000.0,
            },
            sma_period: 50,
            max_trades_per_day: Some(3),
            account_equity: 1000.0,
            sizing: SizingTiers::default(),
            target: TargetRule {
                reference: TargetReference::Vwap,
                pct: 1.0,
            },
            stop: StopRule::TrailingPct(2.0),
        }
    }

    #[test]
    fn target_from_vwap() {
        let rule = TargetRule {
            reference: TargetReference::Vwap,
            pct: 1.0,
        };
        assert!((rule.price(98.5, 100.0) - 101.0).abs() < 1e-9);
    }

    #[test]
    fn target_from_entry() {
        let rule = TargetRule {
            reference: TargetReference::Entry,
            pct: 2.0,
        };
        assert!((rule.price(103.0, 0.0) - 105.06).abs() < 1e-9);
    }

    #[test]
    fn fixed_stop_below_entry() {
        match StopRule::FixedPct(1.0).resolve(103.0) {
            StopSpec::Fixed { price } => assert!((price - 101.97).abs() < 1e-9),
            other => panic!("unexpected stop {other:?}"),
        }
    }

    #[test]
    fn trailing_stop_keeps_percent() {
        assert_eq!(
            StopRule::TrailingPct(2.0).resolve(50.0),
            StopSpec::Trailing { percent: 2.0 }
        );
    }

    #[test]
    fn sizing_tiers() {
        let sizing = SizingTiers {
            base_quantity: 1,
            tiers: vec![
                SizingTier {
                    min_equity: 20_000.0,
                    quantity: 5,
                },
                SizingTier {
                    min_equity: 5000.0,
                    quantity: 2,
                },
            ],
        };
        assert_eq!(sizing.quantity_for(1000.0), 1);
        assert_eq!(sizing.quantity_for(5000.0), 1);
        assert_eq!(sizing.quantity_for(5000.01), 2);
        assert_eq!(sizing.quantity_for(25_000.0), 5);
    }

    #[test]
    fn lookback_covers_volume_window() {
        let mut s = sample_strategy();
        assert_eq!(s.max_lookback(), 50);
        s.sma_period = 5;
        assert_eq!(s.max_lookback(), 10);
        s.policy = SignalPolicy::SmaCrossover {
            short_period: 10,
            long_period: 50,
        };
        assert_eq!(s.max_lookback(), 51);
    }

    #[test]
    fn policy_display() {
        assert_eq!(SignalPolicy::BreakoutAboveSma.to_string(), "breakout");
        assert_eq!(
            SignalPolicy::SmaCrossover {
                short_period: 10,
                long_period: 50
            }
            .to_string(),
            "sma_crossover(10,50)"
        );
    }

    #[test]
    fn default_quantity_from_equity() {
        let s = sample_strategy();
        assert_eq!(s.quantity(), 1);
        let rich = Strategy {
            account_equity: 6000.0,
            ..s
        };
        assert_eq!(rich.quantity(), 2);
    }
}
