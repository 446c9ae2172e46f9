//! Oversold-recovery entry: weak-market rebound logic.
//!
//! Three conjunctive conditions:
//! 1. Regime: the broad index closes at or below its MA200. Above the
//!    average (or with the average still warming up) the evaluation is
//!    indeterminate, not a "no".
//! 2. Recovery: the index RSI crossed upward through the oversold threshold
//!    within the lookback window.
//! 3. Low price: the security's latest close sits at or below a low
//!    percentile of its recent closes.

use chrono::NaiveDate;

use crate::data::IndicatorStore;
use crate::indicators::percentile;

use super::{BuySignal, SignalCheck};

#[derive(Debug, Clone)]
pub struct OversoldRecovery {
    /// How many bars back an RSI upward cross still counts.
    pub rsi_recovery_lookback: usize,
    pub rsi_oversold_threshold: f64,
    /// Window of closes the low-price percentile is taken over. Shorter
    /// history is indeterminate.
    pub price_lookback_days: usize,
    /// Percentile (0..=100) the close must sit at or below.
    pub price_low_percentile: f64,
}

impl Default for OversoldRecovery {
    fn default() -> Self {
        Self {
            rsi_recovery_lookback: 2,
            rsi_oversold_threshold: 30.0,
            price_lookback_days: 90,
            price_low_percentile: 20.0,
        }
    }
}

impl BuySignal for OversoldRecovery {
    fn name(&self) -> &'static str {
        "oversold_recovery"
    }

    fn evaluate(
        &self,
        store: &IndicatorStore,
        security: &str,
        date: NaiveDate,
    ) -> Option<SignalCheck> {
        let market = store.market();
        let pos = market.at_or_before(date)?;

        let index_close = market.close[pos];
        let index_ma = market.ma[pos];
        if index_ma.is_nan() || index_close > index_ma {
            return None;
        }

        let start = pos.saturating_sub(self.rsi_recovery_lookback).max(1);
        let mut recovered = false;
        for i in start..=pos {
            let prev = market.rsi[i - 1];
            let curr = market.rsi[i];
            if prev < self.rsi_oversold_threshold && curr > self.rsi_oversold_threshold {
                recovered = true;
                break;
            }
        }
        if !recovered {
            return Some(SignalCheck::verdict(false));
        }

        let series = store.series(security)?;
        let n = series.len_upto(date);
        if n < self.price_lookback_days {
            return None;
        }
        let recent = &series.close[n - self.price_lookback_days..n];
        let current = series.close[n - 1];
        let threshold = percentile(recent, self.price_low_percentile);

        let fires = current <= threshold;
        Some(
            SignalCheck::verdict(fires)
                .with_detail("index_close", index_close)
                .with_detail("index_ma", index_ma)
                .with_detail("close", current)
                .with_detail("low_price_threshold", threshold),
        )
    }
}
