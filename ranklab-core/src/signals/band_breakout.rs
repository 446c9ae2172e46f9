//! Band-breakout entry: close crossing back above the lower Bollinger band,
//! filtered by how much of the recent window spent below the SMA.

use chrono::NaiveDate;

use crate::data::IndicatorStore;

use super::{BuySignal, SignalCheck};

#[derive(Debug, Clone)]
pub struct BandBreakout {
    /// Window inspected for below-SMA closes. The ratio denominator is this
    /// length even when fewer bars exist.
    pub lookback_days: usize,
    /// Cross only counts when less than this fraction of the window closed
    /// below the SMA.
    pub max_below_sma_ratio: f64,
}

impl Default for BandBreakout {
    fn default() -> Self {
        Self {
            lookback_days: 15,
            max_below_sma_ratio: 0.8,
        }
    }
}

impl BuySignal for BandBreakout {
    fn name(&self) -> &'static str {
        "band_breakout"
    }

    fn evaluate(
        &self,
        store: &IndicatorStore,
        security: &str,
        date: NaiveDate,
    ) -> Option<SignalCheck> {
        let series = store.series(security)?;
        let n = series.len_upto(date);
        if n < 2 {
            return None;
        }

        let sma = series.column("sma_20")?;
        let lower = series.column("bb_lower_20")?;

        let crossed_above_lower = series.close[n - 1] > lower[n - 1]
            && series.close[n - 2] < lower[n - 2];

        let start = n.saturating_sub(self.lookback_days);
        let below_sma_count = (start..n)
            .filter(|&i| series.close[i] < sma[i])
            .count();
        let below_ratio = below_sma_count as f64 / self.lookback_days as f64;

        let fires = crossed_above_lower && below_ratio < self.max_below_sma_ratio;
        Some(
            SignalCheck::verdict(fires)
                .with_detail("close", series.close[n - 1])
                .with_detail("lower_band", lower[n - 1])
                .with_detail("below_sma_ratio", below_ratio),
        )
    }
}
