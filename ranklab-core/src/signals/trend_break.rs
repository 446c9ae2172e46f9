//! Trend-break exit: leave when the close loses the long EMA support or the
//! trailing stop, whichever trips first.

use chrono::NaiveDate;

use crate::data::IndicatorStore;
use crate::domain::Position;

use super::{highest_close_since, SellSignal, SignalCheck};

#[derive(Debug, Clone)]
pub struct TrendBreak {
    pub ema_length: usize,
    pub trailing_stop_rate: f64,
}

impl Default for TrendBreak {
    fn default() -> Self {
        Self {
            ema_length: 50,
            trailing_stop_rate: 0.08,
        }
    }
}

impl SellSignal for TrendBreak {
    fn name(&self) -> &'static str {
        "trend_break"
    }

    fn evaluate(
        &self,
        store: &IndicatorStore,
        security: &str,
        date: NaiveDate,
        position: &Position,
    ) -> Option<SignalCheck> {
        let series = store.series(security)?;
        let n = series.len_upto(date);
        // Short history is a definite "hold", not indeterminate: with no
        // established trend there is nothing to break.
        if n < 20 {
            return Some(SignalCheck::verdict(false));
        }

        let ema = series.column(&format!("ema_{}", self.ema_length))?;
        let close = series.close[n - 1];
        let ema_t = ema[n - 1];

        let trailing_hit = match highest_close_since(&series, position.buy_date, n) {
            Some(highest) => close < highest * (1.0 - self.trailing_stop_rate),
            None => false,
        };
        let trend_broken = close < ema_t;

        Some(
            SignalCheck::verdict(trend_broken || trailing_hit)
                .with_detail("close", close)
                .with_detail("ema", ema_t),
        )
    }
}
