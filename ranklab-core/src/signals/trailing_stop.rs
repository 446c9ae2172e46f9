//! Trailing-stop exit: sell when the close retreats a fixed fraction from
//! the highest close reached since entry.

use chrono::NaiveDate;

use crate::data::IndicatorStore;
use crate::domain::Position;

use super::{highest_close_since, SellSignal, SignalCheck};

#[derive(Debug, Clone)]
pub struct TrailingStop {
    /// Drawdown fraction from the post-entry peak that triggers the exit.
    pub trailing_stop_rate: f64,
}

impl Default for TrailingStop {
    fn default() -> Self {
        Self {
            trailing_stop_rate: 0.08,
        }
    }
}

impl SellSignal for TrailingStop {
    fn name(&self) -> &'static str {
        "trailing_stop"
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
        if n == 0 {
            return None;
        }

        let close = series.close[n - 1];
        let highest = match highest_close_since(&series, position.buy_date, n) {
            Some(h) => h,
            // No usable close since entry: cannot be under water yet.
            None => return Some(SignalCheck::verdict(false)),
        };
        let stop = highest * (1.0 - self.trailing_stop_rate);

        let fires = close < stop;
        Some(
            SignalCheck::verdict(fires)
                .with_detail("close", close)
                .with_detail("highest_since_buy", highest)
                .with_detail("stop_price", stop),
        )
    }
}
