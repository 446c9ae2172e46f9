//! Signal evaluators: pluggable entry/exit rules over point-in-time data.
//!
//! Evaluators are stateless except for their thresholds. They read the store
//! only through point-in-time accessors, so no evaluation can see bars after
//! the query date.
//!
//! Every evaluation returns `Option<SignalCheck>`:
//! - `None` — indeterminate: data is missing or too short to decide;
//! - `Some { fires: false, .. }` — a definite "no signal" verdict;
//! - `Some { fires: true, .. }` — trigger.
//!
//! Both `None` and a non-firing `Some` suppress action, but callers can tell
//! them apart (the engine logs indeterminate evaluations at debug).

mod band_breakout;
mod momentum_cross;
mod oversold_recovery;
mod trailing_stop;
mod trend_break;

pub use band_breakout::BandBreakout;
pub use momentum_cross::MomentumCross;
pub use oversold_recovery::OversoldRecovery;
pub use trailing_stop::TrailingStop;
pub use trend_break::TrendBreak;

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::data::{IndicatorSeries, IndicatorStore};
use crate::domain::Position;

/// The outcome of a definite signal evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalCheck {
    pub fires: bool,
    /// Indicator values behind the verdict, for detail tables and debugging.
    pub details: BTreeMap<String, f64>,
}

impl SignalCheck {
    pub fn verdict(fires: bool) -> Self {
        Self {
            fires,
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: f64) -> Self {
        self.details.insert(key.to_string(), value);
        self
    }
}

/// Entry rule. Deliberately blind to portfolio state: the signature carries
/// no holdings, so entry logic cannot feed back on the portfolio.
pub trait BuySignal {
    fn name(&self) -> &'static str;

    fn evaluate(
        &self,
        store: &IndicatorStore,
        security: &str,
        date: NaiveDate,
    ) -> Option<SignalCheck>;
}

/// Exit rule. Receives the open position, since exits are defined relative
/// to entry facts (buy date, buy price).
pub trait SellSignal {
    fn name(&self) -> &'static str;

    fn evaluate(
        &self,
        store: &IndicatorStore,
        security: &str,
        date: NaiveDate,
        position: &Position,
    ) -> Option<SignalCheck>;
}

/// Highest non-NaN close from `buy_date` (inclusive) through the prefix end.
/// None when no bar in that window has a usable close.
pub(crate) fn highest_close_since(
    series: &IndicatorSeries,
    buy_date: NaiveDate,
    prefix_len: usize,
) -> Option<f64> {
    let start = series.dates.partition_point(|&d| d < buy_date);
    series.close[start..prefix_len]
        .iter()
        .copied()
        .filter(|c| !c.is_nan())
        .fold(None, |acc: Option<f64>, c| {
            Some(acc.map_or(c, |a| a.max(c)))
        })
}
