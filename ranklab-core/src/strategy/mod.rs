//! Strategy layer: composes the signal evaluators into a single buy/sell
//! verdict per security per day.

mod regime;

pub use regime::RegimeStrategy;

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::data::IndicatorStore;
use crate::domain::Position;
use crate::signals::SignalCheck;

/// A composed verdict. `signal` names the evaluator that fired and is only
/// present when `fires` is true.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub fires: bool,
    pub signal: Option<String>,
    pub details: BTreeMap<String, f64>,
}

impl Decision {
    pub fn hold() -> Self {
        Self {
            fires: false,
            signal: None,
            details: BTreeMap::new(),
        }
    }

    pub fn fired(signal: &str, check: SignalCheck) -> Self {
        Self {
            fires: true,
            signal: Some(signal.to_string()),
            details: check.details,
        }
    }
}

/// Per-security daily verdicts. `None` means the strategy could not decide
/// (no index data yet, regime inputs still warming up); both `None` and a
/// non-firing decision lead to no action.
pub trait Strategy {
    fn check_buy(
        &self,
        store: &IndicatorStore,
        security: &str,
        date: NaiveDate,
    ) -> Option<Decision>;

    fn check_sell(
        &self,
        store: &IndicatorStore,
        security: &str,
        date: NaiveDate,
        position: &Position,
    ) -> Option<Decision>;
}
