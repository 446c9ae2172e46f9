//! Open positions — entry facts only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An open holding, created on a Buy fill and destroyed on a Sell fill.
///
/// The engine stores only the entry facts. Unrealized extrema (max/min price
/// since entry) belong to the trade replay, which reconstructs them from the
/// Hold trail in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub security: String,
    pub buy_date: NaiveDate,
    pub buy_price: f64,
    /// Name of the buy signal that opened the position; the strategy's sell
    /// dispatch keys off this for the life of the position.
    pub buy_signal: String,
}
