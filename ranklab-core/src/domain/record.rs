//! Ledger records — the append-only event log a run produces.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What a ledger record describes.
///
/// `Hold` rows carry the daily mark price for an open position; they are
/// what makes the record sequence replayable into a daily equity curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl Action {
    /// Signed direction used in the exported CSV (`1` buy, `-1` sell, `0` hold).
    pub fn direction(&self) -> i8 {
        match self {
            Action::Buy => 1,
            Action::Sell => -1,
            Action::Hold => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Hold => "HOLD",
        }
    }
}

/// One event in the ledger.
///
/// The full ordered sequence is the sole source of truth for downstream
/// analytics: replaying all Buy/Sell records in `operation_date` order
/// reproduces the engine's holdings at every day boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub action: Action,
    pub security: String,
    /// Date the event took effect (fill date for Buy/Sell, mark date for Hold).
    pub operation_date: NaiveDate,
    pub price: f64,
    /// Target fraction of total assets per position (1 / max_hold).
    pub weight: f64,
    /// Name of the buy signal that opened (or is opening) the position.
    pub buy_signal: Option<String>,
    /// Date the order was requested (equals `operation_date` for Hold rows).
    pub request_date: NaiveDate,
}

/// Per-signal fill detail, collected only for signal names listed in the
/// engine config's `detail_tables`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillDetail {
    pub action: Action,
    pub security: String,
    pub trade_date: NaiveDate,
    pub trade_price: f64,
    pub request_date: NaiveDate,
}
