//! Ledger replay: pure folds over the record sequence.
//!
//! Nothing here touches market data or the engine. The record log is the
//! sole input, so replaying the same log twice yields identical output.

mod equity;
mod trades;

pub use equity::{equity_curve, DailyEquity};
pub use trades::{extract_trades, ExitKind, TradeAnalysis, TradeRecord};
