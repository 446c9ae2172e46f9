//! Round-trip trade extraction from the record log.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Action, LedgerRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitKind {
    /// Closed by a SELL record in the ledger.
    NormalSell,
    /// Still open at the last ledger date; closed at the security's last
    /// recorded price.
    ForcedAtEnd,
}

/// One completed (or force-closed) round trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    pub security: String,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    /// Calendar days held.
    pub hold_days: i64,
    /// Net of fees on both sides.
    pub profit_rate: f64,
    pub max_float_rate: f64,
    pub max_float_date: NaiveDate,
    pub min_float_rate: f64,
    pub min_float_date: NaiveDate,
    pub exit_kind: ExitKind,
}

/// Trade extraction output: the round trips plus the per-day open-position
/// counts used by position statistics.
#[derive(Debug, Clone, Default)]
pub struct TradeAnalysis {
    pub trades: Vec<TradeRecord>,
    pub daily_open_positions: Vec<(NaiveDate, usize)>,
}

struct OpenTrade {
    entry_date: NaiveDate,
    entry_price: f64,
    max_price: f64,
    max_date: NaiveDate,
    min_price: f64,
    min_date: NaiveDate,
}

/// Fold the ledger into round-trip trades.
///
/// BUY opens, HOLD updates the float extrema, SELL closes. Positions still
/// open when the ledger ends are force-closed at that security's last
/// recorded price on the ledger's last date.
pub fn extract_trades(records: &[LedgerRecord], fee_rate: f64) -> TradeAnalysis {
    if records.is_empty() {
        return TradeAnalysis::default();
    }

    let mut by_date: BTreeMap<NaiveDate, Vec<&LedgerRecord>> = BTreeMap::new();
    let mut last_price: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        by_date.entry(record.operation_date).or_default().push(record);
    }
    // Last recorded price per security, in date order.
    for rows in by_date.values() {
        for row in rows {
            last_price.insert(row.security.as_str(), row.price);
        }
    }
    let last_date = *by_date.keys().next_back().unwrap_or(&records[0].operation_date);

    let mut open: BTreeMap<String, OpenTrade> = BTreeMap::new();
    let mut trades = Vec::new();
    let mut daily_open_positions = Vec::with_capacity(by_date.len());

    for (date, mut rows) in by_date {
        rows.sort_by_key(|r| r.security.as_str());
        for row in rows {
            match row.action {
                Action::Buy => {
                    open.insert(
                        row.security.clone(),
                        OpenTrade {
                            entry_date: date,
                            entry_price: row.price,
                            max_price: row.price,
                            max_date: date,
                            min_price: row.price,
                            min_date: date,
                        },
                    );
                }
                Action::Hold => {
                    if let Some(pos) = open.get_mut(&row.security) {
                        if row.price > pos.max_price {
                            pos.max_price = row.price;
                            pos.max_date = date;
                        }
                        if row.price < pos.min_price {
                            pos.min_price = row.price;
                            pos.min_date = date;
                        }
                    }
                }
                Action::Sell => {
                    if let Some(pos) = open.remove(&row.security) {
                        trades.push(close_trade(
                            &row.security,
                            pos,
                            date,
                            row.price,
                            fee_rate,
                            ExitKind::NormalSell,
                        ));
                    }
                }
            }
        }
        daily_open_positions.push((date, open.len()));
    }

    for (security, pos) in open {
        let exit_price = last_price.get(security.as_str()).copied().unwrap_or(pos.entry_price);
        trades.push(close_trade(
            &security,
            pos,
            last_date,
            exit_price,
            fee_rate,
            ExitKind::ForcedAtEnd,
        ));
    }

    TradeAnalysis {
        trades,
        daily_open_positions,
    }
}

fn close_trade(
    security: &str,
    pos: OpenTrade,
    exit_date: NaiveDate,
    exit_price: f64,
    fee_rate: f64,
    exit_kind: ExitKind,
) -> TradeRecord {
    let profit_rate =
        (exit_price * (1.0 - fee_rate)) / (pos.entry_price * (1.0 + fee_rate)) - 1.0;
    TradeRecord {
        security: security.to_string(),
        entry_date: pos.entry_date,
        entry_price: pos.entry_price,
        exit_date,
        exit_price,
        hold_days: (exit_date - pos.entry_date).num_days(),
        profit_rate,
        max_float_rate: pos.max_price / pos.entry_price - 1.0,
        max_float_date: pos.max_date,
        min_float_rate: pos.min_price / pos.entry_price - 1.0,
        min_float_date: pos.min_date,
        exit_kind,
    }
}
