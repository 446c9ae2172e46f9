//! Equity curve reconstruction from the record log.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Action, LedgerRecord};

/// End-of-day portfolio valuation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyEquity {
    pub date: NaiveDate,
    pub cash: f64,
    pub holdings_value: f64,
    pub total_asset: f64,
}

/// Replay the ledger into a daily equity curve.
///
/// Per distinct date, in record order:
/// - BUY sizes a whole-share position from the day-start asset estimate
///   (`floor(total × weight / price)`), pays `price × (1 + fee)` per share,
///   and re-floors against remaining cash when the estimate overshoots;
/// - SELL liquidates the whole position at `price × (1 − fee)`;
/// - HOLD re-marks the held price.
///
/// The day-start estimate deliberately uses yesterday's marks: sizing must
/// not depend on fills that happen later the same day.
pub fn equity_curve(
    records: &[LedgerRecord],
    initial_capital: f64,
    fee_rate: f64,
) -> Vec<DailyEquity> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&LedgerRecord>> = BTreeMap::new();
    for record in records {
        by_date.entry(record.operation_date).or_default().push(record);
    }

    let mut cash = initial_capital;
    // security -> (shares, last marked price)
    let mut holdings: BTreeMap<String, (i64, f64)> = BTreeMap::new();
    let mut curve = Vec::with_capacity(by_date.len());

    for (date, rows) in by_date {
        let holdings_value: f64 = holdings.values().map(|&(s, p)| s as f64 * p).sum();
        let total_estimate = cash + holdings_value;

        for row in &rows {
            match row.action {
                Action::Buy => {
                    let mut shares = (total_estimate * row.weight / row.price).floor() as i64;
                    if shares <= 0 {
                        continue;
                    }
                    let mut cost = shares as f64 * row.price * (1.0 + fee_rate);
                    if cost > cash {
                        shares = (cash / (row.price * (1.0 + fee_rate))).floor() as i64;
                        cost = shares as f64 * row.price * (1.0 + fee_rate);
                    }
                    if shares > 0 {
                        cash -= cost;
                        let prev = holdings.get(&row.security).map_or(0, |&(s, _)| s);
                        holdings.insert(row.security.clone(), (prev + shares, row.price));
                    }
                }
                Action::Sell => {
                    if let Some((shares, _)) = holdings.remove(&row.security) {
                        cash += shares as f64 * row.price * (1.0 - fee_rate);
                    }
                }
                Action::Hold => {}
            }
        }
        for row in &rows {
            if row.action == Action::Hold {
                if let Some(entry) = holdings.get_mut(&row.security) {
                    entry.1 = row.price;
                }
            }
        }

        let holdings_value: f64 = holdings.values().map(|&(s, p)| s as f64 * p).sum();
        curve.push(DailyEquity {
            date,
            cash,
            holdings_value,
            total_asset: cash + holdings_value,
        });
    }

    curve
}
