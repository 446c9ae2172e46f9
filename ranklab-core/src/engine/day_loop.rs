//! Day-by-day simulation loop — the heart of the backtesting engine.
//!
//! Five phases per calendar day:
//! 1. Settle: fill pending orders whose next tradable bar has arrived
//! 2. Hold: record carried positions at their latest close
//! 3. Exits: evaluate sell rules on holdings, enqueue SELL orders
//! 4. Core entries: rank-ordered admission up to the capacity ceiling,
//!    with the full-position candidate snapshot on saturation
//! 5. Fallback entries: top up from the tail of the pool while below the
//!    minimum-holding floor
//!
//! Orders never fill on the day they are requested: settlement looks for
//! the first tradable bar strictly after the request date, and always
//! fills at that bar's open.

use chrono::NaiveDate;

use crate::data::{IndicatorStore, Universe};
use crate::domain::{
    Action, CandidatePool, FillDetail, FullPositionCandidate, LedgerRecord, OrderAction,
    PendingOrder, Position,
};
use crate::strategy::Strategy;

use super::state::EngineState;
use super::{EngineConfig, RunResult};

/// Run a backtest over the inclusive `[start, end]` date range.
///
/// Calendar days with no bars, no universe rows, and no pending work are
/// no-ops; the loop does not need a trading calendar.
pub fn run_backtest(
    universe: &Universe,
    store: &IndicatorStore,
    strategy: &dyn Strategy,
    config: &EngineConfig,
) -> RunResult {
    log::info!(
        "backtest {} → {} (max_hold={}, min_hold={}, pool={}/{})",
        config.start,
        config.end,
        config.max_hold,
        config.min_hold,
        config.core_n,
        config.candidate_n,
    );

    let mut state = EngineState::default();
    let mut date = config.start;
    while date <= config.end {
        run_day(&mut state, universe, store, strategy, config, date);
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    if !state.pending_orders.is_empty() {
        log::warn!(
            "{} order(s) never found a tradable bar and were dropped",
            state.pending_orders.len()
        );
    }
    log::info!(
        "backtest done: {} records, {} still held",
        state.records.len(),
        state.holdings.len()
    );

    RunResult {
        records: state.records,
        full_position_candidates: state.full_position_candidates,
        detail_records: state.detail_records,
        final_holdings: state.holdings.into_values().collect(),
        unresolved_orders: state.pending_orders,
    }
}

fn run_day(
    state: &mut EngineState,
    universe: &Universe,
    store: &IndicatorStore,
    strategy: &dyn Strategy,
    config: &EngineConfig,
    date: NaiveDate,
) {
    let pool = CandidatePool::new(universe.candidates(date, config.candidate_n), config.core_n);

    // Holdings as of the start of the day; today's buy fills are not held
    // "yesterday" and get no HOLD record yet.
    let yesterday: Vec<String> = state.holdings.keys().cloned().collect();

    // ─── Phase 1: settle pending orders ───
    let pending = std::mem::take(&mut state.pending_orders);
    for order in pending {
        match store.next_tradable(&order.security, order.request_date) {
            Some((trade_date, trade_price)) if trade_date <= date => {
                settle_fill(state, config, order, trade_date, trade_price);
            }
            _ => state.pending_orders.push(order),
        }
    }

    // ─── Phase 2: hold records ───
    for security in &yesterday {
        let Some(position) = state.holdings.get(security) else {
            continue; // sold in today's settle
        };
        match store.latest_close_on_or_before(security, date) {
            Some(price) => state.records.push(LedgerRecord {
                action: Action::Hold,
                security: security.clone(),
                operation_date: date,
                price,
                weight: 1.0 / config.max_hold as f64,
                buy_signal: Some(position.buy_signal.clone()),
                request_date: date,
            }),
            None => log::warn!("no mark price for held {security} on {date}"),
        }
    }

    // ─── Phase 3: exits ───
    let held: Vec<Position> = state.holdings.values().cloned().collect();
    for position in held {
        if state.has_pending_sell(&position.security) {
            continue;
        }
        match strategy.check_sell(store, &position.security, date, &position) {
            Some(decision) if decision.fires => {
                let signal = decision.signal.unwrap_or_else(|| "unnamed".to_string());
                state.pending_orders.push(PendingOrder {
                    security: position.security.clone(),
                    action: OrderAction::Sell,
                    request_date: date,
                    signal,
                });
            }
            Some(_) => {}
            None => log::debug!(
                "indeterminate sell check for {} on {date}",
                position.security
            ),
        }
    }

    // ─── Phase 4: core-tier entries ───
    // On the first firing candidate that finds the book saturated, today's
    // admitted buys are back-filled into the snapshot; that candidate and
    // every later firing core candidate are recorded as passed over.
    let mut is_full_position = false;
    let mut snapshot_backfilled = false;
    let mut admitted_today: Vec<String> = Vec::new();

    for row in pool.core() {
        let security = &row.security;
        if state.holdings.contains_key(security) || state.has_pending(security) {
            continue;
        }
        let Some(decision) = strategy.check_buy(store, security, date) else {
            log::debug!("indeterminate buy check for {security} on {date}");
            continue;
        };
        if !decision.fires {
            continue;
        }

        if state.commitment() < config.max_hold {
            state.pending_orders.push(PendingOrder {
                security: security.clone(),
                action: OrderAction::Buy,
                request_date: date,
                signal: decision.signal.unwrap_or_else(|| "unnamed".to_string()),
            });
            admitted_today.push(security.clone());
        } else if !snapshot_backfilled {
            is_full_position = true;
            snapshot_backfilled = true;
            for bought in &admitted_today {
                if let Some(info) = pool.core().iter().find(|r| &r.security == bought) {
                    state.full_position_candidates.push(FullPositionCandidate {
                        date,
                        security: bought.clone(),
                        rank: info.rank,
                        score: info.score,
                        actually_bought: true,
                    });
                }
            }
        }

        if is_full_position {
            state.full_position_candidates.push(FullPositionCandidate {
                date,
                security: security.clone(),
                rank: row.rank,
                score: row.score,
                actually_bought: admitted_today.iter().any(|s| s == security),
            });
        }
    }

    // ─── Phase 5: fallback-tier entries ───
    if state.commitment() < config.min_hold {
        for row in pool.fallback() {
            if state.commitment() >= config.min_hold {
                break;
            }
            let security = &row.security;
            if state.holdings.contains_key(security) || state.has_pending(security) {
                continue;
            }
            match strategy.check_buy(store, security, date) {
                Some(decision) if decision.fires => {
                    state.pending_orders.push(PendingOrder {
                        security: security.clone(),
                        action: OrderAction::Buy,
                        request_date: date,
                        signal: decision.signal.unwrap_or_else(|| "unnamed".to_string()),
                    });
                }
                _ => {}
            }
        }
    }
}

fn settle_fill(
    state: &mut EngineState,
    config: &EngineConfig,
    order: PendingOrder,
    trade_date: NaiveDate,
    trade_price: f64,
) {
    let weight = 1.0 / config.max_hold as f64;

    let buy_signal = match order.action {
        OrderAction::Buy => {
            if state.holdings.contains_key(&order.security) {
                debug_assert!(false, "BUY fill for already-held {}", order.security);
                log::error!("BUY fill for already-held {}; order dropped", order.security);
                return;
            }
            Some(order.signal.clone())
        }
        OrderAction::Sell => match state.holdings.get(&order.security) {
            Some(position) => Some(position.buy_signal.clone()),
            None => {
                debug_assert!(false, "SELL fill without holding {}", order.security);
                log::error!("SELL fill without holding {}; order dropped", order.security);
                return;
            }
        },
    };

    let action = match order.action {
        OrderAction::Buy => Action::Buy,
        OrderAction::Sell => Action::Sell,
    };
    state.records.push(LedgerRecord {
        action,
        security: order.security.clone(),
        operation_date: trade_date,
        price: trade_price,
        weight,
        buy_signal,
        request_date: order.request_date,
    });

    if config.detail_tables.iter().any(|t| *t == order.signal) {
        state
            .detail_records
            .entry(order.signal.clone())
            .or_default()
            .push(FillDetail {
                action,
                security: order.security.clone(),
                trade_date,
                trade_price,
                request_date: order.request_date,
            });
    }

    match order.action {
        OrderAction::Buy => {
            state.holdings.insert(
                order.security.clone(),
                Position {
                    security: order.security,
                    buy_date: trade_date,
                    buy_price: trade_price,
                    buy_signal: order.signal,
                },
            );
        }
        OrderAction::Sell => {
            state.holdings.remove(&order.security);
        }
    }
}
