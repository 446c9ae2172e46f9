//! Engine configuration, mutable run state, and the run result.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    FillDetail, FullPositionCandidate, LedgerRecord, OrderAction, PendingOrder, Position,
};

/// Static per-run parameters. Fixed at construction; the engine never
/// mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Hard capacity ceiling on holdings + pending buys.
    pub max_hold: usize,
    /// Floor below which the fallback tier is allowed to top up.
    pub min_hold: usize,
    /// How many ranked candidates are considered each day.
    pub candidate_n: usize,
    /// Size of the priority-admission slice at the top of the pool.
    pub core_n: usize,
    /// Signal names whose fills get a per-signal detail table.
    #[serde(default)]
    pub detail_tables: Vec<String>,
}

/// Mutable state carried across days.
#[derive(Debug, Default)]
pub(super) struct EngineState {
    /// Open positions, keyed by security for deterministic iteration.
    pub holdings: BTreeMap<String, Position>,
    pub pending_orders: Vec<PendingOrder>,
    pub records: Vec<LedgerRecord>,
    pub full_position_candidates: Vec<FullPositionCandidate>,
    pub detail_records: BTreeMap<String, Vec<FillDetail>>,
}

impl EngineState {
    /// Holdings plus pending buys: the capacity figure admissions are
    /// checked against.
    pub fn commitment(&self) -> usize {
        let pending_buys = self
            .pending_orders
            .iter()
            .filter(|o| o.action == OrderAction::Buy)
            .count();
        self.holdings.len() + pending_buys
    }

    pub fn has_pending(&self, security: &str) -> bool {
        self.pending_orders.iter().any(|o| o.security == security)
    }

    pub fn has_pending_sell(&self, security: &str) -> bool {
        self.pending_orders
            .iter()
            .any(|o| o.security == security && o.action == OrderAction::Sell)
    }
}

/// Everything a completed run produces. The record sequence is the sole
/// input to replay; the rest is diagnostics.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub records: Vec<LedgerRecord>,
    pub full_position_candidates: Vec<FullPositionCandidate>,
    pub detail_records: BTreeMap<String, Vec<FillDetail>>,
    /// Positions still open when the run ended.
    pub final_holdings: Vec<Position>,
    /// Orders that never found a tradable bar. They produce no records;
    /// surfaced here so a run can be audited for silent drops.
    pub unresolved_orders: Vec<PendingOrder>,
}
