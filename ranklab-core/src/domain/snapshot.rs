//! Full-position snapshot — the missed-opportunity dataset.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One candidate captured after the engine first reached full capacity while
/// scanning the core tier.
///
/// When the capacity ceiling is hit, every buy admitted earlier that day is
/// back-filled with `actually_bought = true`, and every later core candidate
/// whose buy signal fires is appended with `actually_bought = false`. The
/// sequence is append-only and never mutated; offline tooling uses it to
/// quantify missed-opportunity cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullPositionCandidate {
    pub date: NaiveDate,
    pub security: String,
    pub rank: i64,
    pub score: Option<f64>,
    pub actually_bought: bool,
}
