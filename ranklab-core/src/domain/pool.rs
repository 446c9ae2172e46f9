//! Candidate pools — one day's ranked slice of the security universe.

use serde::{Deserialize, Serialize};

/// One universe row for a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRow {
    pub security: String,
    /// Lower rank = higher priority. Ranks are expected to be distinct
    /// within a day; ties fall back to the pool's natural order.
    pub rank: i64,
    /// Model score backing the rank, when the universe provides one.
    pub score: Option<f64>,
}

/// A day's candidates split into the core and fallback admission tiers.
///
/// The core slice (first `core_n` rows) is scanned under the hard capacity
/// ceiling; the fallback slice only activates to satisfy the minimum-holding
/// floor. Rows are ordered ascending by rank.
#[derive(Debug, Clone, Copy)]
pub struct CandidatePool<'a> {
    rows: &'a [CandidateRow],
    core_n: usize,
}

impl<'a> CandidatePool<'a> {
    /// `rows` must already be rank-sorted and truncated to the day's
    /// `candidate_n` (the universe loader guarantees the sort).
    pub fn new(rows: &'a [CandidateRow], core_n: usize) -> Self {
        Self { rows, core_n }
    }

    pub fn core(&self) -> &'a [CandidateRow] {
        &self.rows[..self.core_n.min(self.rows.len())]
    }

    pub fn fallback(&self) -> &'a [CandidateRow] {
        &self.rows[self.core_n.min(self.rows.len())..]
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
