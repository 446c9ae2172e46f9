//! Pending orders — requests awaiting their first tradable bar.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Side of a pending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderAction {
    Buy,
    Sell,
}

/// An order placed by the strategy that has not yet found a fill price.
///
/// Orders settle at the first tradable bar strictly after `request_date` —
/// never re-priced, never skipped. An order whose security has no further
/// tradable bars simply stays pending until the run ends.
///
/// Invariant (enforced by the admission checks in the engine): at most one
/// pending order exists per security, and a security never has both a
/// pending Buy and an open position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOrder {
    pub security: String,
    pub action: OrderAction,
    pub request_date: NaiveDate,
    /// Name of the signal that produced the order. For Buy orders this is
    /// carried into the position on fill; for Sell orders it is informational.
    pub signal: String,
}
