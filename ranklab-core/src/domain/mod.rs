//! Domain types: candidate pools, orders, positions, ledger records,
//! and the full-position snapshot.

mod order;
mod pool;
mod position;
mod record;
mod snapshot;

pub use order::{OrderAction, PendingOrder};
pub use pool::{CandidatePool, CandidateRow};
pub use position::Position;
pub use record::{Action, FillDetail, LedgerRecord};
pub use snapshot::FullPositionCandidate;
