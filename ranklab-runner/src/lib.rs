//! RankLab Runner — run orchestration, metrics, and artifact export.
//!
//! The core crate produces a record ledger; this crate wraps it with
//! everything a run needs around the edges: TOML configuration, data
//! loading, replay into curve/trades, metric computation, and CSV/JSON
//! artifact export.

pub mod config;
pub mod export;
pub mod metrics;
pub mod runner;

pub use config::{ConfigError, RunConfig, RunId};
pub use export::save_artifacts;
pub use metrics::{PerformanceMetrics, PositionStats, TradeStats};
pub use runner::{run_single_backtest, BacktestOutcome};
