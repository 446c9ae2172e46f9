//! RankLab Core — engine, domain types, indicator store, signals, replay.
//!
//! This crate contains the heart of the backtesting engine:
//! - Domain types (candidate pools, pending orders, positions, ledger records)
//! - Day-by-day simulation loop with five phases per trading day
//! - Deferred settlement: orders fill at the first tradable bar strictly
//!   after their request date
//! - Rank-ordered admission with a core tier (hard capacity ceiling) and a
//!   fallback tier (minimum-holding floor)
//! - Signal and strategy traits evaluated on point-in-time data only
//! - Ledger replay: equity curve and round-trip trades as pure folds over
//!   the record sequence

pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod replay;
pub mod signals;
pub mod strategy;
