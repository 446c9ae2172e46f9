//! Simulation engine: the five-step daily loop.

mod day_loop;
mod state;

pub use day_loop::run_backtest;
pub use state::{EngineConfig, RunResult};
