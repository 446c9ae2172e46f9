//! Single-run orchestration: data loading, engine run, replay, metrics.

use anyhow::{Context, Result};
use ranklab_core::data::{IndicatorStore, Universe};
use ranklab_core::engine::{run_backtest, RunResult};
use ranklab_core::replay::{equity_curve, extract_trades, DailyEquity, TradeAnalysis};

use crate::config::{RunConfig, RunId};
use crate::metrics::{PerformanceMetrics, PositionStats, TradeStats};

/// Everything a finished run produces, ready for export.
pub struct BacktestOutcome {
    pub run_id: RunId,
    pub config: RunConfig,
    pub result: RunResult,
    pub curve: Vec<DailyEquity>,
    pub analysis: TradeAnalysis,
    pub metrics: PerformanceMetrics,
    pub trade_stats: TradeStats,
    pub position_stats: PositionStats,
}

/// Execute one backtest end to end.
///
/// Universe and index loading errors are fatal; per-security data problems
/// surface as warnings from the store and show up as indeterminate signal
/// evaluations.
pub fn run_single_backtest(config: RunConfig) -> Result<BacktestOutcome> {
    let run_id = config.run_id();
    log::info!("run {run_id}");

    let universe = Universe::from_csv(&config.data.universe_file)
        .with_context(|| format!("loading universe {}", config.data.universe_file.display()))?;
    if let Some((first, last)) = universe.date_range() {
        log::info!(
            "universe: {} ranking day(s), {first} → {last}",
            universe.day_count()
        );
    }

    let store = IndicatorStore::open(&config.data.series_dir, &config.data.index_file)
        .with_context(|| format!("opening market index {}", config.data.index_file.display()))?;

    let strategy = config.strategy();
    let result = run_backtest(&universe, &store, &strategy, &config.engine_config());

    let curve = equity_curve(
        &result.records,
        config.analytics.initial_capital,
        config.analytics.fee_rate,
    );
    let analysis = extract_trades(&result.records, config.analytics.fee_rate);
    let metrics = PerformanceMetrics::compute(&curve);
    let trade_stats = TradeStats::compute(&analysis.trades);
    let position_stats = PositionStats::compute(&analysis.daily_open_positions);

    log::info!(
        "total_return={:.4} annual_return={:.4} max_drawdown={:.4} trades={}",
        metrics.total_return,
        metrics.annual_return,
        metrics.max_drawdown,
        trade_stats.trade_count,
    );

    Ok(BacktestOutcome {
        run_id,
        config,
        result,
        curve,
        analysis,
        metrics,
        trade_stats,
        position_stats,
    })
}
