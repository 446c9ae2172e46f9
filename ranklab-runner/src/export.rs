//! Artifact export: CSV tables plus a JSON run manifest.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use ranklab_core::domain::{FillDetail, FullPositionCandidate, LedgerRecord};
use ranklab_core::replay::{DailyEquity, ExitKind, TradeRecord};
use serde::Serialize;

use crate::config::RunConfig;
use crate::metrics::{PerformanceMetrics, PositionStats, TradeStats};
use crate::runner::BacktestOutcome;

/// Manifest written next to the CSV tables; enough to identify and compare
/// runs without re-parsing the tables.
#[derive(Debug, Serialize)]
pub struct RunManifest<'a> {
    pub run_id: &'a str,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub config: &'a RunConfig,
    pub metrics: &'a PerformanceMetrics,
    pub trade_stats: &'a TradeStats,
    pub position_stats: &'a PositionStats,
    pub unresolved_order_count: usize,
}

/// Write all artifacts for a finished run into `dir` (created if absent):
/// `records.csv`, `daily_returns.csv`, `trade_analysis.csv`,
/// `full_position_candidates.csv`, one `detail_<signal>.csv` per configured
/// detail table, and `manifest.json`.
pub fn save_artifacts(dir: &Path, outcome: &BacktestOutcome) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output dir {}", dir.display()))?;

    write_records_csv(&dir.join("records.csv"), &outcome.result.records)?;
    write_daily_returns_csv(&dir.join("daily_returns.csv"), &outcome.curve)?;
    write_trades_csv(&dir.join("trade_analysis.csv"), &outcome.analysis.trades)?;
    write_snapshot_csv(
        &dir.join("full_position_candidates.csv"),
        &outcome.result.full_position_candidates,
    )?;
    for (table, fills) in &outcome.result.detail_records {
        write_detail_csv(&dir.join(format!("detail_{table}.csv")), fills)?;
    }
    write_manifest(&dir.join("manifest.json"), outcome)?;

    log::info!("artifacts written to {}", dir.display());
    Ok(())
}

fn create(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("creating {}", path.display()))
}

fn write_records_csv(path: &Path, records: &[LedgerRecord]) -> Result<()> {
    let mut file = create(path)?;
    writeln!(
        file,
        "action,stockno,ope_date,price,weight,buy_signal,request_date"
    )?;
    for r in records {
        writeln!(
            file,
            "{},{},{},{:.4},{:.6},{},{}",
            r.action.as_str(),
            r.security,
            r.operation_date,
            r.price,
            r.weight,
            r.buy_signal.as_deref().unwrap_or(""),
            r.request_date,
        )?;
    }
    Ok(())
}

fn write_daily_returns_csv(path: &Path, curve: &[DailyEquity]) -> Result<()> {
    let mut file = create(path)?;
    writeln!(file, "date,cash,holdings_value,total_asset")?;
    for day in curve {
        writeln!(
            file,
            "{},{:.2},{:.2},{:.2}",
            day.date, day.cash, day.holdings_value, day.total_asset
        )?;
    }
    Ok(())
}

fn write_trades_csv(path: &Path, trades: &[TradeRecord]) -> Result<()> {
    let mut file = create(path)?;
    writeln!(
        file,
        "stockno,entry_date,entry_price,exit_date,exit_price,hold_days,profit_rate,\
         max_float_rate,max_float_date,min_float_rate,min_float_date,exit_type"
    )?;
    for t in trades {
        let exit_type = match t.exit_kind {
            ExitKind::NormalSell => "Normal_Sell",
            ExitKind::ForcedAtEnd => "Forced_At_End",
        };
        writeln!(
            file,
            "{},{},{:.4},{},{:.4},{},{:.6},{:.6},{},{:.6},{},{}",
            t.security,
            t.entry_date,
            t.entry_price,
            t.exit_date,
            t.exit_price,
            t.hold_days,
            t.profit_rate,
            t.max_float_rate,
            t.max_float_date,
            t.min_float_rate,
            t.min_float_date,
            exit_type,
        )?;
    }
    Ok(())
}

fn write_snapshot_csv(path: &Path, candidates: &[FullPositionCandidate]) -> Result<()> {
    let mut file = create(path)?;
    writeln!(file, "date,stockno,rank,score,actually_bought")?;
    for c in candidates {
        let score = c.score.map(|s| format!("{s:.4}")).unwrap_or_default();
        writeln!(
            file,
            "{},{},{},{},{}",
            c.date, c.security, c.rank, score, c.actually_bought
        )?;
    }
    Ok(())
}

fn write_detail_csv(path: &Path, fills: &[FillDetail]) -> Result<()> {
    let mut file = create(path)?;
    writeln!(file, "action,stockno,trade_date,trade_price,request_date")?;
    for f in fills {
        writeln!(
            file,
            "{},{},{},{:.4},{}",
            f.action.as_str(),
            f.security,
            f.trade_date,
            f.trade_price,
            f.request_date,
        )?;
    }
    Ok(())
}

fn write_manifest(path: &Path, outcome: &BacktestOutcome) -> Result<()> {
    let manifest = RunManifest {
        run_id: &outcome.run_id,
        generated_at: chrono::Utc::now(),
        config: &outcome.config,
        metrics: &outcome.metrics,
        trade_stats: &outcome.trade_stats,
        position_stats: &outcome.position_stats,
        unresolved_order_count: outcome.result.unresolved_orders.len(),
    };
    let json = serde_json::to_string_pretty(&manifest).context("serializing run manifest")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
