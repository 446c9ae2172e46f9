//! Performance metrics — pure functions over the equity curve and trades.
//!
//! Nothing here touches the engine or the data layer: curve and trade list
//! in, scalars out.

use ranklab_core::replay::{DailyEquity, TradeRecord};
use serde::{Deserialize, Serialize};

/// Curve-level metrics for a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_return: f64,
    /// Compounded over 365 calendar days per recorded curve row.
    pub annual_return: f64,
    /// Largest peak-to-trough loss as a positive fraction.
    pub max_drawdown: f64,
}

impl PerformanceMetrics {
    pub fn compute(curve: &[DailyEquity]) -> Self {
        let assets: Vec<f64> = curve.iter().map(|d| d.total_asset).collect();
        Self {
            total_return: total_return(&assets),
            annual_return: annual_return(&assets),
            max_drawdown: max_drawdown(&assets),
        }
    }
}

/// Win/loss statistics over the closed trades.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeStats {
    pub trade_count: usize,
    pub win_count: usize,
    pub loss_count: usize,
    pub win_rate: f64,
    pub avg_profit_rate: f64,
    pub avg_win_rate: f64,
    pub avg_loss_rate: f64,
    pub avg_hold_days: f64,
    /// |avg win| / |avg loss|; 0 when there are no losses.
    pub payoff_ratio: f64,
}

impl TradeStats {
    pub fn compute(trades: &[TradeRecord]) -> Self {
        let wins: Vec<&TradeRecord> = trades.iter().filter(|t| t.profit_rate > 0.0).collect();
        let losses: Vec<&TradeRecord> = trades.iter().filter(|t| t.profit_rate <= 0.0).collect();
        let avg_win = mean(wins.iter().map(|t| t.profit_rate));
        let avg_loss = mean(losses.iter().map(|t| t.profit_rate));
        Self {
            trade_count: trades.len(),
            win_count: wins.len(),
            loss_count: losses.len(),
            win_rate: if trades.is_empty() {
                0.0
            } else {
                wins.len() as f64 / trades.len() as f64
            },
            avg_profit_rate: mean(trades.iter().map(|t| t.profit_rate)),
            avg_win_rate: avg_win,
            avg_loss_rate: avg_loss,
            avg_hold_days: mean(trades.iter().map(|t| t.hold_days as f64)),
            payoff_ratio: if losses.is_empty() || avg_loss == 0.0 {
                0.0
            } else {
                (avg_win / avg_loss).abs()
            },
        }
    }
}

/// Daily open-position statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionStats {
    pub max_open: usize,
    pub avg_open: f64,
}

impl PositionStats {
    pub fn compute(daily_open_positions: &[(chrono::NaiveDate, usize)]) -> Self {
        Self {
            max_open: daily_open_positions.iter().map(|&(_, n)| n).max().unwrap_or(0),
            avg_open: mean(daily_open_positions.iter().map(|&(_, n)| n as f64)),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Total return as a fraction. 0.0 on short or degenerate curves.
pub fn total_return(assets: &[f64]) -> f64 {
    if assets.len() < 2 || assets[0] <= 0.0 {
        return 0.0;
    }
    assets[assets.len() - 1] / assets[0] - 1.0
}

/// Annualized return: `(final / initial) ^ (365 / rows) − 1`.
pub fn annual_return(assets: &[f64]) -> f64 {
    if assets.len() < 2 || assets[0] <= 0.0 {
        return 0.0;
    }
    let ratio = assets[assets.len() - 1] / assets[0];
    if ratio <= 0.0 {
        return 0.0;
    }
    ratio.powf(365.0 / assets.len() as f64) - 1.0
}

/// Maximum drawdown as a positive fraction of the running peak.
pub fn max_drawdown(assets: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut worst = 0.0f64;
    for &a in assets {
        peak = peak.max(a);
        if peak > 0.0 {
            worst = worst.max((peak - a) / peak);
        }
    }
    worst
}
