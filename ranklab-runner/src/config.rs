//! Run configuration: TOML on disk, validated, content-addressable.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use ranklab_core::engine::EngineConfig;
use ranklab_core::signals::{
    BandBreakout, MomentumCross, OversoldRecovery, TrailingStop, TrendBreak,
};
use ranklab_core::strategy::RegimeStrategy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a run (content-addressable hash of the config).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {message}")]
    Read { path: String, message: String },

    #[error("cannot parse config {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Everything needed to reproduce a run. All parameters are fixed at load
/// time; nothing here mutates during the backtest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    pub backtest: BacktestConfig,
    pub data: DataConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub signals: SignalsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestConfig {
    /// Inclusive date range, `YYYY-MM-DD`.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "defaults::max_hold")]
    pub max_hold: usize,
    #[serde(default = "defaults::min_hold")]
    pub min_hold: usize,
    #[serde(default = "defaults::candidate_n")]
    pub candidate_n: usize,
    #[serde(default = "defaults::core_n")]
    pub core_n: usize,
    /// Signal names whose fills get their own detail table.
    #[serde(default)]
    pub detail_tables: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    /// Ranked universe CSV (`date,stockno,rank,point`).
    pub universe_file: PathBuf,
    /// Directory of per-security bar CSVs, one `<security>.csv` each.
    pub series_dir: PathBuf,
    /// Market index bar CSV used for regime gating.
    pub index_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub initial_capital: f64,
    /// Applied on both sides of every fill.
    pub fee_rate: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            initial_capital: 25_000_000.0,
            fee_rate: 0.002,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SignalsConfig {
    pub trailing_stop_rate: f64,
    pub rsi_recovery_lookback: usize,
    pub rsi_oversold_threshold: f64,
    pub price_lookback_days: usize,
    pub price_low_percentile: f64,
    pub macd_history_days: usize,
    pub ema_length: usize,
    pub macd_low_percentile: f64,
    pub band_lookback_days: usize,
    pub max_below_sma_ratio: f64,
}

impl Default for SignalsConfig {
    fn default() -> Self {
        Self {
            trailing_stop_rate: 0.08,
            rsi_recovery_lookback: 2,
            rsi_oversold_threshold: 30.0,
            price_lookback_days: 90,
            price_low_percentile: 20.0,
            macd_history_days: 250,
            ema_length: 50,
            macd_low_percentile: 25.0,
            band_lookback_days: 15,
            max_below_sma_ratio: 0.8,
        }
    }
}

mod defaults {
    pub fn max_hold() -> usize {
        20
    }
    pub fn min_hold() -> usize {
        15
    }
    pub fn candidate_n() -> usize {
        100
    }
    pub fn core_n() -> usize {
        30
    }
}

impl RunConfig {
    /// Load and validate a TOML config. Relative data paths are resolved
    /// against the config file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: display.clone(),
            message: e.to_string(),
        })?;
        let mut config: RunConfig = toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: display,
            message: e.to_string(),
        })?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        config.validate()?;
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.data.universe_file,
            &mut self.data.series_dir,
            &mut self.data.index_file,
        ] {
            if path.is_relative() {
                let resolved = base.join(&*path);
                *path = resolved;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.backtest;
        if b.start_date > b.end_date {
            return Err(ConfigError::Invalid(format!(
                "start_date {} is after end_date {}",
                b.start_date, b.end_date
            )));
        }
        if b.max_hold == 0 {
            return Err(ConfigError::Invalid("max_hold must be at least 1".into()));
        }
        if b.min_hold > b.max_hold {
            return Err(ConfigError::Invalid(format!(
                "min_hold {} exceeds max_hold {}",
                b.min_hold, b.max_hold
            )));
        }
        if b.core_n > b.candidate_n {
            return Err(ConfigError::Invalid(format!(
                "core_n {} exceeds candidate_n {}",
                b.core_n, b.candidate_n
            )));
        }
        let fee = self.analytics.fee_rate;
        if !(0.0..1.0).contains(&fee) {
            return Err(ConfigError::Invalid(format!(
                "fee_rate {fee} must be in [0, 1)"
            )));
        }
        let stop = self.signals.trailing_stop_rate;
        if !(0.0..1.0).contains(&stop) {
            return Err(ConfigError::Invalid(format!(
                "trailing_stop_rate {stop} must be in [0, 1)"
            )));
        }
        Ok(())
    }

    /// Deterministic content hash: identical configs share a RunId.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            start: self.backtest.start_date,
            end: self.backtest.end_date,
            max_hold: self.backtest.max_hold,
            min_hold: self.backtest.min_hold,
            candidate_n: self.backtest.candidate_n,
            core_n: self.backtest.core_n,
            detail_tables: self.backtest.detail_tables.clone(),
        }
    }

    /// Build the production strategy from the signal thresholds.
    pub fn strategy(&self) -> RegimeStrategy {
        let s = &self.signals;
        RegimeStrategy {
            oversold_recovery: OversoldRecovery {
                rsi_recovery_lookback: s.rsi_recovery_lookback,
                rsi_oversold_threshold: s.rsi_oversold_threshold,
                price_lookback_days: s.price_lookback_days,
                price_low_percentile: s.price_low_percentile,
            },
            momentum_cross: MomentumCross {
                macd_history_days: s.macd_history_days,
                ema_length: s.ema_length,
                macd_low_percentile: s.macd_low_percentile,
            },
            band_breakout: BandBreakout {
                lookback_days: s.band_lookback_days,
                max_below_sma_ratio: s.max_below_sma_ratio,
            },
            trailing_stop: TrailingStop {
                trailing_stop_rate: s.trailing_stop_rate,
            },
            trend_break: TrendBreak {
                ema_length: s.ema_length,
                trailing_stop_rate: s.trailing_stop_rate,
            },
        }
    }
}
