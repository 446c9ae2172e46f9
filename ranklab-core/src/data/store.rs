//! Run-scoped indicator store.
//!
//! One store is built per run and threaded by reference through the engine
//! and the signal evaluators. Per-security series are loaded lazily and
//! memoized; a load failure is memoized too, so a bad file is warned about
//! once and then behaves as "no data".

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::NaiveDate;

use super::{parse_date_cell, DataError, IndicatorSeries, MarketSeries, RawBar};

#[derive(Debug)]
pub struct IndicatorStore {
    data_dir: Option<PathBuf>,
    market: MarketSeries,
    cache: RefCell<HashMap<String, Option<Rc<IndicatorSeries>>>>,
}

impl IndicatorStore {
    /// Open a store over a data directory. The market index file is loaded
    /// eagerly: without it no regime decision is possible, so a missing or
    /// unreadable index aborts the run before the day loop starts.
    pub fn open(data_dir: &Path, market_file: &Path) -> Result<Self, DataError> {
        let market = load_market_csv(market_file)?;
        Ok(Self {
            data_dir: Some(data_dir.to_path_buf()),
            market,
            cache: RefCell::new(HashMap::new()),
        })
    }

    /// Build a store from in-memory series, for tests and synthetic runs.
    pub fn with_data(
        market: MarketSeries,
        series: impl IntoIterator<Item = IndicatorSeries>,
    ) -> Self {
        let cache = series
            .into_iter()
            .map(|s| (s.security.clone(), Some(Rc::new(s))))
            .collect();
        Self {
            data_dir: None,
            market,
            cache: RefCell::new(cache),
        }
    }

    pub fn market(&self) -> &MarketSeries {
        &self.market
    }

    /// The memoized series for a security, or None when no usable data
    /// exists. Callers treat None as "cannot decide".
    pub fn series(&self, security: &str) -> Option<Rc<IndicatorSeries>> {
        if let Some(entry) = self.cache.borrow().get(security) {
            return entry.clone();
        }
        let loaded = self.load(security);
        self.cache
            .borrow_mut()
            .insert(security.to_string(), loaded.clone());
        loaded
    }

    fn load(&self, security: &str) -> Option<Rc<IndicatorSeries>> {
        let dir = self.data_dir.as_ref()?;
        let path = dir.join(format!("{security}.csv"));
        match load_bars_csv(&path) {
            Ok(bars) => Some(Rc::new(IndicatorSeries::from_bars(security, bars))),
            Err(err) => {
                log::warn!("no usable data for {security}: {err}");
                None
            }
        }
    }

    /// First tradable bar of `security` strictly after `after`.
    pub fn next_tradable(&self, security: &str, after: NaiveDate) -> Option<(NaiveDate, f64)> {
        self.series(security)?.next_tradable(after)
    }

    /// Most recent close of `security` on or before `date`.
    pub fn latest_close_on_or_before(&self, security: &str, date: NaiveDate) -> Option<f64> {
        self.series(security)?.latest_close_on_or_before(date)
    }
}

fn field(record: &csv::StringRecord, idx: Option<usize>) -> f64 {
    idx.and_then(|i| record.get(i))
        .and_then(|c| c.trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Parse a daily bar CSV with `Date,Open,High,Low,Close,Volume` headers
/// (case-insensitive; `Datetime` is accepted for the date column). Blank or
/// unparseable price cells become NaN.
fn load_bars_csv(path: &Path) -> Result<Vec<RawBar>, DataError> {
    let display = path.display().to_string();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| DataError::Io {
            path: display.clone(),
            message: e.to_string(),
        })?;

    let headers = reader
        .headers()
        .map_err(|e| DataError::Csv {
            path: display.clone(),
            message: e.to_string(),
        })?
        .clone();
    let col = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };
    let date_idx = col("date")
        .or_else(|| col("datetime"))
        .ok_or_else(|| DataError::MissingColumn {
            path: display.clone(),
            column: "Date".into(),
        })?;
    let close_idx = col("close").ok_or_else(|| DataError::MissingColumn {
        path: display.clone(),
        column: "Close".into(),
    })?;
    let open_idx = col("open");
    let high_idx = col("high");
    let low_idx = col("low");
    let volume_idx = col("volume");

    let mut bars = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| DataError::Csv {
            path: display.clone(),
            message: e.to_string(),
        })?;
        let date_cell = record.get(date_idx).unwrap_or("");
        let date = match parse_date_cell(date_cell) {
            Some(d) => d,
            None => continue,
        };
        bars.push(RawBar {
            date,
            open: field(&record, open_idx),
            high: field(&record, high_idx),
            low: field(&record, low_idx),
            close: field(&record, Some(close_idx)),
            volume: volume_idx
                .and_then(|i| record.get(i))
                .and_then(|c| c.trim().parse::<u64>().ok())
                .unwrap_or(0),
        });
    }

    if bars.is_empty() {
        return Err(DataError::Empty { path: display });
    }
    Ok(bars)
}

/// Parse the market index CSV (`Date,Close` at minimum).
fn load_market_csv(path: &Path) -> Result<MarketSeries, DataError> {
    let bars = load_bars_csv(path)?;
    Ok(MarketSeries::new(
        bars.into_iter().map(|b| (b.date, b.close)).collect(),
    ))
}
