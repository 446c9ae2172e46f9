//! End-to-end runner test: TOML config over fixture CSVs, through the
//! engine and replay, out to artifact files.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{Days, NaiveDate};
use ranklab_runner::{run_single_backtest, save_artifacts, RunConfig};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn write_index_csv(path: &Path) {
    let mut file = File::create(path).unwrap();
    writeln!(file, "Date,Open,High,Low,Close,Volume").unwrap();
    let start = d(2023, 1, 1);
    for i in 0..400u64 {
        let date = start + Days::new(i);
        let close = 20000.0 + 10.0 * i as f64;
        writeln!(
            file,
            "{date},{close:.1},{:.1},{:.1},{close:.1},1000",
            close + 5.0,
            close - 5.0
        )
        .unwrap();
    }
}

fn write_stock_csv(path: &Path) {
    // 40 oscillating closes, a dip under the lower band, a recovery on the
    // ranking day, then a run-up and a >8% retreat that trips the stop.
    let mut closes: Vec<f64> = (0..40)
        .map(|i| if i % 2 == 0 { 99.0 } else { 101.0 })
        .collect();
    closes.push(80.0);
    closes.push(99.5);
    closes.extend([100.5, 104.0, 108.0, 110.0, 100.0, 100.0]);

    let mut file = File::create(path).unwrap();
    writeln!(file, "Date,Open,High,Low,Close,Volume").unwrap();
    let start = d(2023, 8, 21);
    let mut prev = closes[0];
    for (i, &close) in closes.iter().enumerate() {
        let date = start + Days::new(i as u64);
        writeln!(
            file,
            "{date},{prev:.2},{:.2},{:.2},{close:.2},5000",
            prev.max(close),
            prev.min(close)
        )
        .unwrap();
        prev = close;
    }
}

fn write_pool_csv(path: &Path) {
    let mut file = File::create(path).unwrap();
    writeln!(file, "date,stockno,rank,point").unwrap();
    writeln!(file, "2023-10-01,1,1,95.0").unwrap();
}

fn write_config_toml(path: &Path) {
    let mut file = File::create(path).unwrap();
    write!(
        file,
        r#"
[backtest]
start_date = "2023-10-01"
end_date = "2023-10-08"
max_hold = 4
min_hold = 1
candidate_n = 10
core_n = 5
detail_tables = ["band_breakout"]

[data]
universe_file = "pool.csv"
series_dir = "bars"
index_file = "bars/INDEX.csv"

[analytics]
initial_capital = 1000000.0
fee_rate = 0.002
"#
    )
    .unwrap();
}

#[test]
fn run_from_toml_and_export_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let bars = dir.path().join("bars");
    fs::create_dir(&bars).unwrap();
    write_index_csv(&bars.join("INDEX.csv"));
    write_stock_csv(&bars.join("00001.csv"));
    write_pool_csv(&dir.path().join("pool.csv"));
    let config_path = dir.path().join("config.toml");
    write_config_toml(&config_path);

    let config = RunConfig::load(&config_path).unwrap();
    // Relative data paths were resolved against the config directory.
    assert!(config.data.universe_file.is_absolute());

    let outcome = run_single_backtest(config).unwrap();

    // One full round trip: breakout entry filled Oct 2 at 99.5, trailing
    // stop exit filled Oct 7 at 100.
    assert_eq!(outcome.analysis.trades.len(), 1);
    let trade = &outcome.analysis.trades[0];
    assert_eq!(trade.security, "00001");
    assert_eq!(trade.entry_date, d(2023, 10, 2));
    assert_eq!(trade.entry_price, 99.5);
    assert_eq!(trade.exit_date, d(2023, 10, 7));
    assert_eq!(trade.exit_price, 100.0);

    assert_eq!(outcome.curve.len(), 6);
    assert!(outcome.result.unresolved_orders.is_empty());
    assert_eq!(outcome.position_stats.max_open, 1);
    assert_eq!(outcome.trade_stats.trade_count, 1);

    let out = dir.path().join("artifacts");
    save_artifacts(&out, &outcome).unwrap();

    for name in [
        "records.csv",
        "daily_returns.csv",
        "trade_analysis.csv",
        "full_position_candidates.csv",
        "detail_band_breakout.csv",
        "manifest.json",
    ] {
        assert!(out.join(name).exists(), "missing artifact {name}");
    }

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("manifest.json")).unwrap()).unwrap();
    assert_eq!(manifest["run_id"], outcome.run_id.as_str());
    assert_eq!(manifest["unresolved_order_count"], 0);
    assert!(manifest["metrics"]["total_return"].is_number());

    let records = fs::read_to_string(out.join("records.csv")).unwrap();
    let mut lines = records.lines();
    assert_eq!(
        lines.next().unwrap(),
        "action,stockno,ope_date,price,weight,buy_signal,request_date"
    );
    assert!(records.contains("BUY,00001,2023-10-02"));
    assert!(records.contains("SELL,00001,2023-10-07"));
}

#[test]
fn load_rejects_missing_file_and_bad_ranges() {
    let dir = tempfile::tempdir().unwrap();
    assert!(RunConfig::load(&dir.path().join("absent.toml")).is_err());

    let bad = dir.path().join("bad.toml");
    fs::write(
        &bad,
        r#"
[backtest]
start_date = "2024-06-01"
end_date = "2024-01-01"

[data]
universe_file = "pool.csv"
series_dir = "bars"
index_file = "bars/INDEX.csv"
"#,
    )
    .unwrap();
    assert!(RunConfig::load(&bad).is_err());
}
