//! RankLab CLI — run backtests and inspect universe files.
//!
//! Commands:
//! - `run` — execute a backtest from a TOML config and save artifacts
//! - `inspect` — report ranking-day coverage of a universe CSV

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use ranklab_core::data::Universe;
use ranklab_runner::runner::run_single_backtest;
use ranklab_runner::{save_artifacts, BacktestOutcome, RunConfig};

#[derive(Parser)]
#[command(name = "ranklab", about = "RankLab CLI — rule-based daily backtesting engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest from a TOML config file and save artifacts.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Override the config's start date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Override the config's end date (YYYY-MM-DD).
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Output directory for run artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Report ranking-day coverage of a universe CSV.
    Inspect {
        /// Ranked universe CSV (`date,stockno,rank,point`).
        #[arg(long)]
        universe: PathBuf,

        /// Also list every ranking day with its candidate count.
        #[arg(long, default_value_t = false)]
        days: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            start,
            end,
            output_dir,
        } => run_cmd(config, start, end, output_dir),
        Commands::Inspect { universe, days } => inspect_cmd(universe, days),
    }
}

fn run_cmd(
    config_path: PathBuf,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    output_dir: PathBuf,
) -> Result<()> {
    let mut config = RunConfig::load(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;

    if let Some(start) = start {
        config.backtest.start_date = start;
    }
    if let Some(end) = end {
        config.backtest.end_date = end;
    }
    // Overrides can invert the range; re-check before running.
    if start.is_some() || end.is_some() {
        config.validate()?;
    }

    let outcome = run_single_backtest(config)?;
    print_summary(&outcome);

    let run_dir = output_dir.join(&outcome.run_id);
    save_artifacts(&run_dir, &outcome)?;
    println!("Artifacts saved to: {}", run_dir.display());

    Ok(())
}

fn inspect_cmd(universe_path: PathBuf, list_days: bool) -> Result<()> {
    let universe = Universe::from_csv(&universe_path)
        .with_context(|| format!("loading universe {}", universe_path.display()))?;

    println!("Universe: {}", universe_path.display());
    println!("Ranking days: {}", universe.day_count());
    if let Some((first, last)) = universe.date_range() {
        println!("Date range:   {first} to {last}");
    }

    let sizes: Vec<(NaiveDate, usize)> = universe.day_sizes().collect();
    if let (Some(min), Some(max)) = (
        sizes.iter().map(|(_, n)| *n).min(),
        sizes.iter().map(|(_, n)| *n).max(),
    ) {
        println!("Candidates per day: {min} to {max}");
    }

    if list_days {
        println!();
        println!("{:<12} {:>10}", "Date", "Candidates");
        println!("{}", "-".repeat(23));
        for (date, count) in &sizes {
            println!("{:<12} {:>10}", date.to_string(), count);
        }
    }

    Ok(())
}

fn print_summary(outcome: &BacktestOutcome) {
    let b = &outcome.config.backtest;
    println!();
    println!("=== Backtest Result ===");
    println!("Run:            {}", outcome.run_id);
    println!("Period:         {} to {}", b.start_date, b.end_date);
    println!("Hold limits:    {} to {}", b.min_hold, b.max_hold);
    println!("Trades:         {}", outcome.trade_stats.trade_count);
    println!();
    println!("--- Performance ---");
    println!("Total Return:   {:.2}%", outcome.metrics.total_return * 100.0);
    println!("Annual Return:  {:.2}%", outcome.metrics.annual_return * 100.0);
    println!("Max Drawdown:   {:.2}%", outcome.metrics.max_drawdown * 100.0);
    println!("Win Rate:       {:.1}%", outcome.trade_stats.win_rate * 100.0);
    println!("Payoff Ratio:   {:.2}", outcome.trade_stats.payoff_ratio);
    println!("Avg Hold Days:  {:.1}", outcome.trade_stats.avg_hold_days);
    println!(
        "Open Positions: max {} / avg {:.1}",
        outcome.position_stats.max_open, outcome.position_stats.avg_open
    );
    if !outcome.result.unresolved_orders.is_empty() {
        println!();
        println!(
            "WARNING: {} order(s) never found a tradable bar and were dropped",
            outcome.result.unresolved_orders.len()
        );
    }
    println!();
}
