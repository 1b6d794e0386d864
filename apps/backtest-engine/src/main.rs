//! Backtest Engine Binary
//!
//! Runs one backtest over a JSON market-data fixture and prints the finished
//! run as JSON.
//!
//! # Usage
//!
//! ```bash
//! BACKTEST_DATA_FILE=fixtures/chains.json \
//! BACKTEST_SYMBOLS=AAPL,MSFT \
//! BACKTEST_START_DATE=2026-01-05 \
//! BACKTEST_END_DATE=2026-03-27 \
//! cargo run --bin backtest-engine
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `BACKTEST_DATA_FILE`: JSON fixture of chain snapshots,
//!   `{ "<symbol>": { "<date>": [quote, ...] } }`
//! - `BACKTEST_SYMBOLS`: comma-separated symbols
//! - `BACKTEST_START_DATE` / `BACKTEST_END_DATE`: simulated range
//!
//! ## Optional
//! - `BACKTEST_CONFIG_FILE`: TOML file layered under the environment
//! - `BACKTEST_INITIAL_CAPITAL`, `BACKTEST_MAX_POSITIONS`,
//!   `BACKTEST_POSITION_SIZE_PCT`, `BACKTEST_COMMISSION_PER_CONTRACT`,
//!   `BACKTEST_SLIPPAGE_PCT`, `BACKTEST_FETCH_TIMEOUT_SECS`
//! - `RUST_LOG`: log level (default: info)

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;

use backtest_engine::models::OptionQuote;
use backtest_engine::ports::{InMemoryMarketData, InMemoryResultsSink};
use backtest_engine::strategies::ThresholdStrategy;
use backtest_engine::{BacktestConfig, BacktestEngine, RunDiagnostics};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    backtest_engine::telemetry::init_tracing();

    let config_file = std::env::var("BACKTEST_CONFIG_FILE").ok().map(PathBuf::from);
    let config = BacktestConfig::load(config_file.as_deref())?;

    let data_file = std::env::var("BACKTEST_DATA_FILE")
        .context("BACKTEST_DATA_FILE environment variable is required")?;
    let provider = load_market_data(Path::new(&data_file))?;

    let strategy = Arc::new(ThresholdStrategy::default());
    let engine = BacktestEngine::new(config, Arc::new(provider), strategy);
    let sink = InMemoryResultsSink::new();
    let mut diagnostics = RunDiagnostics::new();

    match engine.run(&sink, &mut diagnostics).await {
        Ok(run) => {
            println!("{}", serde_json::to_string_pretty(&run)?);
            Ok(())
        }
        Err(failure) => {
            tracing::error!(
                error = %failure.error,
                equity_points = failure.equity_curve.len(),
                closed_trades = failure.closed_trades.len(),
                "Backtest aborted"
            );
            Err(failure.into())
        }
    }
}

/// Load a chain-snapshot fixture into the in-memory provider.
///
/// Fixture layout: symbol -> ISO date -> chain rows.
fn load_market_data(path: &Path) -> anyhow::Result<InMemoryMarketData> {
    let file =
        File::open(path).with_context(|| format!("cannot open data file {}", path.display()))?;
    let fixtures: HashMap<String, BTreeMap<NaiveDate, Vec<OptionQuote>>> =
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("cannot parse data file {}", path.display()))?;

    let mut provider = InMemoryMarketData::new();
    let mut snapshots = 0usize;
    for (symbol, by_date) in fixtures {
        for (date, chain) in by_date {
            provider.add_chain(&symbol, date, chain);
            snapshots += 1;
        }
    }
    tracing::info!(snapshots, "Market data fixture loaded");
    Ok(provider)
}
