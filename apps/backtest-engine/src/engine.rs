//! Backtest orchestration: the trading-day loop.
//!
//! One day is fully processed before the next begins: exits are evaluated
//! against the day's snapshot before new entries may use freed capital, then
//! one equity point is recorded. Per-symbol fetches within a day are
//! independent reads and run concurrently under a bounded timeout.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use futures::future::join_all;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calendar::trading_days;
use crate::config::BacktestConfig;
use crate::diagnostics::{IncidentKind, RunDiagnostics};
use crate::error::{EngineError, RunFailure};
use crate::ledger::PositionLedger;
use crate::metrics::calculate_performance;
use crate::models::{BacktestRun, EquityPoint, ExitReason, MarketSnapshot};
use crate::ports::{MarketDataProvider, ResultsSink, Strategy};

/// Drives a strategy through a historical date range.
pub struct BacktestEngine {
    config: BacktestConfig,
    provider: Arc<dyn MarketDataProvider>,
    strategy: Arc<dyn Strategy>,
}

impl BacktestEngine {
    /// Create an engine over a data provider and a strategy.
    #[must_use]
    pub fn new(
        config: BacktestConfig,
        provider: Arc<dyn MarketDataProvider>,
        strategy: Arc<dyn Strategy>,
    ) -> Self {
        Self {
            config,
            provider,
            strategy,
        }
    }

    /// Run the full simulation and hand the finished run to `sink`.
    ///
    /// Non-fatal conditions are recorded on `diagnostics` and never interrupt
    /// the day loop. Fatal failures abort with whatever equity history and
    /// trades had accumulated.
    pub async fn run(
        &self,
        sink: &dyn ResultsSink,
        diagnostics: &mut RunDiagnostics,
    ) -> Result<BacktestRun, RunFailure> {
        if let Err(error) = self.config.validate() {
            return Err(RunFailure {
                error,
                equity_curve: Vec::new(),
                closed_trades: Vec::new(),
            });
        }

        info!(
            strategy = self.strategy.name(),
            start_date = %self.config.start_date,
            end_date = %self.config.end_date,
            initial_capital = %self.config.initial_capital,
            symbols = self.config.symbols.len(),
            "Starting backtest"
        );

        let mut ledger = PositionLedger::new(&self.config);
        let mut equity_curve: Vec<EquityPoint> = Vec::new();
        let mut last_snapshot: Option<MarketSnapshot> = None;

        for date in trading_days(self.config.start_date, self.config.end_date) {
            let snapshot = self.fetch_snapshot(date, diagnostics).await;

            self.evaluate_exits(&mut ledger, &snapshot, date, diagnostics)
                .await;
            self.open_entries(&mut ledger, &snapshot, date, diagnostics)
                .await;

            equity_curve.push(ledger.equity_point(date));
            last_snapshot = Some(snapshot);
        }

        self.force_close_remaining(&mut ledger, last_snapshot.as_ref());

        let final_capital = ledger.capital();
        let closed_trades = ledger.into_closed_trades();
        let metrics = calculate_performance(
            self.config.initial_capital,
            final_capital,
            &equity_curve,
            &closed_trades,
        );

        let run = BacktestRun {
            strategy: self.strategy.name().to_string(),
            start_date: self.config.start_date,
            end_date: self.config.end_date,
            initial_capital: self.config.initial_capital,
            final_capital,
            equity_curve,
            closed_trades,
            metrics,
        };

        if let Err(error) = self.persist(sink, &run).await {
            return Err(RunFailure {
                error,
                equity_curve: run.equity_curve,
                closed_trades: run.closed_trades,
            });
        }

        info!(
            strategy = %run.strategy,
            final_capital = %run.final_capital,
            total_trades = run.metrics.total_trades,
            total_return_pct = %run.metrics.total_return_pct,
            max_drawdown_pct = %run.metrics.max_drawdown_pct,
            incidents = diagnostics.incidents().len(),
            "Backtest complete"
        );

        Ok(run)
    }

    /// Fetch all symbols' chains for a day, concurrently and under timeout.
    async fn fetch_snapshot(
        &self,
        date: NaiveDate,
        diagnostics: &mut RunDiagnostics,
    ) -> MarketSnapshot {
        let timeout = Duration::from_secs(self.config.fetch_timeout_secs);
        let fetches = self.config.symbols.iter().map(|symbol| {
            let provider = Arc::clone(&self.provider);
            async move {
                let result =
                    tokio::time::timeout(timeout, provider.get_option_chain(symbol, date)).await;
                (symbol.clone(), result)
            }
        });

        let mut snapshot = MarketSnapshot::new(date);
        for (symbol, result) in join_all(fetches).await {
            match result {
                Ok(Ok(chain)) => {
                    debug!(symbol = %symbol, date = %date, rows = chain.len(), "Chain fetched");
                    snapshot.add_chain(&symbol, chain);
                }
                Ok(Err(error)) => {
                    warn!(symbol = %symbol, date = %date, %error, "Skipping symbol for the day");
                    diagnostics.record(
                        date,
                        Some(&symbol),
                        IncidentKind::DataUnavailable,
                        error.to_string(),
                    );
                }
                Err(_elapsed) => {
                    warn!(symbol = %symbol, date = %date, "Chain fetch timed out");
                    diagnostics.record_error(
                        date,
                        &EngineError::FetchTimeout {
                            symbol: symbol.clone(),
                            date,
                        },
                    );
                }
            }
        }
        snapshot
    }

    /// Evaluate exits for every open position against the day's snapshot.
    ///
    /// Strategy exits take precedence over the hard expiration check. A
    /// position whose contract has no quote today is carried forward
    /// unchanged.
    async fn evaluate_exits(
        &self,
        ledger: &mut PositionLedger,
        snapshot: &MarketSnapshot,
        date: NaiveDate,
        diagnostics: &mut RunDiagnostics,
    ) {
        let mut marks: Vec<(u64, Decimal)> = Vec::new();
        let mut closes: Vec<(u64, Decimal, ExitReason)> = Vec::new();

        for position in ledger.open_positions() {
            if !snapshot.chains.contains_key(&position.symbol) {
                // Symbol-level gap was already recorded at fetch time.
                continue;
            }

            let Some(quote) = snapshot.find_quote(
                &position.symbol,
                position.option_type,
                position.strike,
                position.expiration,
            ) else {
                diagnostics.record_error(
                    date,
                    &EngineError::MissingMarketQuote {
                        symbol: position.symbol.clone(),
                        date,
                    },
                );
                continue;
            };

            let mark = quote.mark();
            marks.push((position.position_id, mark));

            if let Some(reason) = self.strategy.check_exit_criteria(position, quote, date).await {
                closes.push((position.position_id, mark, reason));
            } else if position.is_expired(date) {
                closes.push((position.position_id, mark, ExitReason::Expiration));
            }
        }

        for (position_id, mark) in marks {
            ledger.set_mark(position_id, mark);
        }
        for (position_id, mark, reason) in closes {
            ledger.close_position(position_id, Some(mark), date, reason);
        }
    }

    /// Request signals and open positions until capacity or signals run out.
    async fn open_entries(
        &self,
        ledger: &mut PositionLedger,
        snapshot: &MarketSnapshot,
        date: NaiveDate,
        diagnostics: &mut RunDiagnostics,
    ) {
        if ledger.open_count() >= self.config.max_positions {
            return;
        }

        let signals = self.strategy.generate_signals(snapshot, date).await;
        for signal in signals {
            if ledger.open_count() >= self.config.max_positions {
                break;
            }
            if let Err(error) = ledger.open_position(&signal, date) {
                warn!(symbol = %signal.symbol, date = %date, %error, "Entry rejected");
                diagnostics.record_error(date, &error);
            }
        }
    }

    /// Close every remaining position at the configured end date.
    fn force_close_remaining(&self, ledger: &mut PositionLedger, snapshot: Option<&MarketSnapshot>) {
        let end_date = self.config.end_date;
        for position_id in ledger.open_position_ids() {
            let mark = ledger
                .open_positions()
                .iter()
                .find(|p| p.position_id == position_id)
                .and_then(|position| {
                    snapshot?.find_quote(
                        &position.symbol,
                        position.option_type,
                        position.strike,
                        position.expiration,
                    )
                })
                .map(|quote| quote.mark());

            ledger.close_position(position_id, mark, end_date, ExitReason::EndOfBacktest);
        }
    }

    /// Hand the finished run to the results sink.
    async fn persist(&self, sink: &dyn ResultsSink, run: &BacktestRun) -> Result<(), EngineError> {
        let run_id = sink.persist(run).await?;
        for trade in &run.closed_trades {
            sink.persist_trade(run_id, trade).await?;
        }
        info!(%run_id, trades = run.closed_trades.len(), "Run persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClosedTrade, EntrySignal, OptionQuote, Position};
    use crate::ports::{InMemoryResultsSink, ProviderError, SinkError};
    use async_trait::async_trait;
    use mockall::mock;
    use uuid::Uuid;

    mock! {
        Provider {}

        #[async_trait]
        impl MarketDataProvider for Provider {
            async fn get_option_chain(
                &self,
                symbol: &str,
                date: NaiveDate,
            ) -> Result<Vec<OptionQuote>, ProviderError>;

            async fn underlying_history(
                &self,
                symbol: &str,
                start: NaiveDate,
                end: NaiveDate,
            ) -> Result<Vec<(NaiveDate, Decimal)>, ProviderError>;
        }
    }

    struct NoSignals;

    #[async_trait]
    impl Strategy for NoSignals {
        fn name(&self) -> &str {
            "no-signals"
        }

        async fn generate_signals(
            &self,
            _snapshot: &MarketSnapshot,
            _date: NaiveDate,
        ) -> Vec<EntrySignal> {
            Vec::new()
        }

        async fn check_exit_criteria(
            &self,
            _position: &Position,
            _quote: &OptionQuote,
            _date: NaiveDate,
        ) -> Option<ExitReason> {
            None
        }
    }

    struct FailingSink;

    #[async_trait]
    impl ResultsSink for FailingSink {
        async fn persist(&self, _run: &BacktestRun) -> Result<Uuid, SinkError> {
            Err(SinkError("storage rejected the run".to_string()))
        }

        async fn persist_trade(
            &self,
            _run_id: Uuid,
            _trade: &ClosedTrade,
        ) -> Result<(), SinkError> {
            Ok(())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn three_day_config() -> BacktestConfig {
        BacktestConfig::new(
            vec!["AAPL".to_string()],
            date(2026, 8, 3),
            date(2026, 8, 5),
        )
    }

    #[tokio::test]
    async fn sink_failure_is_fatal_but_preserves_partial_output() {
        let mut provider = MockProvider::new();
        provider
            .expect_get_option_chain()
            .returning(|_, _| Ok(Vec::new()));

        let engine = BacktestEngine::new(
            three_day_config(),
            Arc::new(provider),
            Arc::new(NoSignals),
        );
        let mut diagnostics = RunDiagnostics::new();

        let failure = engine
            .run(&FailingSink, &mut diagnostics)
            .await
            .unwrap_err();

        assert!(matches!(failure.error, EngineError::Sink(_)));
        assert!(failure.error.is_fatal());
        // The full equity history survives the abort
        assert_eq!(failure.equity_curve.len(), 3);
    }

    #[tokio::test]
    async fn provider_errors_skip_the_symbol_not_the_day() {
        let mut provider = MockProvider::new();
        provider
            .expect_get_option_chain()
            .returning(|_, _| Err(ProviderError::Backend("connection reset".to_string())));

        let engine = BacktestEngine::new(
            three_day_config(),
            Arc::new(provider),
            Arc::new(NoSignals),
        );
        let sink = InMemoryResultsSink::new();
        let mut diagnostics = RunDiagnostics::new();

        let run = engine.run(&sink, &mut diagnostics).await.unwrap();

        // Every day still produced an equity point from cash alone
        assert_eq!(run.equity_curve.len(), 3);
        assert_eq!(diagnostics.count(IncidentKind::DataUnavailable), 3);
        assert_eq!(run.final_capital, run.initial_capital);
    }
}
