// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Backtest Engine - Rust Core Library
//!
//! Replays historical options-market snapshots day-by-day against a pluggable
//! trading strategy, simulates capital-constrained position lifecycles with
//! commissions and slippage, and computes return/risk/trade analytics.
//!
//! # Architecture
//!
//! - **Orchestrator** (`engine`): drives the trading-day loop — exits before
//!   entries, one equity point per day, end-of-run liquidation, analytics.
//! - **Ledger** (`ledger`, `slippage`, `commission`): owns open positions and
//!   capital; computes slippage-adjusted fills and enforces affordability.
//! - **Analytics** (`metrics`): pure function over the equity curve and
//!   closed trades producing the metric set.
//! - **Ports** (`ports`): narrow interfaces for the external collaborators —
//!   market data, the strategy under test, and the results store.
//!
//! Non-fatal conditions (missing data, rejected entries) are collected on an
//! explicit [`diagnostics::RunDiagnostics`] passed into the run; fatal
//! failures abort with partial output preserved ([`error::RunFailure`]).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Trading-day calendar.
pub mod calendar;

/// Commission and position-cost arithmetic.
pub mod commission;

/// Run configuration.
pub mod config;

/// Per-run incident reporting.
pub mod diagnostics;

/// Backtest orchestration.
pub mod engine;

/// Error taxonomy.
pub mod error;

/// Position ledger and order execution.
pub mod ledger;

/// Performance analytics.
pub mod metrics;

/// Core domain types.
pub mod models;

/// Ports for external collaborators.
pub mod ports;

/// Fill-price slippage.
pub mod slippage;

/// Reference strategies.
pub mod strategies;

/// Tracing setup.
pub mod telemetry;

pub use config::BacktestConfig;
pub use diagnostics::{Incident, IncidentKind, RunDiagnostics};
pub use engine::BacktestEngine;
pub use error::{EngineError, RunFailure};
pub use ledger::PositionLedger;
pub use metrics::{PROFIT_FACTOR_CAP, PerformanceMetrics, calculate_performance};
pub use models::{
    BacktestRun, CONTRACT_MULTIPLIER, ClosedTrade, EntrySignal, EquityPoint, ExitReason, Greeks,
    MarketSnapshot, OptionQuote, OptionType, Position,
};
pub use ports::{
    InMemoryMarketData, InMemoryResultsSink, MarketDataProvider, ProviderError, ResultsSink,
    SinkError, Strategy,
};
pub use strategies::ThresholdStrategy;
