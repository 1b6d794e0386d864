//! Error taxonomy for the backtest engine.
//!
//! Non-fatal conditions (missing data, rejected entries) are recorded and the
//! day loop continues; fatal conditions abort the run while preserving the
//! partial output accumulated so far.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{ClosedTrade, EquityPoint};
use crate::ports::{ProviderError, SinkError};

/// Engine error taxonomy.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No snapshot for a symbol on a day; the symbol is skipped for the day.
    #[error("no market data for {symbol} on {date}")]
    DataUnavailable {
        /// Symbol whose fetch failed.
        symbol: String,
        /// Trading day.
        date: NaiveDate,
    },

    /// A per-symbol fetch exceeded its timeout; treated as no data today.
    #[error("market data fetch timed out for {symbol} on {date}")]
    FetchTimeout {
        /// Symbol whose fetch timed out.
        symbol: String,
        /// Trading day.
        date: NaiveDate,
    },

    /// Position sizing produced fewer than one contract; the entry is skipped.
    #[error("insufficient capital for {symbol}: {detail}")]
    InsufficientCapital {
        /// Symbol of the rejected entry.
        symbol: String,
        /// Sizing detail for the log.
        detail: String,
    },

    /// A strategy signal failed shape validation; the entry is skipped.
    #[error("invalid signal for {symbol:?}: {detail}")]
    InvalidSignal {
        /// Symbol of the rejected signal.
        symbol: String,
        /// Validation detail.
        detail: String,
    },

    /// No quote for an open position's contract today; the position is
    /// carried at its last known price.
    #[error("no quote for open position {symbol} on {date}")]
    MissingMarketQuote {
        /// Symbol of the carried position.
        symbol: String,
        /// Trading day.
        date: NaiveDate,
    },

    /// Run parameters failed validation.
    #[error("invalid backtest configuration: {0}")]
    InvalidConfig(String),

    /// The results sink rejected the finished run.
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// Provider failure surfaced outside the per-symbol skip path.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl EngineError {
    /// Whether this error aborts the run.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::InvalidConfig(_) | Self::Sink(_) => true,
            Self::DataUnavailable { .. }
            | Self::FetchTimeout { .. }
            | Self::InsufficientCapital { .. }
            | Self::InvalidSignal { .. }
            | Self::MissingMarketQuote { .. }
            | Self::Provider(_) => false,
        }
    }
}

/// A fatal orchestration failure, carrying whatever the run produced before
/// aborting so callers can diagnose it.
#[derive(Debug, Error)]
#[error("backtest aborted: {error}")]
pub struct RunFailure {
    /// The fatal error.
    #[source]
    pub error: EngineError,
    /// Equity points recorded before the abort.
    pub equity_curve: Vec<EquityPoint>,
    /// Trades closed before the abort.
    pub closed_trades: Vec<ClosedTrade>,
}
