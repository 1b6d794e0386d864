//! Core domain types for the backtest engine.

mod option;
mod position;
mod run;
mod signal;

pub use option::{CONTRACT_MULTIPLIER, Greeks, MarketSnapshot, OptionQuote, OptionType};
pub use position::{ClosedTrade, ExitReason, Position};
pub use run::{BacktestRun, EquityPoint};
pub use signal::EntrySignal;
