//! Ports for external collaborators.
//!
//! The simulation core talks to market data, the strategy under test, and the
//! results store through these narrow interfaces; concrete adapters live with
//! the caller.

mod market_data;
mod results_sink;
mod strategy;

pub use market_data::{InMemoryMarketData, MarketDataProvider, ProviderError};
pub use results_sink::{InMemoryResultsSink, ResultsSink, SinkError};
pub use strategy::Strategy;
