//! Market data provider port.
//!
//! The engine consumes historical option-chain snapshots through this trait;
//! live acquisition (REST/WebSocket clients) lives behind it, outside the
//! simulation core.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::OptionQuote;

/// Market data provider failure.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// No data exists for the symbol/date.
    #[error("no option chain for {symbol} on {date}")]
    Unavailable {
        /// Requested symbol.
        symbol: String,
        /// Requested date.
        date: NaiveDate,
    },

    /// Backend failure (transport, decoding, storage).
    #[error("market data backend error: {0}")]
    Backend(String),
}

/// Port for historical option-chain data.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch the full option chain for a symbol on a date.
    async fn get_option_chain(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<Vec<OptionQuote>, ProviderError>;

    /// Daily underlying closes over `[start, end]`, for strategies that need
    /// a historical series when generating signals.
    async fn underlying_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, Decimal)>, ProviderError>;
}

/// In-memory provider backed by pre-loaded snapshots, for tests and fixtures.
#[derive(Debug, Default)]
pub struct InMemoryMarketData {
    chains: HashMap<String, BTreeMap<NaiveDate, Vec<OptionQuote>>>,
}

impl InMemoryMarketData {
    /// Create an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chains: HashMap::new(),
        }
    }

    /// Load a chain snapshot for a symbol/date.
    pub fn add_chain(&mut self, symbol: &str, date: NaiveDate, chain: Vec<OptionQuote>) {
        self.chains
            .entry(symbol.to_string())
            .or_default()
            .insert(date, chain);
    }
}

#[async_trait]
impl MarketDataProvider for InMemoryMarketData {
    async fn get_option_chain(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<Vec<OptionQuote>, ProviderError> {
        self.chains
            .get(symbol)
            .and_then(|by_date| by_date.get(&date))
            .cloned()
            .ok_or_else(|| ProviderError::Unavailable {
                symbol: symbol.to_string(),
                date,
            })
    }

    async fn underlying_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, Decimal)>, ProviderError> {
        let by_date = self
            .chains
            .get(symbol)
            .ok_or_else(|| ProviderError::Unavailable {
                symbol: symbol.to_string(),
                date: start,
            })?;

        Ok(by_date
            .range(start..=end)
            .filter_map(|(date, chain)| {
                chain.first().map(|quote| (*date, quote.underlying_price))
            })
            .collect())
    }
}
