//! Option-contract market data types.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shares represented by one option contract.
pub const CONTRACT_MULTIPLIER: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Option contract type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Call option.
    Call,
    /// Put option.
    Put,
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// Option greeks as supplied by the data provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Greeks {
    /// Implied volatility.
    pub iv: Decimal,
    /// Delta.
    pub delta: Decimal,
    /// Gamma.
    pub gamma: Decimal,
    /// Theta.
    pub theta: Decimal,
    /// Vega.
    pub vega: Decimal,
}

/// A single option-chain row for one contract on one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Underlying symbol.
    pub symbol: String,
    /// Call or put.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: Decimal,
    /// Expiration date.
    pub expiration: NaiveDate,
    /// Best bid.
    pub bid: Decimal,
    /// Best ask.
    pub ask: Decimal,
    /// Last traded price.
    pub last: Decimal,
    /// Day volume in contracts.
    pub volume: u64,
    /// Outstanding contracts for the series.
    pub open_interest: u64,
    /// Underlying price at snapshot time.
    pub underlying_price: Decimal,
    /// Greeks, when the provider supplies them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeks: Option<Greeks>,
}

impl OptionQuote {
    /// Midpoint of the bid/ask spread.
    #[must_use]
    pub fn mid(&self) -> Decimal {
        (self.bid + self.ask) / Decimal::TWO
    }

    /// Price used to mark and exit positions: last trade when one exists,
    /// otherwise the spread midpoint.
    #[must_use]
    pub fn mark(&self) -> Decimal {
        if self.last > Decimal::ZERO {
            self.last
        } else {
            self.mid()
        }
    }

    /// Dollar-equivalent size of the day's trading in this contract.
    #[must_use]
    pub fn notional_value(&self) -> Decimal {
        self.last * Decimal::from(self.volume) * CONTRACT_MULTIPLIER
    }
}

/// One day's market data across all requested symbols.
///
/// Symbols whose fetch failed or timed out are simply absent from `chains`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Snapshot date.
    pub date: NaiveDate,
    /// Option chains keyed by underlying symbol.
    pub chains: HashMap<String, Vec<OptionQuote>>,
    /// Underlying prices keyed by symbol.
    pub underlying_prices: HashMap<String, Decimal>,
}

impl MarketSnapshot {
    /// Create an empty snapshot for a date.
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            chains: HashMap::new(),
            underlying_prices: HashMap::new(),
        }
    }

    /// Add a symbol's chain, recording the underlying price from the first row.
    pub fn add_chain(&mut self, symbol: &str, chain: Vec<OptionQuote>) {
        if let Some(first) = chain.first() {
            self.underlying_prices
                .insert(symbol.to_string(), first.underlying_price);
        }
        self.chains.insert(symbol.to_string(), chain);
    }

    /// Find the quote for a specific contract, if present today.
    #[must_use]
    pub fn find_quote(
        &self,
        symbol: &str,
        option_type: OptionType,
        strike: Decimal,
        expiration: NaiveDate,
    ) -> Option<&OptionQuote> {
        self.chains.get(symbol)?.iter().find(|q| {
            q.option_type == option_type && q.strike == strike && q.expiration == expiration
        })
    }

    /// Whether any symbol has data today.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
