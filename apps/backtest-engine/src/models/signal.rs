//! Strategy entry signals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::option::OptionType;

/// A strategy's request to open a long option position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySignal {
    /// Underlying symbol.
    pub symbol: String,
    /// Call or put.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: Decimal,
    /// Expiration date.
    pub expiration: NaiveDate,
    /// Quoted contract price the signal was generated at.
    pub price: Decimal,
}

impl EntrySignal {
    /// Basic shape validation: a tradable signal names a symbol and carries a
    /// positive price.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.symbol.is_empty() && self.price > Decimal::ZERO
    }
}
