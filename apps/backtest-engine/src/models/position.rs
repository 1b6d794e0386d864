//! Position lifecycle types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::option::{CONTRACT_MULTIPLIER, OptionType};

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Profit target reached.
    ProfitTarget,
    /// Stop loss triggered.
    StopLoss,
    /// Maximum holding period reached.
    TimeStop,
    /// Contract expiration reached.
    Expiration,
    /// Forced close when the simulated date range ended.
    EndOfBacktest,
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::ProfitTarget => "profit_target",
            Self::StopLoss => "stop_loss",
            Self::TimeStop => "time_stop",
            Self::Expiration => "expiration",
            Self::EndOfBacktest => "end_of_backtest",
        };
        write!(f, "{label}")
    }
}

/// An open long option position, owned exclusively by the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Ledger-issued identifier, unique within a run.
    pub position_id: u64,
    /// Underlying symbol.
    pub symbol: String,
    /// Call or put.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: Decimal,
    /// Expiration date.
    pub expiration: NaiveDate,
    /// Date the position was opened.
    pub entry_date: NaiveDate,
    /// Slippage-adjusted fill price per contract.
    pub entry_price: Decimal,
    /// Number of contracts, always at least 1.
    pub contracts: u32,
    /// Entry fill notional plus commissions.
    pub cost_basis: Decimal,
    /// Last known mark for the contract.
    pub current_price: Decimal,
}

impl Position {
    /// Whether the contract has reached expiration as of `date`.
    #[must_use]
    pub fn is_expired(&self, date: NaiveDate) -> bool {
        self.expiration <= date
    }

    /// Current market value of the position at its last known mark.
    #[must_use]
    pub fn market_value(&self) -> Decimal {
        self.current_price * CONTRACT_MULTIPLIER * Decimal::from(self.contracts)
    }

    /// Unrealized return against cost basis, as a percentage.
    #[must_use]
    pub fn unrealized_pnl_pct(&self) -> Decimal {
        if self.cost_basis <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.market_value() - self.cost_basis) / self.cost_basis * Decimal::ONE_HUNDRED
    }

    /// Days the position has been held as of `date`.
    #[must_use]
    pub fn holding_days(&self, date: NaiveDate) -> i64 {
        (date - self.entry_date).num_days()
    }
}

/// Immutable record of a completed trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedTrade {
    /// Identifier carried over from the open position.
    pub position_id: u64,
    /// Underlying symbol.
    pub symbol: String,
    /// Call or put.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: Decimal,
    /// Expiration date.
    pub expiration: NaiveDate,
    /// Date the position was opened.
    pub entry_date: NaiveDate,
    /// Slippage-adjusted entry fill per contract.
    pub entry_price: Decimal,
    /// Number of contracts.
    pub contracts: u32,
    /// Entry fill notional plus commissions.
    pub cost_basis: Decimal,
    /// Date the position was closed.
    pub exit_date: NaiveDate,
    /// Slippage-adjusted exit fill per contract.
    pub exit_price: Decimal,
    /// Why the position closed.
    pub exit_reason: ExitReason,
    /// Net proceeds minus cost basis.
    pub profit_loss: Decimal,
    /// Profit as a percentage of cost basis.
    pub profit_loss_pct: Decimal,
}

impl ClosedTrade {
    /// Whether the trade finished profitable.
    #[must_use]
    pub fn is_winner(&self) -> bool {
        self.profit_loss > Decimal::ZERO
    }

    /// Calendar days between entry and exit.
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}
