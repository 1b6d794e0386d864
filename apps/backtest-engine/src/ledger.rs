//! Position ledger and order execution.
//!
//! The ledger owns every open position and the cash balance. Entries are
//! sized from current capital, filled with adverse slippage, and charged
//! per-contract commission; exits credit net proceeds back. Capital is
//! conserved: cash plus committed cost basis minus realized P&L always equals
//! the starting capital.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::commission::{
    contracts_for_budget, max_affordable_contracts, position_cost, sale_proceeds,
};
use crate::config::BacktestConfig;
use crate::error::EngineError;
use crate::models::{ClosedTrade, EntrySignal, EquityPoint, ExitReason, Position};
use crate::slippage::{entry_fill_price, exit_fill_price};

/// Owns open positions, closed trades, and the cash balance for one run.
#[derive(Debug)]
pub struct PositionLedger {
    initial_capital: Decimal,
    capital: Decimal,
    realized_pnl: Decimal,
    open: Vec<Position>,
    closed: Vec<ClosedTrade>,
    position_size_pct: Decimal,
    commission_per_contract: Decimal,
    slippage_pct: Decimal,
    position_counter: u64,
}

impl PositionLedger {
    /// Create a ledger funded with the configured initial capital.
    #[must_use]
    pub fn new(config: &BacktestConfig) -> Self {
        Self {
            initial_capital: config.initial_capital,
            capital: config.initial_capital,
            realized_pnl: Decimal::ZERO,
            open: Vec::new(),
            closed: Vec::new(),
            position_size_pct: config.position_size_pct,
            commission_per_contract: config.commission_per_contract,
            slippage_pct: config.slippage_pct,
            position_counter: 0,
        }
    }

    /// Uncommitted cash.
    #[must_use]
    pub const fn capital(&self) -> Decimal {
        self.capital
    }

    /// Open positions in entry order.
    #[must_use]
    pub fn open_positions(&self) -> &[Position] {
        &self.open
    }

    /// Number of open positions.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Identifiers of all open positions.
    #[must_use]
    pub fn open_position_ids(&self) -> Vec<u64> {
        self.open.iter().map(|p| p.position_id).collect()
    }

    /// Closed trades in close order.
    #[must_use]
    pub fn closed_trades(&self) -> &[ClosedTrade] {
        &self.closed
    }

    /// Consume the ledger, yielding its closed-trade log.
    #[must_use]
    pub fn into_closed_trades(self) -> Vec<ClosedTrade> {
        self.closed
    }

    /// Open a position from a strategy signal.
    ///
    /// Sizing: budget = capital x position_size_pct, contracts floored at the
    /// quoted price. The fill worsens by slippage; if the all-in cost exceeds
    /// available capital the count is clamped to the largest affordable
    /// number of contracts. Either pass yielding fewer than one contract
    /// rejects the entry.
    pub fn open_position(
        &mut self,
        signal: &EntrySignal,
        date: NaiveDate,
    ) -> Result<Position, EngineError> {
        if !signal.is_valid() {
            return Err(EngineError::InvalidSignal {
                symbol: signal.symbol.clone(),
                detail: format!("price {} is not tradable", signal.price),
            });
        }

        let budget = self.capital * self.position_size_pct;
        let mut contracts = contracts_for_budget(budget, signal.price);
        if contracts < 1 {
            return Err(EngineError::InsufficientCapital {
                symbol: signal.symbol.clone(),
                detail: format!("budget {budget} sizes 0 contracts at {}", signal.price),
            });
        }

        let fill_price = entry_fill_price(signal.price, signal.option_type, self.slippage_pct);
        let mut cost = position_cost(fill_price, contracts, self.commission_per_contract);

        if cost > self.capital {
            contracts =
                max_affordable_contracts(self.capital, fill_price, self.commission_per_contract);
            if contracts < 1 {
                return Err(EngineError::InsufficientCapital {
                    symbol: signal.symbol.clone(),
                    detail: format!("capital {} cannot cover one contract", self.capital),
                });
            }
            cost = position_cost(fill_price, contracts, self.commission_per_contract);
        }

        self.position_counter += 1;
        let position = Position {
            position_id: self.position_counter,
            symbol: signal.symbol.clone(),
            option_type: signal.option_type,
            strike: signal.strike,
            expiration: signal.expiration,
            entry_date: date,
            entry_price: fill_price,
            contracts,
            cost_basis: cost,
            current_price: fill_price,
        };

        self.capital -= cost;
        self.open.push(position.clone());

        info!(
            position_id = position.position_id,
            symbol = %position.symbol,
            option_type = %position.option_type,
            strike = %position.strike,
            expiration = %position.expiration,
            contracts,
            fill_price = %fill_price,
            cost = %cost,
            "Opened position"
        );

        Ok(position)
    }

    /// Refresh an open position's mark from the day's quote.
    pub fn set_mark(&mut self, position_id: u64, mark: Decimal) {
        if let Some(position) = self.open.iter_mut().find(|p| p.position_id == position_id) {
            position.current_price = mark;
        }
    }

    /// Close an open position.
    ///
    /// `quote_mark` is the day's price for the contract; `None` falls back to
    /// the position's last known price (the stale-price policy for contracts
    /// missing from the final snapshot). Returns the closed trade, or `None`
    /// when no open position has `position_id`.
    pub fn close_position(
        &mut self,
        position_id: u64,
        quote_mark: Option<Decimal>,
        date: NaiveDate,
        reason: ExitReason,
    ) -> Option<ClosedTrade> {
        let index = self.open.iter().position(|p| p.position_id == position_id)?;
        let position = self.open.remove(index);

        let exit_base = quote_mark.unwrap_or(position.current_price);
        let fill_price = exit_fill_price(exit_base, position.option_type, self.slippage_pct);
        let proceeds = sale_proceeds(fill_price, position.contracts, self.commission_per_contract);
        let profit_loss = proceeds - position.cost_basis;
        let profit_loss_pct = if position.cost_basis > Decimal::ZERO {
            profit_loss / position.cost_basis * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };

        self.capital += proceeds;
        self.realized_pnl += profit_loss;

        let trade = ClosedTrade {
            position_id: position.position_id,
            symbol: position.symbol,
            option_type: position.option_type,
            strike: position.strike,
            expiration: position.expiration,
            entry_date: position.entry_date,
            entry_price: position.entry_price,
            contracts: position.contracts,
            cost_basis: position.cost_basis,
            exit_date: date,
            exit_price: fill_price,
            exit_reason: reason,
            profit_loss,
            profit_loss_pct,
        };

        info!(
            position_id = trade.position_id,
            symbol = %trade.symbol,
            exit_reason = %reason,
            fill_price = %fill_price,
            proceeds = %proceeds,
            profit_loss = %profit_loss,
            "Closed position"
        );

        self.closed.push(trade.clone());
        Some(trade)
    }

    /// Mark value of all open positions.
    #[must_use]
    pub fn positions_value(&self) -> Decimal {
        self.open.iter().map(Position::market_value).sum()
    }

    /// End-of-day equity snapshot.
    #[must_use]
    pub fn equity_point(&self, date: NaiveDate) -> EquityPoint {
        let positions_value = self.positions_value();
        let point = EquityPoint {
            date,
            cash: self.capital,
            positions_value,
            total_equity: self.capital + positions_value,
        };
        debug!(
            date = %date,
            cash = %point.cash,
            positions_value = %point.positions_value,
            total_equity = %point.total_equity,
            "Equity snapshot"
        );
        point
    }

    /// Capital-conservation residual:
    /// `cash + committed cost basis - realized P&L - initial capital`.
    /// Zero at every point of a well-behaved simulation.
    #[must_use]
    pub fn conservation_residual(&self) -> Decimal {
        let committed: Decimal = self.open.iter().map(|p| p.cost_basis).sum();
        self.capital + committed - self.realized_pnl - self.initial_capital
    }
}
