//! Performance metric output types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Full metric set for a finished backtest.
///
/// Every field defaults to zero; trade statistics stay zero when a run closes
/// no trades, and the risk ratios stay zero when the equity curve is too
/// short to support them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    // Overall performance
    /// Total return over the run, percent.
    pub total_return_pct: Decimal,
    /// Annualized return, percent.
    pub annualized_return_pct: Decimal,
    /// Annualized Sharpe ratio at a 0% risk-free rate.
    pub sharpe_ratio: Decimal,
    /// Annualized Sortino ratio (downside deviation denominator).
    pub sortino_ratio: Decimal,
    /// Worst peak-to-trough equity decline, percent; always <= 0.
    pub max_drawdown_pct: Decimal,
    /// Longest drawdown span in calendar days.
    pub max_drawdown_duration_days: i64,

    // Trade statistics
    /// Number of closed trades.
    pub total_trades: u64,
    /// Trades with positive profit.
    pub winning_trades: u64,
    /// Trades with zero or negative profit.
    pub losing_trades: u64,
    /// Winning share of all trades, percent.
    pub win_rate: Decimal,
    /// Mean per-trade return, percent.
    pub avg_profit_pct: Decimal,
    /// Mean per-trade profit, dollars.
    pub avg_profit_amount: Decimal,
    /// Gross profit over gross loss; see `PROFIT_FACTOR_CAP` for the
    /// zero-loss policy.
    pub profit_factor: Decimal,
    /// Longest run of consecutive winners.
    pub max_consecutive_wins: u64,
    /// Longest run of consecutive losers.
    pub max_consecutive_losses: u64,
    /// Best single trade return, percent.
    pub best_trade_pct: Decimal,
    /// Worst single trade return, percent.
    pub worst_trade_pct: Decimal,
    /// Mean holding period in calendar days.
    pub avg_trade_duration_days: Decimal,
}
