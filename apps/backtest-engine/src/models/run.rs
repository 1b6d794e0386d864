//! Finished-run output types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::position::ClosedTrade;
use crate::metrics::PerformanceMetrics;

/// End-of-day portfolio valuation, one per simulated trading day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// Trading day.
    pub date: NaiveDate,
    /// Uncommitted capital.
    pub cash: Decimal,
    /// Open positions marked at end-of-day prices.
    pub positions_value: Decimal,
    /// `cash + positions_value`.
    pub total_equity: Decimal,
}

/// A finalized backtest: inputs, equity history, trades, and analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestRun {
    /// Strategy identifier.
    pub strategy: String,
    /// First simulated date.
    pub start_date: NaiveDate,
    /// Last simulated date.
    pub end_date: NaiveDate,
    /// Starting capital.
    pub initial_capital: Decimal,
    /// Capital after all positions closed.
    pub final_capital: Decimal,
    /// Daily equity curve, ordered by date.
    pub equity_curve: Vec<EquityPoint>,
    /// Closed trades in close order.
    pub closed_trades: Vec<ClosedTrade>,
    /// Computed performance metrics.
    pub metrics: PerformanceMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn equity_point_serde_round_trip() {
        let point = EquityPoint {
            date: NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(),
            cash: dec!(97973.50),
            positions_value: dec!(2020.00),
            total_equity: dec!(99993.50),
        };

        let json = serde_json::to_string(&point).unwrap();
        let parsed: EquityPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, point);
    }
}
