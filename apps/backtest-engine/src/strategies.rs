//! Reference strategy implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{
    CONTRACT_MULTIPLIER, EntrySignal, ExitReason, MarketSnapshot, OptionQuote, Position,
};
use crate::ports::Strategy;

/// Liquidity-threshold strategy.
///
/// Enters the most actively traded contracts that clear volume and
/// open-interest floors, and exits on a profit target, stop loss, or a
/// maximum holding period.
#[derive(Debug, Clone)]
pub struct ThresholdStrategy {
    /// Minimum day volume for a candidate contract.
    pub min_volume: u64,
    /// Minimum open interest for a candidate contract.
    pub min_open_interest: u64,
    /// Most signals emitted per day.
    pub max_signals_per_day: usize,
    /// Exit when unrealized return reaches this percentage.
    pub profit_target_pct: Decimal,
    /// Exit when unrealized return falls to minus this percentage.
    pub stop_loss_pct: Decimal,
    /// Exit after holding this many calendar days.
    pub max_hold_days: i64,
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        Self {
            min_volume: 100,
            min_open_interest: 500,
            max_signals_per_day: 3,
            profit_target_pct: Decimal::new(50, 0),
            stop_loss_pct: Decimal::new(30, 0),
            max_hold_days: 10,
        }
    }
}

impl ThresholdStrategy {
    fn is_candidate(&self, quote: &OptionQuote, date: NaiveDate) -> bool {
        quote.last > Decimal::ZERO
            && quote.volume >= self.min_volume
            && quote.open_interest >= self.min_open_interest
            && quote.expiration > date
    }

    /// Unrealized return of `position` at the day's quote, percent.
    fn unrealized_pct(position: &Position, quote: &OptionQuote) -> Decimal {
        if position.cost_basis <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let value = quote.mark() * CONTRACT_MULTIPLIER * Decimal::from(position.contracts);
        (value - position.cost_basis) / position.cost_basis * Decimal::ONE_HUNDRED
    }
}

#[async_trait]
impl Strategy for ThresholdStrategy {
    fn name(&self) -> &str {
        "liquidity-threshold"
    }

    async fn generate_signals(
        &self,
        snapshot: &MarketSnapshot,
        date: NaiveDate,
    ) -> Vec<EntrySignal> {
        let mut candidates: Vec<&OptionQuote> = snapshot
            .chains
            .values()
            .flatten()
            .filter(|quote| self.is_candidate(quote, date))
            .collect();

        // Most notionally active first
        candidates.sort_by(|a, b| b.notional_value().cmp(&a.notional_value()));

        candidates
            .into_iter()
            .take(self.max_signals_per_day)
            .map(|quote| EntrySignal {
                symbol: quote.symbol.clone(),
                option_type: quote.option_type,
                strike: quote.strike,
                expiration: quote.expiration,
                price: quote.mark(),
            })
            .collect()
    }

    async fn check_exit_criteria(
        &self,
        position: &Position,
        quote: &OptionQuote,
        date: NaiveDate,
    ) -> Option<ExitReason> {
        let unrealized = Self::unrealized_pct(position, quote);

        if unrealized >= self.profit_target_pct {
            return Some(ExitReason::ProfitTarget);
        }
        if unrealized <= -self.stop_loss_pct {
            return Some(ExitReason::StopLoss);
        }
        if position.holding_days(date) >= self.max_hold_days {
            return Some(ExitReason::TimeStop);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OptionType;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn quote(symbol: &str, last: Decimal, volume: u64, open_interest: u64) -> OptionQuote {
        OptionQuote {
            symbol: symbol.to_string(),
            option_type: OptionType::Call,
            strike: dec!(150),
            expiration: date(2026, 9, 18),
            bid: last - dec!(0.05),
            ask: last + dec!(0.05),
            last,
            volume,
            open_interest,
            underlying_price: dec!(151),
            greeks: None,
        }
    }

    fn position(cost_basis: Decimal, entry: NaiveDate) -> Position {
        Position {
            position_id: 1,
            symbol: "AAPL".to_string(),
            option_type: OptionType::Call,
            strike: dec!(150),
            expiration: date(2026, 9, 18),
            entry_date: entry,
            entry_price: dec!(2.02),
            contracts: 10,
            cost_basis,
            current_price: dec!(2.02),
        }
    }

    #[tokio::test]
    async fn signals_respect_thresholds_and_cap() {
        let strategy = ThresholdStrategy {
            max_signals_per_day: 2,
            ..ThresholdStrategy::default()
        };

        let mut snapshot = MarketSnapshot::new(date(2026, 8, 3));
        snapshot.add_chain(
            "AAPL",
            vec![
                quote("AAPL", dec!(2.00), 5000, 10000),
                quote("AAPL", dec!(1.50), 50, 10000), // below volume floor
                quote("AAPL", dec!(1.00), 5000, 100), // below OI floor
            ],
        );
        snapshot.add_chain("MSFT", vec![quote("MSFT", dec!(3.00), 9000, 8000)]);

        let signals = strategy
            .generate_signals(&snapshot, date(2026, 8, 3))
            .await;

        assert_eq!(signals.len(), 2);
        // MSFT contract has the larger notional and sorts first
        assert_eq!(signals[0].symbol, "MSFT");
        assert_eq!(signals[1].symbol, "AAPL");
    }

    #[tokio::test]
    async fn no_signal_for_expiring_contract() {
        let strategy = ThresholdStrategy::default();
        let today = date(2026, 9, 18);

        let mut snapshot = MarketSnapshot::new(today);
        snapshot.add_chain("AAPL", vec![quote("AAPL", dec!(2.00), 5000, 10000)]);

        assert!(strategy.generate_signals(&snapshot, today).await.is_empty());
    }

    #[tokio::test]
    async fn profit_target_fires_before_time_stop() {
        let strategy = ThresholdStrategy::default();
        let entry = date(2026, 8, 3);
        let position = position(dec!(2000), entry);

        // Mark 3.10 -> value 3100 -> +55%
        let reason = strategy
            .check_exit_criteria(
                &position,
                &quote("AAPL", dec!(3.10), 5000, 10000),
                entry + chrono::Days::new(20),
            )
            .await;

        assert_eq!(reason, Some(ExitReason::ProfitTarget));
    }

    #[tokio::test]
    async fn stop_loss_fires_on_drawdown() {
        let strategy = ThresholdStrategy::default();
        let entry = date(2026, 8, 3);
        let position = position(dec!(2000), entry);

        // Mark 1.30 -> value 1300 -> -35%
        let reason = strategy
            .check_exit_criteria(
                &position,
                &quote("AAPL", dec!(1.30), 5000, 10000),
                entry + chrono::Days::new(1),
            )
            .await;

        assert_eq!(reason, Some(ExitReason::StopLoss));
    }

    #[tokio::test]
    async fn time_stop_fires_after_max_hold() {
        let strategy = ThresholdStrategy::default();
        let entry = date(2026, 8, 3);
        let position = position(dec!(2000), entry);

        // Mark 2.00 -> flat
        let reason = strategy
            .check_exit_criteria(
                &position,
                &quote("AAPL", dec!(2.00), 5000, 10000),
                entry + chrono::Days::new(10),
            )
            .await;

        assert_eq!(reason, Some(ExitReason::TimeStop));
    }

    #[tokio::test]
    async fn holds_inside_all_bounds() {
        let strategy = ThresholdStrategy::default();
        let entry = date(2026, 8, 3);
        let position = position(dec!(2000), entry);

        let reason = strategy
            .check_exit_criteria(
                &position,
                &quote("AAPL", dec!(2.10), 5000, 10000),
                entry + chrono::Days::new(2),
            )
            .await;

        assert_eq!(reason, None);
    }
}
