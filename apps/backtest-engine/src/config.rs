//! Backtest run configuration.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

fn default_initial_capital() -> Decimal {
    Decimal::new(100_000, 0)
}

fn default_max_positions() -> usize {
    5
}

fn default_position_size_pct() -> Decimal {
    Decimal::new(1, 1) // 0.1
}

fn default_commission_per_contract() -> Decimal {
    Decimal::new(65, 2) // $0.65
}

fn default_slippage_pct() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

/// Parameters of a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Symbols to trade.
    pub symbols: Vec<String>,
    /// First simulated date (inclusive).
    pub start_date: NaiveDate,
    /// Last simulated date (inclusive).
    pub end_date: NaiveDate,
    /// Starting capital.
    #[serde(default = "default_initial_capital")]
    pub initial_capital: Decimal,
    /// Maximum concurrent open positions.
    #[serde(default = "default_max_positions")]
    pub max_positions: usize,
    /// Per-entry budget as a fraction of current capital.
    #[serde(default = "default_position_size_pct")]
    pub position_size_pct: Decimal,
    /// Commission per option contract.
    #[serde(default = "default_commission_per_contract")]
    pub commission_per_contract: Decimal,
    /// Fill slippage as a fraction of the quoted premium.
    #[serde(default = "default_slippage_pct")]
    pub slippage_pct: Decimal,
    /// Per-symbol fetch timeout in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl BacktestConfig {
    /// Config with default sizing and cost parameters.
    #[must_use]
    pub fn new(symbols: Vec<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            symbols,
            start_date,
            end_date,
            initial_capital: default_initial_capital(),
            max_positions: default_max_positions(),
            position_size_pct: default_position_size_pct(),
            commission_per_contract: default_commission_per_contract(),
            slippage_pct: default_slippage_pct(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }

    /// Load configuration from an optional TOML file layered under
    /// `BACKTEST_`-prefixed environment variables.
    pub fn load(file: Option<&std::path::Path>) -> Result<Self, EngineError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("BACKTEST")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("symbols"),
        );

        let settings = builder
            .build()
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        let config: Self = settings
            .try_deserialize()
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate run parameters.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.symbols.is_empty() {
            return Err(EngineError::InvalidConfig("no symbols configured".into()));
        }
        if self.start_date > self.end_date {
            return Err(EngineError::InvalidConfig(format!(
                "start date {} is after end date {}",
                self.start_date, self.end_date
            )));
        }
        if self.initial_capital <= Decimal::ZERO {
            return Err(EngineError::InvalidConfig(
                "initial capital must be positive".into(),
            ));
        }
        if self.max_positions == 0 {
            return Err(EngineError::InvalidConfig(
                "max positions must be at least 1".into(),
            ));
        }
        if self.position_size_pct <= Decimal::ZERO || self.position_size_pct > Decimal::ONE {
            return Err(EngineError::InvalidConfig(
                "position size must be within (0, 1]".into(),
            ));
        }
        if self.commission_per_contract < Decimal::ZERO {
            return Err(EngineError::InvalidConfig(
                "commission must not be negative".into(),
            ));
        }
        if self.slippage_pct < Decimal::ZERO || self.slippage_pct >= Decimal::ONE {
            return Err(EngineError::InvalidConfig(
                "slippage must be within [0, 1)".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config() -> BacktestConfig {
        BacktestConfig::new(
            vec!["AAPL".to_string()],
            date(2026, 8, 3),
            date(2026, 8, 28),
        )
    }

    #[test]
    fn defaults_match_run_parameters() {
        let config = config();
        assert_eq!(config.initial_capital, dec!(100000));
        assert_eq!(config.max_positions, 5);
        assert_eq!(config.position_size_pct, dec!(0.1));
        assert_eq!(config.commission_per_contract, dec!(0.65));
        assert_eq!(config.slippage_pct, dec!(0.01));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_date_range() {
        let mut config = config();
        config.start_date = date(2026, 9, 1);
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_non_positive_capital() {
        let mut config = config();
        config.initial_capital = Decimal::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_max_positions() {
        let mut config = config();
        config.max_positions = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_percentages() {
        let mut oversized = config();
        oversized.position_size_pct = dec!(1.5);
        assert!(oversized.validate().is_err());

        let mut slipped = config();
        slipped.slippage_pct = dec!(1);
        assert!(slipped.validate().is_err());
    }

    #[test]
    fn rejects_empty_symbols() {
        let mut config = config();
        config.symbols.clear();
        assert!(config.validate().is_err());
    }
}
