//! Constants for performance metric calculations.

use rust_decimal::Decimal;

/// Trading days per year, for return-series annualization.
pub const TRADING_DAYS_PER_YEAR: Decimal = Decimal::from_parts(252, 0, 0, false, 0);

/// Calendar days per year, for duration-based annualization.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Profit factor reported when gross profit exists with zero gross loss.
pub const PROFIT_FACTOR_CAP: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Newton iteration convergence tolerance.
pub(crate) const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 12);

/// Two, for Newton's method averaging.
pub(crate) const TWO: Decimal = Decimal::from_parts(2, 0, 0, false, 0);
