//! Fill-price slippage for simulated option orders.
//!
//! Fills are adjusted by a fixed percentage of the quoted premium, with the
//! direction keyed to contract type: call entries pay up and call exits
//! receive less, puts take the mirrored adjustment.

use rust_decimal::Decimal;

use crate::models::OptionType;

/// Entry fill for a long open: calls pay `price * (1 + pct)`, puts pay
/// `price * (1 - pct)`.
#[must_use]
pub fn entry_fill_price(price: Decimal, option_type: OptionType, slippage_pct: Decimal) -> Decimal {
    match option_type {
        OptionType::Call => price * (Decimal::ONE + slippage_pct),
        OptionType::Put => price * (Decimal::ONE - slippage_pct),
    }
}

/// Exit fill for a long close: calls receive `price * (1 - pct)`, puts receive
/// `price * (1 + pct)`.
#[must_use]
pub fn exit_fill_price(price: Decimal, option_type: OptionType, slippage_pct: Decimal) -> Decimal {
    match option_type {
        OptionType::Call => price * (Decimal::ONE - slippage_pct),
        OptionType::Put => price * (Decimal::ONE + slippage_pct),
    }
}
