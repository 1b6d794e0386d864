//! Commission and position-cost arithmetic.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::models::CONTRACT_MULTIPLIER;

/// Total commission for a fill of `contracts` contracts.
#[must_use]
pub fn contracts_commission(per_contract: Decimal, contracts: u32) -> Decimal {
    per_contract * Decimal::from(contracts)
}

/// All-in cost of buying `contracts` contracts at `fill_price`.
#[must_use]
pub fn position_cost(fill_price: Decimal, contracts: u32, per_contract: Decimal) -> Decimal {
    fill_price * CONTRACT_MULTIPLIER * Decimal::from(contracts)
        + contracts_commission(per_contract, contracts)
}

/// Net proceeds of selling `contracts` contracts at `fill_price`.
#[must_use]
pub fn sale_proceeds(fill_price: Decimal, contracts: u32, per_contract: Decimal) -> Decimal {
    fill_price * CONTRACT_MULTIPLIER * Decimal::from(contracts)
        - contracts_commission(per_contract, contracts)
}

/// Contracts purchasable with `budget` at the quoted `price`, ignoring
/// commissions and slippage (the initial sizing pass).
#[must_use]
pub fn contracts_for_budget(budget: Decimal, price: Decimal) -> u32 {
    if price <= Decimal::ZERO {
        return 0;
    }
    (budget / (price * CONTRACT_MULTIPLIER))
        .floor()
        .to_u32()
        .unwrap_or(0)
}

/// Largest contract count whose all-in cost fits within `capital`.
#[must_use]
pub fn max_affordable_contracts(
    capital: Decimal,
    fill_price: Decimal,
    per_contract: Decimal,
) -> u32 {
    let unit_cost = fill_price * CONTRACT_MULTIPLIER + per_contract;
    if unit_cost <= Decimal::ZERO {
        return 0;
    }
    (capital / unit_cost).floor().to_u32().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    #[test]
    fn position_cost_includes_per_contract_commission() {
        // 2.02 * 100 * 10 + 0.65 * 10
        assert_eq!(position_cost(dec!(2.02), 10, dec!(0.65)), dec!(2026.50));
    }

    #[test]
    fn sale_proceeds_deduct_commission() {
        // 2.97 * 100 * 10 - 0.65 * 10
        assert_eq!(sale_proceeds(dec!(2.97), 10, dec!(0.65)), dec!(2963.50));
    }

    #[test_case(dec!(2000), dec!(2.00), 10; "exact fit")]
    #[test_case(dec!(1999), dec!(2.00), 9; "floors fractional contracts")]
    #[test_case(dec!(150), dec!(2.00), 0; "budget below one contract")]
    fn budget_sizing(budget: Decimal, price: Decimal, expected: u32) {
        assert_eq!(contracts_for_budget(budget, price), expected);
    }

    #[test]
    fn budget_sizing_guards_zero_price() {
        assert_eq!(contracts_for_budget(dec!(1000), Decimal::ZERO), 0);
    }

    #[test]
    fn affordable_contracts_account_for_commission() {
        // Unit cost 202.65; 10 units cost 2026.50
        assert_eq!(
            max_affordable_contracts(dec!(2026.50), dec!(2.02), dec!(0.65)),
            10
        );
        assert_eq!(
            max_affordable_contracts(dec!(2026.49), dec!(2.02), dec!(0.65)),
            9
        );
    }

    #[test]
    fn affordable_cost_never_exceeds_capital() {
        let capital = dec!(5000);
        let fill = dec!(1.37);
        let per_contract = dec!(0.65);
        let contracts = max_affordable_contracts(capital, fill, per_contract);
        assert!(position_cost(fill, contracts, per_contract) <= capital);
        assert!(position_cost(fill, contracts + 1, per_contract) > capital);
    }
}
