//! Statistical helpers for performance metrics.

use rust_decimal::Decimal;

use super::constants::{TOLERANCE, TWO};

/// Mean of a slice of decimals.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum: Decimal = values.iter().sum();
    Some(sum / Decimal::from(values.len() as u64))
}

/// Sample standard deviation (n - 1 denominator).
pub fn std_dev(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }

    let avg = mean(values)?;
    let variance_sum: Decimal = values.iter().map(|v| (*v - avg) * (*v - avg)).sum();
    let variance = variance_sum / Decimal::from((values.len() - 1) as u64);

    sqrt_decimal(variance)
}

/// Sample standard deviation of the negative returns only.
///
/// `None` when fewer than two negative returns exist; a one-element sample
/// deviation is undefined.
pub fn downside_deviation(values: &[Decimal]) -> Option<Decimal> {
    let negative: Vec<Decimal> = values
        .iter()
        .filter(|v| **v < Decimal::ZERO)
        .copied()
        .collect();

    std_dev(&negative)
}

/// Approximate square root using Newton's method.
pub fn sqrt_decimal(value: Decimal) -> Option<Decimal> {
    if value < Decimal::ZERO {
        return None;
    }
    if value == Decimal::ZERO {
        return Some(Decimal::ZERO);
    }

    let mut guess = value / TWO;
    if guess == Decimal::ZERO {
        guess = value;
    }

    for _ in 0..50 {
        let next = (guess + value / guess) / TWO;
        if (next - guess).abs() < TOLERANCE {
            return Some(next);
        }
        guess = next;
    }

    Some(guess)
}
