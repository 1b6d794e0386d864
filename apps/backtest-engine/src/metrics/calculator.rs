//! Performance analytics over a finished equity curve and trade log.
//!
//! `calculate_performance` is a pure function of its inputs: no side effects,
//! deterministic, and total — degenerate inputs produce zeroed metrics, never
//! NaN and never a panic.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use super::constants::{DAYS_PER_YEAR, PROFIT_FACTOR_CAP, TRADING_DAYS_PER_YEAR};
use super::math::{downside_deviation, mean, sqrt_decimal, std_dev};
use super::types::PerformanceMetrics;
use crate::models::{ClosedTrade, EquityPoint};

/// Compute the full metric set for a run.
#[must_use]
pub fn calculate_performance(
    initial_capital: Decimal,
    final_capital: Decimal,
    equity_curve: &[EquityPoint],
    trades: &[ClosedTrade],
) -> PerformanceMetrics {
    let mut metrics = PerformanceMetrics::default();

    let total_return = if initial_capital > Decimal::ZERO {
        (final_capital - initial_capital) / initial_capital
    } else {
        Decimal::ZERO
    };
    metrics.total_return_pct = total_return * Decimal::ONE_HUNDRED;

    if !equity_curve.is_empty() {
        let first = &equity_curve[0];
        let last = &equity_curve[equity_curve.len() - 1];
        let duration_days = (last.date - first.date).num_days();

        metrics.annualized_return_pct = annualized_return_pct(total_return, duration_days);

        let returns = daily_returns(equity_curve);
        metrics.sharpe_ratio = sharpe_ratio(&returns);
        metrics.sortino_ratio = sortino_ratio(&returns);

        let (max_drawdown_pct, max_duration_days) = drawdown_stats(equity_curve);
        metrics.max_drawdown_pct = max_drawdown_pct;
        metrics.max_drawdown_duration_days = max_duration_days;
    }

    if !trades.is_empty() {
        apply_trade_stats(&mut metrics, trades);
    }

    metrics
}

/// Percentage change of total equity between consecutive points.
///
/// Intervals whose starting equity is not positive are skipped; a ratio
/// against zero equity is meaningless.
fn daily_returns(equity_curve: &[EquityPoint]) -> Vec<Decimal> {
    equity_curve
        .windows(2)
        .filter_map(|pair| {
            let prev = pair[0].total_equity;
            let curr = pair[1].total_equity;
            if prev > Decimal::ZERO {
                Some((curr - prev) / prev)
            } else {
                None
            }
        })
        .collect()
}

/// Compound annualization over calendar-day duration.
///
/// Total losses (`1 + total_return <= 0`) pin to -100% rather than taking a
/// fractional power of a non-positive base.
fn annualized_return_pct(total_return: Decimal, duration_days: i64) -> Decimal {
    let duration_years = duration_days as f64 / DAYS_PER_YEAR;
    if duration_years <= 0.0 {
        return Decimal::ZERO;
    }

    let growth = 1.0 + total_return.to_f64().unwrap_or(0.0);
    if growth <= 0.0 {
        return -Decimal::ONE_HUNDRED;
    }

    let annualized = growth.powf(1.0 / duration_years) - 1.0;
    Decimal::from_f64(annualized * 100.0).unwrap_or(Decimal::ZERO)
}

/// Annualized Sharpe ratio at a 0% risk-free rate.
fn sharpe_ratio(returns: &[Decimal]) -> Decimal {
    if returns.len() < 2 {
        return Decimal::ZERO;
    }
    let (Some(avg), Some(std)) = (mean(returns), std_dev(returns)) else {
        return Decimal::ZERO;
    };
    if std == Decimal::ZERO {
        return Decimal::ZERO;
    }
    let Some(annualization) = sqrt_decimal(TRADING_DAYS_PER_YEAR) else {
        return Decimal::ZERO;
    };
    annualization * avg / std
}

/// Annualized Sortino ratio: downside deviation in the denominator.
fn sortino_ratio(returns: &[Decimal]) -> Decimal {
    if returns.len() < 2 {
        return Decimal::ZERO;
    }
    let (Some(avg), Some(downside)) = (mean(returns), downside_deviation(returns)) else {
        return Decimal::ZERO;
    };
    if downside == Decimal::ZERO {
        return Decimal::ZERO;
    }
    let Some(annualization) = sqrt_decimal(TRADING_DAYS_PER_YEAR) else {
        return Decimal::ZERO;
    };
    annualization * avg / downside
}

/// Worst drawdown (percent, <= 0) and the longest drawdown span in days.
///
/// A span opens on the first day equity sits below its running maximum and
/// closes on the recovery day; an unresolved span closes at the final date.
fn drawdown_stats(equity_curve: &[EquityPoint]) -> (Decimal, i64) {
    let mut peak = equity_curve[0].total_equity;
    let mut max_drawdown = Decimal::ZERO;
    let mut max_duration_days = 0i64;
    let mut drawdown_start: Option<NaiveDate> = None;

    for point in equity_curve {
        if point.total_equity < peak {
            if peak > Decimal::ZERO {
                let drawdown = (point.total_equity - peak) / peak;
                max_drawdown = max_drawdown.min(drawdown);
            }
            if drawdown_start.is_none() {
                drawdown_start = Some(point.date);
            }
        } else {
            if let Some(start) = drawdown_start.take() {
                max_duration_days = max_duration_days.max((point.date - start).num_days());
            }
            peak = point.total_equity;
        }
    }

    if let Some(start) = drawdown_start {
        let last_date = equity_curve[equity_curve.len() - 1].date;
        max_duration_days = max_duration_days.max((last_date - start).num_days());
    }

    (max_drawdown * Decimal::ONE_HUNDRED, max_duration_days)
}

fn apply_trade_stats(metrics: &mut PerformanceMetrics, trades: &[ClosedTrade]) {
    let total = trades.len() as u64;
    let winning = trades.iter().filter(|t| t.is_winner()).count() as u64;
    let losing = total - winning;

    metrics.total_trades = total;
    metrics.winning_trades = winning;
    metrics.losing_trades = losing;
    metrics.win_rate = Decimal::from(winning) / Decimal::from(total) * Decimal::ONE_HUNDRED;

    let pcts: Vec<Decimal> = trades.iter().map(|t| t.profit_loss_pct).collect();
    let amounts: Vec<Decimal> = trades.iter().map(|t| t.profit_loss).collect();
    metrics.avg_profit_pct = mean(&pcts).unwrap_or(Decimal::ZERO);
    metrics.avg_profit_amount = mean(&amounts).unwrap_or(Decimal::ZERO);

    let gross_profit: Decimal = trades
        .iter()
        .filter(|t| t.profit_loss > Decimal::ZERO)
        .map(|t| t.profit_loss)
        .sum();
    let gross_loss: Decimal = trades
        .iter()
        .filter(|t| t.profit_loss <= Decimal::ZERO)
        .map(|t| t.profit_loss)
        .sum::<Decimal>()
        .abs();
    metrics.profit_factor = profit_factor(gross_profit, gross_loss);

    let (max_wins, max_losses) = consecutive_streaks(trades);
    metrics.max_consecutive_wins = max_wins;
    metrics.max_consecutive_losses = max_losses;

    metrics.best_trade_pct = pcts.iter().copied().max().unwrap_or(Decimal::ZERO);
    metrics.worst_trade_pct = pcts.iter().copied().min().unwrap_or(Decimal::ZERO);

    let durations: Vec<Decimal> = trades
        .iter()
        .map(|t| Decimal::from(t.duration_days()))
        .collect();
    metrics.avg_trade_duration_days = mean(&durations).unwrap_or(Decimal::ZERO);
}

/// Gross profit over gross loss, capped when no losses exist.
fn profit_factor(gross_profit: Decimal, gross_loss: Decimal) -> Decimal {
    if gross_loss > Decimal::ZERO {
        gross_profit / gross_loss
    } else if gross_profit > Decimal::ZERO {
        PROFIT_FACTOR_CAP
    } else {
        Decimal::ZERO
    }
}

/// Longest winning and losing runs, in trade-close order.
fn consecutive_streaks(trades: &[ClosedTrade]) -> (u64, u64) {
    let mut max_wins = 0u64;
    let mut max_losses = 0u64;
    let mut current_wins = 0u64;
    let mut current_losses = 0u64;

    for trade in trades {
        if trade.is_winner() {
            current_wins += 1;
            current_losses = 0;
            max_wins = max_wins.max(current_wins);
        } else {
            current_losses += 1;
            current_wins = 0;
            max_losses = max_losses.max(current_losses);
        }
    }

    (max_wins, max_losses)
}
