//! Strategy port.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{EntrySignal, ExitReason, MarketSnapshot, OptionQuote, Position};

/// A pluggable trading policy.
///
/// Strategies are pure policy: they see the day's snapshot and the engine's
/// positions, and answer with entries and exits. Sizing, fills, and capital
/// custody stay in the ledger.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Strategy identifier recorded on the finished run.
    fn name(&self) -> &str;

    /// Propose new entries for the day. The engine opens as many as remaining
    /// position capacity allows, in order.
    async fn generate_signals(&self, snapshot: &MarketSnapshot, date: NaiveDate)
    -> Vec<EntrySignal>;

    /// Decide whether an open position should exit, given the day's quote for
    /// its contract. `None` keeps the position open (expiration is still
    /// enforced by the engine afterwards).
    async fn check_exit_criteria(
        &self,
        position: &Position,
        quote: &OptionQuote,
        date: NaiveDate,
    ) -> Option<ExitReason>;
}
