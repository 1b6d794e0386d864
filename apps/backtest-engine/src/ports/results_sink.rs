//! Results sink port.
//!
//! The engine hands the finished run to a sink exactly once, at run end.
//! Storage, retry, and locking policy live behind this trait.

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{BacktestRun, ClosedTrade};

/// Results sink failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("results sink error: {0}")]
pub struct SinkError(pub String);

/// Port for persisting finished runs.
#[async_trait]
pub trait ResultsSink: Send + Sync {
    /// Persist a finished run, returning its assigned id.
    async fn persist(&self, run: &BacktestRun) -> Result<Uuid, SinkError>;

    /// Persist one closed trade under a previously persisted run.
    async fn persist_trade(&self, run_id: Uuid, trade: &ClosedTrade) -> Result<(), SinkError>;
}

/// In-memory sink for tests and local runs.
#[derive(Debug, Default)]
pub struct InMemoryResultsSink {
    runs: Mutex<Vec<(Uuid, BacktestRun)>>,
    trades: Mutex<Vec<(Uuid, ClosedTrade)>>,
}

impl InMemoryResultsSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All persisted runs.
    pub async fn runs(&self) -> Vec<(Uuid, BacktestRun)> {
        self.runs.lock().await.clone()
    }

    /// All persisted trades.
    pub async fn trades(&self) -> Vec<(Uuid, ClosedTrade)> {
        self.trades.lock().await.clone()
    }
}

#[async_trait]
impl ResultsSink for InMemoryResultsSink {
    async fn persist(&self, run: &BacktestRun) -> Result<Uuid, SinkError> {
        let run_id = Uuid::new_v4();
        self.runs.lock().await.push((run_id, run.clone()));
        Ok(run_id)
    }

    async fn persist_trade(&self, run_id: Uuid, trade: &ClosedTrade) -> Result<(), SinkError> {
        self.trades.lock().await.push((run_id, trade.clone()));
        Ok(())
    }
}
