//! Per-run incident reporting.
//!
//! Non-fatal conditions are collected on an explicit `RunDiagnostics` value
//! passed into the run, so nothing accumulates in process-wide state and
//! tests can assert on exactly what a run skipped.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Category of a non-fatal incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentKind {
    /// Symbol had no snapshot for the day.
    DataUnavailable,
    /// Symbol fetch exceeded its timeout.
    FetchTimeout,
    /// Entry rejected by position sizing.
    InsufficientCapital,
    /// Entry rejected by signal validation.
    InvalidSignal,
    /// Open position had no quote for the day.
    MissingMarketQuote,
}

/// One recorded incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    /// Trading day the incident occurred on.
    pub date: NaiveDate,
    /// Symbol involved, when one applies.
    pub symbol: Option<String>,
    /// Incident category.
    pub kind: IncidentKind,
    /// Human-readable detail.
    pub message: String,
}

/// Explicit incident log for a single run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunDiagnostics {
    incidents: Vec<Incident>,
}

impl RunDiagnostics {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an incident.
    pub fn record(&mut self, date: NaiveDate, symbol: Option<&str>, kind: IncidentKind, message: impl Into<String>) {
        self.incidents.push(Incident {
            date,
            symbol: symbol.map(str::to_string),
            kind,
            message: message.into(),
        });
    }

    /// Record a non-fatal engine error under its taxonomy category.
    ///
    /// Fatal errors are not incidents; they abort the run instead.
    pub fn record_error(&mut self, date: NaiveDate, error: &EngineError) {
        let (symbol, kind) = match error {
            EngineError::DataUnavailable { symbol, .. } => {
                (Some(symbol.as_str()), IncidentKind::DataUnavailable)
            }
            EngineError::FetchTimeout { symbol, .. } => {
                (Some(symbol.as_str()), IncidentKind::FetchTimeout)
            }
            EngineError::InsufficientCapital { symbol, .. } => {
                (Some(symbol.as_str()), IncidentKind::InsufficientCapital)
            }
            EngineError::InvalidSignal { symbol, .. } => {
                (Some(symbol.as_str()), IncidentKind::InvalidSignal)
            }
            EngineError::MissingMarketQuote { symbol, .. } => {
                (Some(symbol.as_str()), IncidentKind::MissingMarketQuote)
            }
            EngineError::InvalidConfig(_) | EngineError::Sink(_) | EngineError::Provider(_) => {
                return;
            }
        };
        self.record(date, symbol, kind, error.to_string());
    }

    /// All incidents in record order.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Number of incidents of one kind.
    #[must_use]
    pub fn count(&self, kind: IncidentKind) -> usize {
        self.incidents.iter().filter(|i| i.kind == kind).count()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }
}
