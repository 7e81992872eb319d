//! Reconciliation state machine
//!
//! One scan event moves through:
//! IDLE → NORMALIZING → RESOLVING → PERSISTING → IDLE
//!
//! with two detours: an invalid code returns straight to IDLE, and a catalog
//! miss parks in AWAITING_MANUAL_INPUT until the user submits the form.
//! Reading-state changes take the short path IDLE → PATCHING → IDLE.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reconciliation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReconcileState {
    /// Ready for a scan or a reading-state change
    Idle,
    /// Cleaning the raw scanned code
    Normalizing,
    /// Waiting on the metadata catalog
    Resolving,
    /// Catalog had nothing; waiting for the user to fill the form
    AwaitingManualInput,
    /// Writing the record
    Persisting,
    /// Updating reading-state fields of an existing record
    Patching,
}

impl ReconcileState {
    /// Whether a new scan may start from this state
    pub fn accepts_scan(&self) -> bool {
        matches!(self, ReconcileState::Idle)
    }
}

impl fmt::Display for ReconcileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReconcileState::Idle => "IDLE",
            ReconcileState::Normalizing => "NORMALIZING",
            ReconcileState::Resolving => "RESOLVING",
            ReconcileState::AwaitingManualInput => "AWAITING_MANUAL_INPUT",
            ReconcileState::Persisting => "PERSISTING",
            ReconcileState::Patching => "PATCHING",
        };
        f.write_str(name)
    }
}

/// State transition record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    pub old_state: ReconcileState,
    pub new_state: ReconcileState,
    pub transitioned_at: DateTime<Utc>,
}
