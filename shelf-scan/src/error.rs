//! Error types for shelf-scan

use thiserror::Error;

/// Failure of a reconciliation or patch request
///
/// Invalid codes and catalog misses are not errors: they come back as
/// [`crate::ScanOutcome`] variants.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Another scan session is already in flight
    #[error("A scan is already in progress")]
    Busy,

    /// Manual submission without a pending manual-entry request
    #[error("No manual entry is pending")]
    NoPendingEntry,

    /// Record store failure (constraint violation, I/O, ...)
    #[error("Store error: {0}")]
    Store(#[from] shelf_common::Error),
}

impl ReconcileError {
    /// Message safe to show to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            ReconcileError::Busy => "A scan is already in progress.",
            ReconcileError::NoPendingEntry => "There is no book waiting for manual details.",
            ReconcileError::Store(_) => "Save failed. Please try again.",
        }
    }
}
