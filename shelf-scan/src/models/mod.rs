//! Data models for the reconciliation workflow

pub mod manual_entry;
pub mod reading_action;
pub mod reconcile_state;

pub use manual_entry::ManualEntryForm;
pub use reading_action::ReadingAction;
pub use reconcile_state::{ReconcileState, StateTransition};
