//! shelf-scan library interface
//!
//! Barcode → ISBN → catalog metadata → local book record.

pub mod error;
pub mod models;
pub mod render;
pub mod services;

pub use crate::error::ReconcileError;
pub use crate::services::{
    normalize, Isbn, MetadataResolver, OpenLibraryClient, ReconciliationOrchestrator,
    ResolutionError, ScanOutcome,
};
