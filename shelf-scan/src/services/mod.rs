//! Services for the scan → resolve → store pipeline

pub mod isbn_normalizer;
pub mod metadata_resolver;
pub mod openlibrary_client;
pub mod reconciliation_orchestrator;

pub use isbn_normalizer::{normalize, Isbn};
pub use metadata_resolver::{MetadataResolver, ResolutionError};
pub use openlibrary_client::OpenLibraryClient;
pub use reconciliation_orchestrator::{ReconciliationOrchestrator, ScanOutcome};
