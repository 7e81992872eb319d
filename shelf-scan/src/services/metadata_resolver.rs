//! Metadata resolver capability
//!
//! The orchestrator only sees this trait, so tests can swap the network
//! client for a deterministic fake.

use crate::services::isbn_normalizer::Isbn;
use async_trait::async_trait;
use shelf_common::BookMetadata;
use thiserror::Error;

/// Primary catalog lookup failure
///
/// Every variant sends the orchestrator to manual entry; none is shown to the
/// user verbatim.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("No metadata found for ISBN {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Catalog error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Resolves a canonical ISBN to bibliographic metadata
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    /// Resolver name for logging
    fn name(&self) -> &'static str;

    /// Fetch metadata for `isbn`
    ///
    /// # Errors
    /// `ResolutionError` when the catalog has no record or cannot be reached.
    async fn resolve(&self, isbn: &Isbn) -> Result<BookMetadata, ResolutionError>;
}
